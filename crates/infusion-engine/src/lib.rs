//! # Infusion Engine
//!
//! Recipe pack loading for the infusion recipe engine.
//!
//! This crate provides:
//! - Validator configuration (`infusion.toml`)
//! - Item registry and tag dictionary loading (`items.toml`)
//! - Recipe pack loading (`recipes/*.toml`) into an `InfusionSystem`
//! - A serializable pack report

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod recipe_loader;
pub mod registry_loader;
pub mod report;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::recipe_loader::*;
    pub use crate::registry_loader::*;
    pub use crate::report::*;
}

pub use prelude::*;

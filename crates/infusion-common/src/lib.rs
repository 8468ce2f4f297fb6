//! # Infusion Common
//!
//! Common types and shared abstractions for the infusion recipe engine.
//!
//! This crate provides foundational types used across all infusion crates:
//! - ID types (ItemTypeId, RecipeId)
//! - Recipe file schema versions
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;

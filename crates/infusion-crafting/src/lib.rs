//! # Infusion Crafting
//!
//! Infusion recipes for the infusion engine.
//!
//! This crate provides:
//! - Infusion recipes (catalyst + ingredient specs, output, aspect costs)
//! - Consumption matching of candidate stacks against ingredient specs
//! - Research gating
//! - A recipe registry for the crafting-attempt loop

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod aspects;
pub mod matcher;
pub mod recipe;
pub mod research;
pub mod system;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::aspects::*;
    pub use crate::matcher::*;
    pub use crate::recipe::*;
    pub use crate::research::*;
    pub use crate::system::*;
}

pub use prelude::*;

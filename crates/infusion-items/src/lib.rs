//! # Infusion Items
//!
//! Item identity and item predicates for the infusion recipe engine.
//!
//! This crate provides:
//! - Item stacks (type, damage, tag data, count)
//! - Resolver traits for the host item registry and tag dictionary
//! - In-memory registry and tag tables
//! - Item specs: exact, fuzzy, tag set, union and example-override predicates

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod item_stack;
pub mod registry;
pub mod spec;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::item_stack::*;
    pub use crate::registry::*;
    pub use crate::spec::*;
}

pub use prelude::*;

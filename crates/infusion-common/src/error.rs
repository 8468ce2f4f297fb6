//! Error types for the infusion engine.

use thiserror::Error;

/// Top-level error type for infusion operations.
#[derive(Debug, Error)]
pub enum InfusionError {
    /// Recipe or spec construction errors
    #[error("Invalid spec: {0}")]
    InvalidSpec(#[from] InvalidSpec),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Construction-time errors for item specs and recipes.
///
/// These are raised while a recipe is being defined, never while one is
/// being matched. A recipe that fails with one of these is not registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSpec {
    /// An example override was requested but no real item was supplied
    #[error("{spec}: example must refer to a real item")]
    MissingExample {
        /// Description of the spec being wrapped
        spec: String,
    },

    /// The catalyst of a recipe does not resolve to any item
    #[error("[infusion recipe {recipe}] catalyst {spec} must refer to a real item")]
    UnresolvedCatalyst {
        /// Research key of the recipe
        recipe: String,
        /// Description of the catalyst spec
        spec: String,
    },

    /// The recipe has no output
    #[error("[infusion recipe {recipe}] output cannot be empty")]
    EmptyOutput {
        /// Research key of the recipe
        recipe: String,
    },

    /// The recipe builder was never given a catalyst
    #[error("[infusion recipe {recipe}] catalyst cannot be missing")]
    MissingCatalyst {
        /// Research key of the recipe
        recipe: String,
    },

    /// A union was declared without any member
    #[error("union must contain at least one spec")]
    EmptyUnion,

    /// An item name used where a concrete item is required is unknown
    #[error("unknown item: {name}")]
    UnknownItem {
        /// Name or numeric id as written
        name: String,
    },
}

/// Result type alias for infusion operations.
pub type InfusionResult<T> = Result<T, InfusionError>;

//! Pack validation report.

use std::path::PathBuf;

use infusion_crafting::MatchPolicy;
use serde::Serialize;

use crate::recipe_loader::{display_stacks, RecipeLoader, RecipeLoaderStats};

/// Summary of one loaded recipe.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeSummary {
    /// Name from the definition.
    pub name: String,
    /// Research key (empty = ungated).
    pub research: String,
    /// File the recipe came from.
    pub source: PathBuf,
    /// Ingredients kept after construction.
    pub ingredients: usize,
    /// Assignment policy.
    pub policy: MatchPolicy,
    /// Total aspect cost.
    pub aspect_total: u64,
    /// Example stacks shown in a recipe display, catalyst first.
    pub display: Vec<String>,
}

/// Everything the validator learned about a pack.
#[derive(Debug, Clone, Serialize)]
pub struct PackReport {
    /// Number of known items.
    pub items: usize,
    /// Number of known tags.
    pub tags: usize,
    /// Loader counters.
    pub stats: RecipeLoaderStats,
    /// Loaded recipes in load order.
    pub recipes: Vec<RecipeSummary>,
}

impl PackReport {
    /// Builds a report from a loader that has finished loading.
    #[must_use]
    pub fn from_loader(loader: &RecipeLoader) -> Self {
        let recipes = loader
            .recipes()
            .iter()
            .map(|loaded| RecipeSummary {
                name: loaded.name.clone(),
                research: loaded.recipe.research().to_string(),
                source: loaded.source.clone(),
                ingredients: loaded.recipe.ingredients().len(),
                policy: loaded.recipe.policy(),
                aspect_total: loaded.recipe.aspects().total(),
                display: display_stacks(&loaded.recipe)
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            })
            .collect();

        Self {
            items: loader.registries().items.len(),
            tags: loader.registries().tags.len(),
            stats: loader.stats().clone(),
            recipes,
        }
    }

    /// True if any file or recipe was rejected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.stats.errors > 0
    }
}

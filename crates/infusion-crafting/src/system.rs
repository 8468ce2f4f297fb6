//! Recipe registry for the crafting-attempt loop.

use infusion_common::RecipeId;
use infusion_items::ItemStack;
use tracing::{debug, info};

use crate::recipe::InfusionRecipe;
use crate::research::ResearchGate;

/// Registered infusion recipes, tried in registration order.
#[derive(Debug, Default)]
pub struct InfusionSystem {
    recipes: Vec<InfusionRecipe>,
}

impl InfusionSystem {
    /// Creates an empty system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a recipe and returns its id.
    pub fn register(&mut self, recipe: InfusionRecipe) -> RecipeId {
        let id = RecipeId::new(self.recipes.len() as u32);
        debug!(
            "Registered infusion {id} (research {:?}, {} ingredients)",
            recipe.research(),
            recipe.ingredients().len()
        );
        self.recipes.push(recipe);
        id
    }

    /// Gets a recipe by id.
    #[must_use]
    pub fn get(&self, id: RecipeId) -> Option<&InfusionRecipe> {
        self.recipes.get(id.raw() as usize)
    }

    /// Returns the number of registered recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Returns true if no recipe is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Iterates recipes with their ids in registration order.
    pub fn recipes(&self) -> impl Iterator<Item = (RecipeId, &InfusionRecipe)> + '_ {
        self.recipes
            .iter()
            .enumerate()
            .map(|(index, recipe)| (RecipeId::new(index as u32), recipe))
    }

    /// Finds the first registered recipe matching the altar contents.
    pub fn find_match<G>(
        &self,
        candidates: &[ItemStack],
        catalyst: &ItemStack,
        gate: &G,
    ) -> Option<(RecipeId, &InfusionRecipe)>
    where
        G: ResearchGate + ?Sized,
    {
        let found = self
            .recipes()
            .find(|(_, recipe)| recipe.matches(candidates, catalyst, gate));
        if let Some((id, recipe)) = &found {
            info!("Infusion matched {id} (research {:?})", recipe.research());
        }
        found
    }

    /// Recipes gated behind a research key.
    pub fn recipes_for_research<'a>(
        &'a self,
        research: &'a str,
    ) -> impl Iterator<Item = (RecipeId, &'a InfusionRecipe)> + 'a {
        self.recipes()
            .filter(move |(_, recipe)| recipe.research() == research)
    }
}

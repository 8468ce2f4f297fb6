//! Infusion recipes.
//!
//! An infusion recipe is a central catalyst spec plus an ordered list of
//! ingredient specs, each consuming exactly one candidate unit. Matching:
//!
//! 1. the catalyst spec must currently resolve to an item;
//! 2. the research key, if any, must be complete for the player;
//! 3. the catalyst candidate must match the catalyst spec;
//! 4. the candidate stacks, expanded into units, must be exactly covered by
//!    the ingredient specs (see [`crate::matcher`]).
//!
//! Construction errors are reported as [`InvalidSpec`]. Matching never
//! fails with an error; a recipe that does not apply simply returns
//! `false`.

use infusion_common::InvalidSpec;
use infusion_items::{ItemSpec, ItemStack};
use serde::Serialize;
use tracing::{trace, warn};

use crate::aspects::AspectList;
use crate::matcher::{assign, denormalize, Assignment, MatchPolicy};
use crate::research::ResearchGate;

/// What a recipe produces. Opaque to matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeOutput {
    /// A new item stack replaces the catalyst.
    Item(ItemStack),
    /// Tag data is written onto the catalyst, which is kept.
    CatalystTag {
        /// Tag key to write.
        key: String,
        /// Tag payload.
        data: Vec<u8>,
    },
}

impl RecipeOutput {
    /// True if the output would produce nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Item(stack) => stack.is_empty(),
            Self::CatalystTag { key, .. } => key.is_empty(),
        }
    }
}

/// Outcome of evaluating a recipe, with the reason on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    /// The catalyst spec currently resolves to nothing.
    CatalystUnavailable,
    /// The player has not completed the research.
    ResearchLocked {
        /// Research key that was checked.
        research: String,
    },
    /// The central item is not the catalyst.
    CatalystMismatch,
    /// No remaining unit satisfied this ingredient.
    MissingIngredient {
        /// Index into [`InfusionRecipe::ingredients`].
        ingredient: usize,
    },
    /// All ingredients were satisfied but units remain.
    Leftovers {
        /// Number of unclaimed units.
        remaining: usize,
    },
    /// The recipe matches.
    Matched {
        /// Candidate stack index consumed by each ingredient, in
        /// ingredient order.
        assignment: Vec<usize>,
    },
}

impl MatchOutcome {
    /// True for [`MatchOutcome::Matched`].
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// A multi-ingredient infusion recipe.
#[derive(Debug, Clone)]
pub struct InfusionRecipe {
    research: String,
    output: RecipeOutput,
    instability: i32,
    aspects: AspectList,
    catalyst: ItemSpec,
    ingredients: Vec<ItemSpec>,
    policy: MatchPolicy,
}

impl InfusionRecipe {
    /// Creates a recipe.
    ///
    /// Ingredients that resolve to nothing and never can are dropped with
    /// a warning. Ingredients reading a tag dictionary are kept even when
    /// currently empty, since the tag may be populated later; until then
    /// they cannot be satisfied.
    pub fn new(
        research: impl Into<String>,
        output: RecipeOutput,
        instability: i32,
        aspects: AspectList,
        catalyst: ItemSpec,
        ingredients: Vec<ItemSpec>,
    ) -> Result<Self, InvalidSpec> {
        let research = research.into();

        if output.is_empty() {
            return Err(InvalidSpec::EmptyOutput { recipe: research });
        }
        if !catalyst.has_item() {
            return Err(InvalidSpec::UnresolvedCatalyst {
                recipe: research,
                spec: catalyst.to_string(),
            });
        }

        let mut kept = Vec::with_capacity(ingredients.len());
        for spec in ingredients {
            if spec.has_item() {
                kept.push(spec);
            } else if reads_tags(&spec) {
                warn!(
                    "[infusion recipe {research}] input is currently empty and cannot match until its tag is populated: {spec}"
                );
                kept.push(spec);
            } else {
                warn!(
                    "[infusion recipe {research}] input could not be found and will not be added to the recipe: {spec}"
                );
            }
        }

        Ok(Self {
            research,
            output,
            instability,
            aspects,
            catalyst,
            ingredients: kept,
            policy: MatchPolicy::default(),
        })
    }

    /// Creates a new recipe builder.
    #[must_use]
    pub fn builder(research: impl Into<String>) -> InfusionRecipeBuilder {
        InfusionRecipeBuilder::new(research)
    }

    /// Sets the assignment policy.
    #[must_use]
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Research key gating this recipe (empty = ungated).
    #[must_use]
    pub fn research(&self) -> &str {
        &self.research
    }

    /// What the recipe produces.
    #[must_use]
    pub const fn output(&self) -> &RecipeOutput {
        &self.output
    }

    /// Instability added to the altar while the recipe runs.
    #[must_use]
    pub const fn instability(&self) -> i32 {
        self.instability
    }

    /// Aspect costs.
    #[must_use]
    pub const fn aspects(&self) -> &AspectList {
        &self.aspects
    }

    /// The central catalyst spec.
    #[must_use]
    pub const fn catalyst(&self) -> &ItemSpec {
        &self.catalyst
    }

    /// Ingredient specs in declaration order.
    #[must_use]
    pub fn ingredients(&self) -> &[ItemSpec] {
        &self.ingredients
    }

    /// The assignment policy.
    #[must_use]
    pub const fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Example catalyst for display.
    #[must_use]
    pub fn catalyst_example(&self) -> Option<ItemStack> {
        self.catalyst.example()
    }

    /// Example of each ingredient that currently has one, for display.
    #[must_use]
    pub fn component_examples(&self) -> Vec<ItemStack> {
        self.ingredients.iter().filter_map(ItemSpec::example).collect()
    }

    /// Check whether the candidates and central item satisfy this recipe.
    pub fn matches<G>(&self, candidates: &[ItemStack], catalyst: &ItemStack, gate: &G) -> bool
    where
        G: ResearchGate + ?Sized,
    {
        self.evaluate(candidates, catalyst, gate).is_match()
    }

    /// Evaluate the recipe and report why it does or does not match.
    ///
    /// Neither the candidates nor the specs are modified; each call works
    /// on its own expanded copy of the candidates.
    pub fn evaluate<G>(&self, candidates: &[ItemStack], catalyst: &ItemStack, gate: &G) -> MatchOutcome
    where
        G: ResearchGate + ?Sized,
    {
        if !self.catalyst.has_item() {
            trace!("[infusion recipe {}] catalyst unavailable", self.research);
            return MatchOutcome::CatalystUnavailable;
        }

        if !self.research.is_empty() && !gate.is_research_complete(&self.research) {
            trace!("[infusion recipe {}] research locked", self.research);
            return MatchOutcome::ResearchLocked {
                research: self.research.clone(),
            };
        }

        if !self.catalyst.matches(catalyst) {
            trace!("[infusion recipe {}] catalyst mismatch: {catalyst}", self.research);
            return MatchOutcome::CatalystMismatch;
        }

        match assign(self.policy, &self.ingredients, denormalize(candidates)) {
            Assignment::Unsatisfied(ingredient) => {
                trace!(
                    "[infusion recipe {}] missing ingredient {ingredient}: {}",
                    self.research,
                    self.ingredients[ingredient]
                );
                MatchOutcome::MissingIngredient { ingredient }
            },
            Assignment::Complete { leftover, .. } if leftover > 0 => {
                trace!("[infusion recipe {}] {leftover} leftover units", self.research);
                MatchOutcome::Leftovers {
                    remaining: leftover,
                }
            },
            Assignment::Complete { sources, .. } => MatchOutcome::Matched {
                assignment: sources,
            },
        }
    }
}

/// True if the spec's resolution depends on a live tag dictionary.
fn reads_tags(spec: &ItemSpec) -> bool {
    match spec {
        ItemSpec::TagSet(_) => true,
        ItemSpec::Union(union) => union.children().iter().any(reads_tags),
        ItemSpec::WithExample(wrapped) => reads_tags(wrapped.base()),
        ItemSpec::Exact(_) | ItemSpec::Fuzzy(_) => false,
    }
}

/// Builder for creating infusion recipes.
#[derive(Debug)]
pub struct InfusionRecipeBuilder {
    research: String,
    output: Option<RecipeOutput>,
    instability: i32,
    aspects: AspectList,
    catalyst: Option<ItemSpec>,
    ingredients: Vec<ItemSpec>,
    policy: MatchPolicy,
}

impl InfusionRecipeBuilder {
    fn new(research: impl Into<String>) -> Self {
        Self {
            research: research.into(),
            output: None,
            instability: 0,
            aspects: AspectList::new(),
            catalyst: None,
            ingredients: Vec::new(),
            policy: MatchPolicy::default(),
        }
    }

    /// Sets the output.
    #[must_use]
    pub fn output(mut self, output: RecipeOutput) -> Self {
        self.output = Some(output);
        self
    }

    /// Sets an item output.
    #[must_use]
    pub fn output_item(self, stack: ItemStack) -> Self {
        self.output(RecipeOutput::Item(stack))
    }

    /// Sets the instability.
    #[must_use]
    pub const fn instability(mut self, instability: i32) -> Self {
        self.instability = instability;
        self
    }

    /// Adds an aspect cost.
    #[must_use]
    pub fn aspect(mut self, aspect: impl Into<String>, amount: u32) -> Self {
        self.aspects.add(aspect, amount);
        self
    }

    /// Replaces all aspect costs.
    #[must_use]
    pub fn aspects(mut self, aspects: AspectList) -> Self {
        self.aspects = aspects;
        self
    }

    /// Sets the catalyst spec.
    #[must_use]
    pub fn catalyst(mut self, spec: impl Into<ItemSpec>) -> Self {
        self.catalyst = Some(spec.into());
        self
    }

    /// Adds one ingredient spec.
    #[must_use]
    pub fn ingredient(mut self, spec: impl Into<ItemSpec>) -> Self {
        self.ingredients.push(spec.into());
        self
    }

    /// Adds several ingredient specs.
    #[must_use]
    pub fn ingredients(mut self, specs: impl IntoIterator<Item = ItemSpec>) -> Self {
        self.ingredients.extend(specs);
        self
    }

    /// Sets the assignment policy.
    #[must_use]
    pub const fn policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds the recipe.
    pub fn build(self) -> Result<InfusionRecipe, InvalidSpec> {
        let output = self.output.ok_or_else(|| InvalidSpec::EmptyOutput {
            recipe: self.research.clone(),
        })?;
        let catalyst = self.catalyst.ok_or_else(|| InvalidSpec::MissingCatalyst {
            recipe: self.research.clone(),
        })?;

        Ok(InfusionRecipe::new(
            self.research,
            output,
            self.instability,
            self.aspects,
            catalyst,
            self.ingredients,
        )?
        .with_policy(self.policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::{ResearchLog, Unrestricted};
    use infusion_common::ItemTypeId;
    use infusion_items::{ItemStackBuilder, TagDictionary, TagTable};
    use proptest::prelude::*;
    use std::sync::Arc;

    const ITEM_A: ItemTypeId = ItemTypeId::new(1);
    const ITEM_B: ItemTypeId = ItemTypeId::new(2);
    const ITEM_C: ItemTypeId = ItemTypeId::new(3);
    const OUTPUT: ItemTypeId = ItemTypeId::new(99);

    fn two_b_recipe() -> InfusionRecipe {
        InfusionRecipe::builder("")
            .output_item(ItemStack::one(OUTPUT))
            .catalyst(ItemSpec::exact(ItemStack::with_damage(ITEM_A, 1, 0)))
            .ingredient(ItemSpec::fuzzy_type(Some(ITEM_B)))
            .ingredient(ItemSpec::fuzzy_type(Some(ITEM_B)))
            .build()
            .expect("valid recipe")
    }

    fn central() -> ItemStack {
        ItemStack::with_damage(ITEM_A, 1, 0)
    }

    // === Construction ===

    #[test]
    fn test_builder_fields() {
        let recipe = InfusionRecipe::builder("ELVEN_GATEWAY")
            .output_item(ItemStack::one(OUTPUT))
            .instability(4)
            .aspect("praecantatio", 16)
            .aspect("alienis", 8)
            .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
            .ingredient(ItemSpec::exact_type(Some(ITEM_B)))
            .policy(MatchPolicy::Exhaustive)
            .build()
            .expect("valid recipe");

        assert_eq!(recipe.research(), "ELVEN_GATEWAY");
        assert_eq!(recipe.instability(), 4);
        assert_eq!(recipe.aspects().get("praecantatio"), 16);
        assert_eq!(recipe.aspects().len(), 2);
        assert_eq!(recipe.ingredients().len(), 1);
        assert_eq!(recipe.policy(), MatchPolicy::Exhaustive);
        assert_eq!(recipe.output(), &RecipeOutput::Item(ItemStack::one(OUTPUT)));
    }

    #[test]
    fn test_unresolved_catalyst_rejected() {
        let result = InfusionRecipe::builder("BROKEN")
            .output_item(ItemStack::one(OUTPUT))
            .catalyst(ItemSpec::exact_type(None))
            .build();
        assert!(matches!(
            result,
            Err(InvalidSpec::UnresolvedCatalyst { ref recipe, .. }) if recipe == "BROKEN"
        ));
    }

    #[test]
    fn test_missing_catalyst_rejected() {
        let result = InfusionRecipe::builder("X")
            .output_item(ItemStack::one(OUTPUT))
            .build();
        assert!(matches!(result, Err(InvalidSpec::MissingCatalyst { .. })));
    }

    #[test]
    fn test_empty_output_rejected() {
        let result = InfusionRecipe::builder("X")
            .output_item(ItemStack::empty())
            .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
            .build();
        assert!(matches!(result, Err(InvalidSpec::EmptyOutput { .. })));

        let result = InfusionRecipe::builder("X")
            .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
            .build();
        assert!(matches!(result, Err(InvalidSpec::EmptyOutput { .. })));

        let result = InfusionRecipe::builder("X")
            .output(RecipeOutput::CatalystTag {
                key: String::new(),
                data: vec![1],
            })
            .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
            .build();
        assert!(matches!(result, Err(InvalidSpec::EmptyOutput { .. })));
    }

    #[test]
    fn test_unresolved_ingredient_dropped() {
        let recipe = InfusionRecipe::builder("")
            .output_item(ItemStack::one(OUTPUT))
            .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
            .ingredient(ItemSpec::exact_type(None))
            .ingredient(ItemSpec::fuzzy_type(Some(ITEM_B)))
            .build()
            .expect("valid recipe");

        assert_eq!(recipe.ingredients().len(), 1);
        assert!(recipe.matches(&[ItemStack::one(ITEM_B)], &central(), &Unrestricted));
    }

    #[test]
    fn test_display_examples() {
        let recipe = InfusionRecipe::builder("")
            .output_item(ItemStack::one(OUTPUT))
            .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
            .ingredient(ItemSpec::fuzzy_type(Some(ITEM_B)))
            .ingredient(ItemSpec::tag_set(Arc::new(TagTable::new()), "empty"))
            .build()
            .expect("valid recipe");

        assert_eq!(recipe.catalyst_example(), Some(ItemStack::one(ITEM_A)));
        assert_eq!(recipe.component_examples(), vec![ItemStack::one(ITEM_B)]);
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_recipe_types_are_send_sync() {
        assert_send_sync::<ItemSpec>();
        assert_send_sync::<InfusionRecipe>();
        assert_send_sync::<MatchOutcome>();
    }

    /// Host dictionary whose tags all list only an empty stack.
    struct EmptyMemberTags;

    impl TagDictionary for EmptyMemberTags {
        fn members(&self, _tag: &str) -> Arc<[ItemStack]> {
            Arc::from(vec![ItemStack::empty()])
        }
    }

    #[test]
    fn test_empty_tag_member_does_not_resolve() {
        let result = InfusionRecipe::builder("")
            .output_item(ItemStack::one(OUTPUT))
            .catalyst(ItemSpec::tag_set(Arc::new(EmptyMemberTags), "centre"))
            .build();
        assert!(matches!(result, Err(InvalidSpec::UnresolvedCatalyst { .. })));

        let recipe = InfusionRecipe::builder("")
            .output_item(ItemStack::one(OUTPUT))
            .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
            .ingredient(ItemSpec::tag_set(Arc::new(EmptyMemberTags), "gem"))
            .build()
            .expect("valid recipe");
        assert!(recipe.component_examples().is_empty());
        assert!(!recipe.matches(&[], &central(), &Unrestricted));
        assert!(!recipe.matches(&[ItemStack::one(ITEM_B)], &central(), &Unrestricted));
    }

    // === Matching ===

    #[test]
    fn test_stack_covers_two_ingredients() {
        let recipe = two_b_recipe();
        let outcome = recipe.evaluate(&[ItemStack::new(ITEM_B, 2)], &central(), &Unrestricted);
        assert_eq!(
            outcome,
            MatchOutcome::Matched {
                assignment: vec![0, 0]
            }
        );
    }

    #[test]
    fn test_foreign_unit_rejected() {
        let recipe = two_b_recipe();
        let candidates = [ItemStack::new(ITEM_B, 1), ItemStack::new(ITEM_C, 1)];
        assert!(!recipe.matches(&candidates, &central(), &Unrestricted));
        assert_eq!(
            recipe.evaluate(&candidates, &central(), &Unrestricted),
            MatchOutcome::MissingIngredient { ingredient: 1 }
        );
    }

    #[test]
    fn test_leftovers_reported() {
        let recipe = two_b_recipe();
        let candidates = [ItemStack::new(ITEM_B, 2), ItemStack::new(ITEM_C, 1)];
        assert_eq!(
            recipe.evaluate(&candidates, &central(), &Unrestricted),
            MatchOutcome::Leftovers { remaining: 1 }
        );
    }

    #[test]
    fn test_empty_tag_never_matches() {
        let tags = Arc::new(TagTable::new());
        let recipe = InfusionRecipe::builder("")
            .output_item(ItemStack::one(OUTPUT))
            .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
            .ingredient(ItemSpec::tag_set(tags, "gemAmber"))
            .build()
            .expect("valid recipe");

        let attempts: [&[ItemStack]; 4] = [
            &[],
            &[ItemStack::one(ITEM_B)],
            &[ItemStack::new(ITEM_C, 3)],
            &[ItemStack::one(ITEM_A), ItemStack::one(ITEM_B)],
        ];
        for candidates in attempts {
            assert!(!recipe.matches(candidates, &central(), &Unrestricted));
        }
    }

    #[test]
    fn test_tag_ingredient_populated_later() {
        let tags = Arc::new(TagTable::new());
        let recipe = InfusionRecipe::builder("")
            .output_item(ItemStack::one(OUTPUT))
            .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
            .ingredient(ItemSpec::tag_set(tags.clone(), "gemAmber"))
            .build()
            .expect("valid recipe");

        let candidates = [ItemStack::one(ITEM_C)];
        assert!(!recipe.matches(&candidates, &central(), &Unrestricted));

        tags.add_member("gemAmber", ItemStack::one(ITEM_C));
        assert!(recipe.matches(&candidates, &central(), &Unrestricted));
    }

    #[test]
    fn test_research_gate() {
        let recipe = InfusionRecipe::builder("INFUSION")
            .output_item(ItemStack::one(OUTPUT))
            .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
            .ingredient(ItemSpec::fuzzy_type(Some(ITEM_B)))
            .build()
            .expect("valid recipe");
        let candidates = [ItemStack::one(ITEM_B)];

        let mut log = ResearchLog::new("player");
        assert_eq!(
            recipe.evaluate(&candidates, &central(), &log),
            MatchOutcome::ResearchLocked {
                research: "INFUSION".to_string()
            }
        );

        log.complete("INFUSION");
        assert!(recipe.matches(&candidates, &central(), &log));
    }

    #[test]
    fn test_gate_not_consulted_without_research() {
        let recipe = two_b_recipe();
        let gate = |_: &str| -> bool { panic!("gate consulted for ungated recipe") };
        assert!(recipe.matches(&[ItemStack::new(ITEM_B, 2)], &central(), &gate));
    }

    #[test]
    fn test_gate_checked_before_items() {
        let recipe = InfusionRecipe::builder("LOCKED")
            .output_item(ItemStack::one(OUTPUT))
            .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
            .build()
            .expect("valid recipe");
        let deny = |_: &str| false;

        assert_eq!(
            recipe.evaluate(&[], &ItemStack::one(ITEM_C), &deny),
            MatchOutcome::ResearchLocked {
                research: "LOCKED".to_string()
            }
        );
    }

    #[test]
    fn test_catalyst_mismatch() {
        let recipe = two_b_recipe();
        let wrong_damage = ItemStack::with_damage(ITEM_A, 1, 3);
        assert_eq!(
            recipe.evaluate(&[ItemStack::new(ITEM_B, 2)], &wrong_damage, &Unrestricted),
            MatchOutcome::CatalystMismatch
        );
        assert_eq!(
            recipe.evaluate(&[ItemStack::new(ITEM_B, 2)], &ItemStack::empty(), &Unrestricted),
            MatchOutcome::CatalystMismatch
        );
    }

    #[test]
    fn test_catalyst_tag_emptied_after_construction() {
        let tags = Arc::new(TagTable::new());
        tags.add_member("centre", ItemStack::one(ITEM_A));
        let recipe = InfusionRecipe::builder("")
            .output(RecipeOutput::CatalystTag {
                key: "runic".to_string(),
                data: vec![1],
            })
            .catalyst(ItemSpec::tag_set(tags.clone(), "centre"))
            .build()
            .expect("catalyst resolves at construction");

        assert!(recipe.matches(&[], &central(), &Unrestricted));
        tags.clear_tag("centre");
        assert_eq!(
            recipe.evaluate(&[], &central(), &Unrestricted),
            MatchOutcome::CatalystUnavailable
        );
    }

    #[test]
    fn test_catalyst_is_not_part_of_candidates() {
        let recipe = InfusionRecipe::builder("")
            .output_item(ItemStack::one(OUTPUT))
            .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
            .ingredient(ItemSpec::exact_type(Some(ITEM_A)))
            .build()
            .expect("valid recipe");

        assert!(!recipe.matches(&[], &central(), &Unrestricted));
        assert!(recipe.matches(&[ItemStack::one(ITEM_A)], &central(), &Unrestricted));
    }

    #[test]
    fn test_greedy_false_negative_documented() {
        let wool = ItemTypeId::new(35);
        let build = |policy| {
            InfusionRecipe::builder("")
                .output_item(ItemStack::one(OUTPUT))
                .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
                .ingredient(ItemSpec::fuzzy_type(Some(wool)))
                .ingredient(ItemSpec::exact(ItemStack::with_damage(wool, 1, 14)))
                .policy(policy)
                .build()
                .expect("valid recipe")
        };
        let candidates = [
            ItemStack::with_damage(wool, 1, 14),
            ItemStack::with_damage(wool, 1, 0),
        ];

        assert!(!build(MatchPolicy::Greedy).matches(&candidates, &central(), &Unrestricted));
        assert!(build(MatchPolicy::Exhaustive).matches(&candidates, &central(), &Unrestricted));
    }

    #[test]
    fn test_tagged_ingredient() {
        let charged = ItemStackBuilder::new(ITEM_B).tag(b"charge=9").build();
        let recipe = InfusionRecipe::builder("")
            .output_item(ItemStack::one(OUTPUT))
            .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
            .ingredient(ItemSpec::exact(charged.clone()))
            .build()
            .expect("valid recipe");

        assert!(recipe.matches(&[charged], &central(), &Unrestricted));
        assert!(!recipe.matches(&[ItemStack::one(ITEM_B)], &central(), &Unrestricted));
    }

    #[test]
    fn test_outcome_json() {
        let json = serde_json::to_string(&MatchOutcome::MissingIngredient { ingredient: 2 })
            .expect("serialize");
        assert_eq!(json, r#"{"outcome":"missing_ingredient","ingredient":2}"#);
    }

    fn candidate_strategy() -> impl Strategy<Value = Vec<ItemStack>> {
        prop::collection::vec((1u32..4, 0u32..4), 0..4).prop_map(|stacks| {
            stacks
                .into_iter()
                .map(|(id, count)| ItemStack::new(ItemTypeId::new(id), count))
                .collect()
        })
    }

    fn spec_strategy() -> impl Strategy<Value = Vec<ItemSpec>> {
        prop::collection::vec(1u32..4, 0..5).prop_map(|ids| {
            ids.into_iter()
                .map(|id| ItemSpec::from(ItemSpec::fuzzy_type(Some(ItemTypeId::new(id)))))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn property_evaluate_is_idempotent(specs in spec_strategy(), candidates in candidate_strategy()) {
            let recipe = InfusionRecipe::builder("")
                .output_item(ItemStack::one(OUTPUT))
                .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
                .ingredients(specs)
                .build()
                .expect("valid recipe");

            let first = recipe.evaluate(&candidates, &central(), &Unrestricted);
            let second = recipe.evaluate(&candidates, &central(), &Unrestricted);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn property_match_is_exact_cover(specs in spec_strategy(), candidates in candidate_strategy()) {
            // With single-type specs, a cover exists iff the per-type unit
            // counts equal the per-type spec counts.
            let mut wanted = [0u32; 4];
            for spec in &specs {
                let example = spec.example().expect("resolved");
                wanted[example.item_type().raw() as usize] += 1;
            }
            let mut have = [0u32; 4];
            for stack in &candidates {
                have[stack.item_type().raw() as usize] += stack.count();
            }

            for policy in [MatchPolicy::Greedy, MatchPolicy::Exhaustive] {
                let recipe = InfusionRecipe::builder("")
                    .output_item(ItemStack::one(OUTPUT))
                    .catalyst(ItemSpec::exact_type(Some(ITEM_A)))
                    .ingredients(specs.clone())
                    .policy(policy)
                    .build()
                    .expect("valid recipe");

                let outcome = recipe.evaluate(&candidates, &central(), &Unrestricted);
                prop_assert_eq!(outcome.is_match(), wanted == have);
                if let MatchOutcome::Matched { assignment } = outcome {
                    prop_assert_eq!(assignment.len(), specs.len());
                    for (spec, source) in specs.iter().zip(assignment) {
                        prop_assert!(spec.matches(&candidates[source]));
                    }
                }
            }
        }
    }
}

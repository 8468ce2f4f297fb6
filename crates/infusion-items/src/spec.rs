//! Item specs: predicates over item identity.
//!
//! Every spec answers two questions: does a given stack satisfy it, and
//! which stack would it show as an example. A spec without an example
//! never matches anything. `matches` is always computed from the spec's
//! own data and never derived from `example`.
//!
//! Variants:
//! - `Exact`: one resolved item (type, damage, tag data)
//! - `Fuzzy`: one item type, damage and tag comparison toggled separately
//! - `TagSet`: any member of a named tag, read live from a `TagDictionary`
//! - `Union`: any of an ordered list of specs
//! - `WithExample`: another spec with its example overridden
//!
//! `or` is absorptive: calling it on a union appends to that union and
//! returns it, so `a.or(b).or(c)` is a single union of three children.
//!
//! # Example
//!
//! ```
//! use infusion_common::ItemTypeId;
//! use infusion_items::{ItemSpec, ItemStack};
//!
//! let gold = ItemTypeId::new(266);
//! let iron = ItemTypeId::new(265);
//!
//! let metal = ItemSpec::exact_type(Some(gold)).or(ItemSpec::fuzzy_type(Some(iron)));
//! assert!(metal.matches(&ItemStack::with_damage(iron, 1, 9)));
//! assert_eq!(metal.example(), Some(ItemStack::one(gold)));
//! ```

use std::fmt;
use std::sync::Arc;

use infusion_common::{InvalidSpec, ItemTypeId};

use crate::item_stack::{Damage, ItemStack};
use crate::registry::{ItemRegistry, TagDictionary};

/// A predicate over a single item identity with a canonical example.
#[derive(Debug, Clone)]
pub enum ItemSpec {
    /// Exact identity match.
    Exact(ExactSpec),
    /// Item-type match with optional damage/tag comparison.
    Fuzzy(FuzzySpec),
    /// Membership in a named tag.
    TagSet(TagSetSpec),
    /// Any of several specs.
    Union(UnionSpec),
    /// A spec with an overridden example.
    WithExample(ExampleSpec),
}

impl ItemSpec {
    // ------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------

    /// Exact spec for a numeric registry id. Unknown ids give an
    /// unresolved spec.
    pub fn exact_id<R: ItemRegistry + ?Sized>(registry: &R, id: u32) -> ExactSpec {
        ExactSpec::new(format!("itemId={id}"), registry.by_id(id).map(ItemStack::one))
    }

    /// Exact spec for a registry name. Unknown names give an unresolved
    /// spec.
    pub fn exact_name<R: ItemRegistry + ?Sized>(registry: &R, name: &str) -> ExactSpec {
        let item = registry.by_name(name);
        let label = match item {
            Some(item) => format!("name={name}, item={item}"),
            None => format!("name={name}, item=missing"),
        };
        ExactSpec::new(label, item.map(ItemStack::one))
    }

    /// Exact spec for an item type handle.
    pub fn exact_type(item: Option<ItemTypeId>) -> ExactSpec {
        let label = match item {
            Some(item) => format!("item={item}"),
            None => "item=missing".to_string(),
        };
        ExactSpec::new(label, item.map(ItemStack::one))
    }

    /// Exact spec for an existing stack. Damage and tag data are part of
    /// the identity; the count is not.
    pub fn exact(stack: ItemStack) -> ExactSpec {
        ExactSpec::new(format!("stack={stack}"), Some(stack))
    }

    /// Fuzzy spec for an existing stack. Damage and tag comparison start
    /// disabled.
    pub fn fuzzy(stack: ItemStack) -> FuzzySpec {
        FuzzySpec::new(Some(stack))
    }

    /// Fuzzy spec for an item type handle.
    pub fn fuzzy_type(item: Option<ItemTypeId>) -> FuzzySpec {
        FuzzySpec::new(item.map(ItemStack::one))
    }

    /// Spec accepting any current member of `tag`.
    pub fn tag_set(dictionary: Arc<dyn TagDictionary>, tag: impl Into<String>) -> ItemSpec {
        ItemSpec::TagSet(TagSetSpec {
            tag: tag.into(),
            dictionary,
        })
    }

    /// A union starting with a single child.
    pub fn union(first: impl Into<ItemSpec>) -> ItemSpec {
        ItemSpec::Union(UnionSpec::new(first.into()))
    }

    // ------------------------------------------------------------------
    // Predicate
    // ------------------------------------------------------------------

    /// Check whether `item` satisfies this spec. The empty stack never does.
    #[must_use]
    pub fn matches(&self, item: &ItemStack) -> bool {
        if item.is_empty() {
            return false;
        }
        match self {
            Self::Exact(spec) => spec.matches(item),
            Self::Fuzzy(spec) => spec.matches(item),
            Self::TagSet(spec) => spec.matches(item),
            Self::Union(spec) => spec.matches(item),
            Self::WithExample(spec) => spec.matches(item),
        }
    }

    /// A stack this spec accepts, or `None` if it currently resolves to
    /// nothing.
    #[must_use]
    pub fn example(&self) -> Option<ItemStack> {
        let example = match self {
            Self::Exact(spec) => spec.example(),
            Self::Fuzzy(spec) => spec.example(),
            Self::TagSet(spec) => spec.example(),
            Self::Union(spec) => spec.example(),
            Self::WithExample(spec) => Some(spec.example.clone()),
        };
        example.filter(|stack| !stack.is_empty())
    }

    /// True iff `example()` is a real item.
    #[must_use]
    pub fn has_item(&self) -> bool {
        self.example().is_some_and(|stack| !stack.is_empty())
    }

    // ------------------------------------------------------------------
    // Combinators
    // ------------------------------------------------------------------

    /// Combine with another alternative.
    ///
    /// On a union this appends `next` in place and returns the same union.
    /// Any other spec becomes the first child of a new union.
    #[must_use]
    pub fn or(self, next: impl Into<ItemSpec>) -> ItemSpec {
        match self {
            Self::Union(mut union) => {
                union.push(next.into());
                Self::Union(union)
            },
            other => Self::union(other).or(next),
        }
    }

    /// Override the example shown for this spec. Matching is unchanged.
    pub fn with_example(self, example: ItemStack) -> Result<ItemSpec, InvalidSpec> {
        if example.is_empty() {
            return Err(InvalidSpec::MissingExample {
                spec: self.to_string(),
            });
        }
        Ok(Self::WithExample(ExampleSpec {
            base: Box::new(self),
            example,
        }))
    }

    /// Override the example with the current example of another spec.
    pub fn with_example_of(self, other: &ItemSpec) -> Result<ItemSpec, InvalidSpec> {
        match other.example() {
            Some(example) => self.with_example(example),
            None => Err(InvalidSpec::MissingExample {
                spec: format!("{self} (example from {other})"),
            }),
        }
    }
}

impl fmt::Display for ItemSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(spec) => fmt::Display::fmt(spec, f),
            Self::Fuzzy(spec) => fmt::Display::fmt(spec, f),
            Self::TagSet(spec) => fmt::Display::fmt(spec, f),
            Self::Union(spec) => fmt::Display::fmt(spec, f),
            Self::WithExample(spec) => fmt::Display::fmt(spec, f),
        }
    }
}

/// Fluent combinators on the concrete spec types returned by the factories.
macro_rules! spec_combinators {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ItemSpec {
                fn from(spec: $ty) -> Self {
                    ItemSpec::$variant(spec)
                }
            }

            impl $ty {
                /// See [`ItemSpec::or`].
                #[must_use]
                pub fn or(self, next: impl Into<ItemSpec>) -> ItemSpec {
                    ItemSpec::from(self).or(next)
                }

                /// See [`ItemSpec::with_example`].
                pub fn with_example(self, example: ItemStack) -> Result<ItemSpec, InvalidSpec> {
                    ItemSpec::from(self).with_example(example)
                }

                /// See [`ItemSpec::with_example_of`].
                pub fn with_example_of(self, other: &ItemSpec) -> Result<ItemSpec, InvalidSpec> {
                    ItemSpec::from(self).with_example_of(other)
                }
            }
        )*
    };
}

spec_combinators!(ExactSpec => Exact, FuzzySpec => Fuzzy);

impl From<UnionSpec> for ItemSpec {
    fn from(spec: UnionSpec) -> Self {
        ItemSpec::Union(spec)
    }
}

// ============================================================================
// Exact
// ============================================================================

/// Matches one resolved item identity.
#[derive(Debug, Clone)]
pub struct ExactSpec {
    /// How the item was resolved, for diagnostics.
    label: String,
    /// Resolved single item, `None` when unresolved.
    item: Option<ItemStack>,
}

impl ExactSpec {
    fn new(label: String, item: Option<ItemStack>) -> Self {
        let item = item.filter(|i| !i.is_empty()).map(|i| i.clone_with_count(1));
        Self { label, item }
    }

    /// Require a specific damage value. No effect on an unresolved spec.
    #[must_use]
    pub fn with_damage(mut self, damage: Damage) -> Self {
        if let Some(item) = self.item.as_mut() {
            item.set_damage(damage);
        }
        self
    }

    /// The resolved item, if any.
    #[must_use]
    pub fn item(&self) -> Option<&ItemStack> {
        self.item.as_ref()
    }

    fn matches(&self, other: &ItemStack) -> bool {
        self.item.as_ref().is_some_and(|item| item.same_identity(other))
    }

    fn example(&self) -> Option<ItemStack> {
        self.item.clone()
    }
}

impl fmt::Display for ExactSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item {
            Some(item) => write!(f, "Exact[{}, {item}]", self.label),
            None => write!(f, "Exact[{}, unresolved]", self.label),
        }
    }
}

// ============================================================================
// Fuzzy
// ============================================================================

/// Matches an item type; damage and tag data are compared only when asked.
#[derive(Debug, Clone)]
pub struct FuzzySpec {
    item: Option<ItemStack>,
    match_damage: bool,
    match_tags: bool,
}

impl FuzzySpec {
    fn new(item: Option<ItemStack>) -> Self {
        Self {
            item: item.filter(|i| !i.is_empty()).map(|i| i.clone_with_count(1)),
            match_damage: false,
            match_tags: false,
        }
    }

    /// Also require the same damage value.
    #[must_use]
    pub const fn match_damage(mut self, enabled: bool) -> Self {
        self.match_damage = enabled;
        self
    }

    /// Also require the same tag data.
    #[must_use]
    pub const fn match_tags(mut self, enabled: bool) -> Self {
        self.match_tags = enabled;
        self
    }

    fn matches(&self, other: &ItemStack) -> bool {
        let Some(item) = &self.item else {
            return false;
        };
        if item.item_type() != other.item_type() {
            return false;
        }
        if self.match_damage && item.damage() != other.damage() {
            return false;
        }
        if self.match_tags && !item.tags_equal(other) {
            return false;
        }
        true
    }

    fn example(&self) -> Option<ItemStack> {
        self.item.clone()
    }
}

impl fmt::Display for FuzzySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item {
            Some(item) => write!(f, "Fuzzy[{item}")?,
            None => write!(f, "Fuzzy[unresolved")?,
        }
        write!(
            f,
            ", match_damage={}, match_tags={}]",
            self.match_damage, self.match_tags
        )
    }
}

// ============================================================================
// TagSet
// ============================================================================

/// Matches any current member of a named tag.
///
/// Membership is looked up on every call, so a recipe using this spec
/// follows later changes to the tag dictionary.
#[derive(Clone)]
pub struct TagSetSpec {
    tag: String,
    dictionary: Arc<dyn TagDictionary>,
}

impl TagSetSpec {
    /// The tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn matches(&self, other: &ItemStack) -> bool {
        self.dictionary
            .members(&self.tag)
            .iter()
            .any(|member| !member.is_empty() && member.same_identity(other))
    }

    /// First real member; host dictionaries may hand out empty stacks.
    fn example(&self) -> Option<ItemStack> {
        self.dictionary
            .members(&self.tag)
            .iter()
            .find(|member| !member.is_empty())
            .cloned()
    }
}

impl fmt::Debug for TagSetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagSetSpec").field("tag", &self.tag).finish_non_exhaustive()
    }
}

impl fmt::Display for TagSetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members = self.dictionary.members(&self.tag);
        write!(f, "TagSet[{}, {} members]", self.tag, members.len())
    }
}

// ============================================================================
// Union
// ============================================================================

/// Matches if any child that currently has an example matches.
#[derive(Debug, Clone)]
pub struct UnionSpec {
    children: Vec<ItemSpec>,
}

impl UnionSpec {
    /// Creates a union with one child.
    #[must_use]
    pub fn new(first: ItemSpec) -> Self {
        Self {
            children: vec![first],
        }
    }

    /// Appends a child in place.
    pub fn push(&mut self, next: ItemSpec) {
        self.children.push(next);
    }

    /// Children in declaration order.
    #[must_use]
    pub fn children(&self) -> &[ItemSpec] {
        &self.children
    }

    fn matches(&self, other: &ItemStack) -> bool {
        self.children
            .iter()
            .any(|child| child.has_item() && child.matches(other))
    }

    fn example(&self) -> Option<ItemStack> {
        self.children.iter().find_map(ItemSpec::example)
    }
}

impl fmt::Display for UnionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Union[")?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{child}")?;
        }
        write!(f, "]")
    }
}

// ============================================================================
// WithExample
// ============================================================================

/// Delegates matching to a base spec but reports its own example.
#[derive(Debug, Clone)]
pub struct ExampleSpec {
    base: Box<ItemSpec>,
    example: ItemStack,
}

impl ExampleSpec {
    /// The wrapped spec.
    #[must_use]
    pub fn base(&self) -> &ItemSpec {
        &self.base
    }

    fn matches(&self, other: &ItemStack) -> bool {
        self.base.matches(other)
    }
}

impl fmt::Display for ExampleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WithExample[example={}, {}]", self.example, self.base)
    }
}

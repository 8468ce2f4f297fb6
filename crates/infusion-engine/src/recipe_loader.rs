//! Recipe pack loading.
//!
//! This module provides:
//! - Loading infusion recipes from `assets/recipes/*.toml`
//! - Resolving spec definitions into `ItemSpec`s against the registries
//! - Registering loaded recipes with an `InfusionSystem`
//!
//! A recipe file looks like:
//!
//! ```toml
//! version = "1.0.0"
//!
//! [[recipes]]
//! name = "Runic Infusion"
//! research = "RUNICARMOR"
//! instability = 2
//! aspects = { praecantatio = 8, tutamen = 8 }
//! output = { catalyst_tag = { key = "RS.HARDEN", data = "1" } }
//! catalyst = { any_of = [{ exact = { item = "thaumcraft:helm" } }, { tag = "runicArmor" }] }
//! ingredients = [
//!     { fuzzy = { item = "thaumcraft:salis" } },
//!     { tag = "gemAmber" },
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use infusion_common::{InvalidSpec, SchemaVersion};
use infusion_crafting::{AspectList, InfusionRecipe, InfusionSystem, MatchPolicy, RecipeOutput};
use infusion_items::{ItemSpec, ItemStack};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::registry_loader::{check_version, ItemKey, ItemRef, Registries};

/// Default asset path for recipes.
pub const DEFAULT_RECIPE_PATH: &str = "assets/recipes";

/// Errors that can occur during recipe loading.
#[derive(Debug, Error)]
pub enum RecipeLoadError {
    /// Failed to read file.
    #[error("Failed to read recipe file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse recipe TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A spec or recipe could not be built.
    #[error("Invalid recipe: {0}")]
    Spec(#[from] InvalidSpec),

    /// The file was written for an incompatible format version.
    #[error("Unsupported file version {actual}, expected {expected}")]
    VersionMismatch {
        /// Version this build reads.
        expected: String,
        /// Version found in the file.
        actual: String,
    },
}

/// Result type for recipe loading operations.
pub type RecipeLoadResult<T> = Result<T, RecipeLoadError>;

/// Fuzzy spec definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyDefinition {
    /// Item type to accept.
    pub item: ItemKey,
    /// Also compare damage.
    #[serde(default)]
    pub match_damage: bool,
    /// Also compare tag data.
    #[serde(default)]
    pub match_tags: bool,
    /// Damage compared when `match_damage` is set.
    #[serde(default)]
    pub damage: u16,
    /// Tag data compared when `match_tags` is set.
    #[serde(default)]
    pub tag_data: Option<String>,
}

/// An item spec as written in a recipe file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecDefinition {
    /// One exact item.
    Exact(ItemRef),
    /// An item type with optional damage / tag comparison.
    Fuzzy(FuzzyDefinition),
    /// Any member of a tag.
    Tag(String),
    /// Any of several specs.
    AnyOf(Vec<SpecDefinition>),
    /// A spec shown with a fixed example.
    WithExample {
        /// Spec that decides matching.
        spec: Box<SpecDefinition>,
        /// Item shown in recipe displays.
        example: ItemRef,
    },
}

/// What a recipe produces, as written in a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputDefinition {
    /// A new item.
    Item(ItemRef),
    /// Tag data written onto the catalyst.
    CatalystTag {
        /// Tag key.
        key: String,
        /// Tag payload.
        #[serde(default)]
        data: String,
    },
}

/// A recipe definition loaded from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDefinition {
    /// Display name used in logs and reports.
    pub name: String,
    /// Research key gating the recipe (empty = ungated).
    #[serde(default)]
    pub research: String,
    /// Instability added while the recipe runs.
    #[serde(default)]
    pub instability: i32,
    /// Aspect costs.
    #[serde(default)]
    pub aspects: AspectList,
    /// Output.
    pub output: OutputDefinition,
    /// Central catalyst.
    pub catalyst: SpecDefinition,
    /// Ingredients in declaration order.
    #[serde(default)]
    pub ingredients: Vec<SpecDefinition>,
    /// Assignment policy; the loader default when absent.
    #[serde(default)]
    pub policy: Option<MatchPolicy>,
}

/// A collection of recipes from a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeFile {
    /// File format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Recipes in this file.
    #[serde(default)]
    pub recipes: Vec<RecipeDefinition>,
}

fn default_version() -> String {
    SchemaVersion::RECIPE_FILE.to_string()
}

impl SpecDefinition {
    /// Builds the spec. Unknown items give unresolved specs, which never
    /// match; only example overrides must name a known item.
    pub fn resolve(&self, registries: &Registries) -> Result<ItemSpec, InvalidSpec> {
        let spec: ItemSpec = match self {
            Self::Exact(item) => match item.resolve(&registries.items) {
                Some(stack) => ItemSpec::exact(stack).into(),
                None => match &item.item {
                    ItemKey::Id(id) => ItemSpec::exact_id(&registries.items, *id).into(),
                    ItemKey::Name(name) => ItemSpec::exact_name(&registries.items, name).into(),
                },
            },
            Self::Fuzzy(def) => {
                let reference = ItemRef {
                    item: def.item.clone(),
                    damage: def.damage,
                    tag_data: def.tag_data.clone(),
                    count: 1,
                };
                let fuzzy = match reference.resolve(&registries.items) {
                    Some(stack) => ItemSpec::fuzzy(stack),
                    None => ItemSpec::fuzzy_type(None),
                };
                fuzzy
                    .match_damage(def.match_damage)
                    .match_tags(def.match_tags)
                    .into()
            },
            Self::Tag(tag) => ItemSpec::tag_set(registries.tag_dictionary(), tag.clone()),
            Self::AnyOf(children) => {
                let mut children = children.iter();
                let first = children.next().ok_or(InvalidSpec::EmptyUnion)?;
                let mut union = ItemSpec::union(first.resolve(registries)?);
                for child in children {
                    union = union.or(child.resolve(registries)?);
                }
                union
            },
            Self::WithExample { spec, example } => {
                let stack = example.resolve(&registries.items).ok_or_else(|| {
                    InvalidSpec::UnknownItem {
                        name: example.item.to_string(),
                    }
                })?;
                spec.resolve(registries)?.with_example(stack.clone_with_count(1))?
            },
        };
        Ok(spec)
    }
}

impl OutputDefinition {
    /// Builds the recipe output. Item outputs must name a known item.
    pub fn resolve(&self, registries: &Registries) -> Result<RecipeOutput, InvalidSpec> {
        match self {
            Self::Item(item) => item
                .resolve(&registries.items)
                .map(RecipeOutput::Item)
                .ok_or_else(|| InvalidSpec::UnknownItem {
                    name: item.item.to_string(),
                }),
            Self::CatalystTag { key, data } => Ok(RecipeOutput::CatalystTag {
                key: key.clone(),
                data: data.as_bytes().to_vec(),
            }),
        }
    }
}

impl RecipeDefinition {
    /// Builds the recipe against the registries.
    pub fn build(
        &self,
        registries: &Registries,
        default_policy: MatchPolicy,
    ) -> Result<InfusionRecipe, InvalidSpec> {
        let ingredients = self
            .ingredients
            .iter()
            .map(|def| def.resolve(registries))
            .collect::<Result<Vec<_>, _>>()?;

        InfusionRecipe::builder(self.research.clone())
            .output(self.output.resolve(registries)?)
            .instability(self.instability)
            .aspects(self.aspects.clone())
            .catalyst(self.catalyst.resolve(registries)?)
            .ingredients(ingredients)
            .policy(self.policy.unwrap_or(default_policy))
            .build()
    }
}

/// A recipe that loaded successfully.
#[derive(Debug, Clone)]
pub struct LoadedRecipe {
    /// Name from the definition.
    pub name: String,
    /// File it came from.
    pub source: PathBuf,
    /// The built recipe.
    pub recipe: InfusionRecipe,
}

/// Statistics for the recipe loader.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RecipeLoaderStats {
    /// Number of files loaded.
    pub files_loaded: u32,
    /// Number of recipes loaded.
    pub recipes_loaded: u32,
    /// Number of files or recipes rejected.
    pub errors: u32,
}

/// Recipe pack loader.
pub struct RecipeLoader {
    /// Base path for recipe files.
    base_path: PathBuf,
    /// Registries specs resolve against.
    registries: Registries,
    /// Policy for recipes that do not name one.
    default_policy: MatchPolicy,
    /// Recipes in load order.
    recipes: Vec<LoadedRecipe>,
    /// Statistics.
    stats: RecipeLoaderStats,
}

impl RecipeLoader {
    /// Creates a new recipe loader.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>, registries: Registries) -> Self {
        let base_path = base_path.into();
        info!("Initializing recipe loader at: {:?}", base_path);

        Self {
            base_path,
            registries,
            default_policy: MatchPolicy::default(),
            recipes: Vec::new(),
            stats: RecipeLoaderStats::default(),
        }
    }

    /// Sets the policy for recipes that do not name one.
    #[must_use]
    pub fn with_default_policy(mut self, policy: MatchPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the registries.
    #[must_use]
    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    /// Returns loader statistics.
    #[must_use]
    pub fn stats(&self) -> &RecipeLoaderStats {
        &self.stats
    }

    /// Returns loaded recipes in load order.
    #[must_use]
    pub fn recipes(&self) -> &[LoadedRecipe] {
        &self.recipes
    }

    /// Loads all recipe files from the base path, in file name order.
    ///
    /// A file or recipe that fails is logged, counted and skipped.
    pub fn load_all(&mut self) -> RecipeLoadResult<()> {
        if !self.base_path.exists() {
            warn!("Recipe directory does not exist: {:?}", self.base_path);
            return Ok(());
        }

        let entries = fs::read_dir(&self.base_path)?.map(|entry| entry.map(|e| e.path()));
        for path in self.recipe_paths(entries) {
            if let Err(e) = self.load_file(&path) {
                warn!("Failed to load recipe file {:?}: {}", path, e);
                self.stats.errors += 1;
            }
        }

        info!(
            "Loaded {} recipes from {} files",
            self.stats.recipes_loaded, self.stats.files_loaded
        );

        Ok(())
    }

    /// Sorted `*.toml` paths among directory entries. Unreadable entries
    /// are logged and counted.
    fn recipe_paths<I>(&mut self, entries: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = std::io::Result<PathBuf>>,
    {
        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.extension().is_some_and(|ext| ext == "toml") => paths.push(path),
                Ok(_) => {},
                Err(e) => {
                    warn!("Failed to read entry in {:?}: {}", self.base_path, e);
                    self.stats.errors += 1;
                },
            }
        }
        paths.sort();
        paths
    }

    /// Loads recipes from a single file.
    pub fn load_file(&mut self, path: &Path) -> RecipeLoadResult<()> {
        debug!("Loading recipe file: {:?}", path);

        let content = fs::read_to_string(path)?;
        let recipe_file: RecipeFile = toml::from_str(&content)?;
        self.load_recipes(&recipe_file, path)?;

        self.stats.files_loaded += 1;
        Ok(())
    }

    /// Builds the recipes of an already parsed file.
    pub fn load_recipes(&mut self, file: &RecipeFile, source: &Path) -> RecipeLoadResult<()> {
        check_version(&file.version, SchemaVersion::RECIPE_FILE)?;

        let mut loaded_count = 0;
        for definition in &file.recipes {
            match definition.build(&self.registries, self.default_policy) {
                Ok(recipe) => {
                    self.recipes.push(LoadedRecipe {
                        name: definition.name.clone(),
                        source: source.to_path_buf(),
                        recipe,
                    });
                    loaded_count += 1;
                },
                Err(e) => {
                    warn!("Invalid recipe {:?} in {:?}: {}", definition.name, source, e);
                    self.stats.errors += 1;
                },
            }
        }

        self.stats.recipes_loaded += loaded_count;
        debug!("Loaded {} recipes from {:?}", loaded_count, source);
        Ok(())
    }

    /// Registers all loaded recipes with an `InfusionSystem`.
    pub fn register_with_system(&self, system: &mut InfusionSystem) {
        for loaded in &self.recipes {
            system.register(loaded.recipe.clone());
        }
        debug!("Registered {} recipes with infusion system", self.recipes.len());
    }
}

/// Example stacks of a recipe for display, catalyst first.
#[must_use]
pub fn display_stacks(recipe: &InfusionRecipe) -> Vec<ItemStack> {
    recipe
        .catalyst_example()
        .into_iter()
        .chain(recipe.component_examples())
        .collect()
}

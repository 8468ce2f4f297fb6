//! Item registry and tag dictionary loading.
//!
//! `items.toml` declares the item names a recipe pack may refer to and the
//! initial members of each tag:
//!
//! ```toml
//! version = "1.0.0"
//!
//! [items]
//! "minecraft:diamond" = 264
//! "minecraft:wool" = 35
//!
//! [tags]
//! gemDiamond = [{ item = "minecraft:diamond" }]
//! woolRed = [{ item = "minecraft:wool", damage = 14 }]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use infusion_common::{ItemTypeId, SchemaVersion};
use infusion_items::{ItemRegistry, ItemStack, ItemStackBuilder, ItemTable, TagDictionary, TagTable};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::recipe_loader::{RecipeLoadError, RecipeLoadResult};

/// Default path of the item registry file.
pub const DEFAULT_REGISTRY_PATH: &str = "assets/items.toml";

/// How a file refers to an item type: by registry name or numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemKey {
    /// Numeric registry id.
    Id(u32),
    /// Registry name.
    Name(String),
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// A concrete item as written in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    /// Item type.
    pub item: ItemKey,
    /// Damage / metadata value.
    #[serde(default)]
    pub damage: u16,
    /// Tag data, stored as UTF-8 bytes.
    #[serde(default)]
    pub tag_data: Option<String>,
    /// Stack size, used for outputs.
    #[serde(default = "default_count")]
    pub count: u32,
}

const fn default_count() -> u32 {
    1
}

impl ItemRef {
    /// Refers to an item by name with default damage, no tag and count one.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            item: ItemKey::Name(name.into()),
            damage: 0,
            tag_data: None,
            count: 1,
        }
    }

    /// Resolve the item type through a registry.
    pub fn resolve_type<R: ItemRegistry + ?Sized>(&self, registry: &R) -> Option<ItemTypeId> {
        match &self.item {
            ItemKey::Id(id) => registry.by_id(*id),
            ItemKey::Name(name) => registry.by_name(name),
        }
    }

    /// Resolve to a stack, or `None` if the item type is unknown.
    pub fn resolve<R: ItemRegistry + ?Sized>(&self, registry: &R) -> Option<ItemStack> {
        let item_type = self.resolve_type(registry)?;
        let mut builder = ItemStackBuilder::new(item_type)
            .count(self.count)
            .damage(self.damage);
        if let Some(tag) = &self.tag_data {
            builder = builder.tag(tag.as_bytes());
        }
        Some(builder.build())
    }
}

/// Contents of an item registry file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryFile {
    /// File format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Item name to numeric id.
    #[serde(default)]
    pub items: BTreeMap<String, u32>,
    /// Tag name to members.
    #[serde(default)]
    pub tags: BTreeMap<String, Vec<ItemRef>>,
}

fn default_version() -> String {
    SchemaVersion::REGISTRY_FILE.to_string()
}

/// The item registry and tag dictionary a recipe pack resolves against.
#[derive(Debug, Default)]
pub struct Registries {
    /// Item names and ids.
    pub items: ItemTable,
    /// Tag membership, shared with the specs that read it.
    pub tags: Arc<TagTable>,
}

impl Registries {
    /// Creates empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads registries from a file.
    pub fn load(path: &Path) -> RecipeLoadResult<Self> {
        debug!("Loading item registry: {:?}", path);
        let content = fs::read_to_string(path)?;
        let file: RegistryFile = toml::from_str(&content)?;
        let registries = Self::from_file(&file)?;
        info!(
            "Loaded {} items and {} tags from {:?}",
            registries.items.len(),
            registries.tags.len(),
            path
        );
        Ok(registries)
    }

    /// Builds registries from parsed file contents.
    ///
    /// Tag members naming unknown items are skipped with a warning.
    pub fn from_file(file: &RegistryFile) -> RecipeLoadResult<Self> {
        check_version(&file.version, SchemaVersion::REGISTRY_FILE)?;

        let mut items = ItemTable::new();
        for (name, id) in &file.items {
            items.register(name.clone(), *id);
        }

        let tags = Arc::new(TagTable::new());
        for (tag, refs) in &file.tags {
            let members: Vec<ItemStack> = refs
                .iter()
                .filter_map(|r| {
                    let stack = r.resolve(&items);
                    if stack.is_none() {
                        warn!("Tag {tag} refers to unknown item {}", r.item);
                    }
                    stack
                })
                .collect();
            tags.register(tag.clone(), members);
        }

        Ok(Self { items, tags })
    }

    /// The tag dictionary as the trait object specs hold.
    #[must_use]
    pub fn tag_dictionary(&self) -> Arc<dyn TagDictionary> {
        self.tags.clone()
    }
}

/// Rejects files whose major version differs from what this build reads.
pub(crate) fn check_version(found: &str, supported: SchemaVersion) -> RecipeLoadResult<()> {
    match SchemaVersion::parse(found) {
        Some(version) if supported.can_read(&version) => Ok(()),
        _ => Err(RecipeLoadError::VersionMismatch {
            expected: supported.to_string(),
            actual: found.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        version = "1.0.0"

        [items]
        "minecraft:diamond" = 264
        "minecraft:wool" = 35

        [tags]
        gemDiamond = [{ item = "minecraft:diamond" }]
        woolRed = [{ item = 35, damage = 14 }, { item = "mod:missing" }]
    "#;

    #[test]
    fn test_parse_registry_file() {
        let file: RegistryFile = toml::from_str(SAMPLE).expect("parse");
        assert_eq!(file.items.get("minecraft:wool"), Some(&35));
        assert_eq!(file.tags["woolRed"][0].item, ItemKey::Id(35));
        assert_eq!(file.tags["woolRed"][0].damage, 14);
    }

    #[test]
    fn test_from_file_resolves_tags() {
        let file: RegistryFile = toml::from_str(SAMPLE).expect("parse");
        let registries = Registries::from_file(&file).expect("build");

        assert_eq!(registries.items.len(), 2);
        let red = registries.tags.members("woolRed");
        assert_eq!(red.len(), 1);
        assert_eq!(red[0], ItemStack::with_damage(ItemTypeId::new(35), 1, 14));
        assert_eq!(registries.tag_dictionary().members("gemDiamond").len(), 1);
    }

    #[test]
    fn test_version_major_mismatch() {
        let file = RegistryFile {
            version: "2.0.0".to_string(),
            ..RegistryFile::default()
        };
        assert!(matches!(
            Registries::from_file(&file),
            Err(RecipeLoadError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_item_ref_resolve_with_tag() {
        let mut items = ItemTable::new();
        items.register("thaumcraft:wand", 4000);
        let r = ItemRef {
            tag_data: Some("cap=gold".to_string()),
            ..ItemRef::named("thaumcraft:wand")
        };

        let stack = r.resolve(&items).expect("resolved");
        assert_eq!(stack.tag(), Some("cap=gold".as_bytes()));
        assert!(ItemRef::named("thaumcraft:staff").resolve(&items).is_none());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("items.toml");
        fs::write(&path, SAMPLE).expect("write");

        let registries = Registries::load(&path).expect("load");
        assert_eq!(registries.items.by_name("minecraft:diamond"), Some(ItemTypeId::new(264)));
    }
}

//! Host registry capabilities.
//!
//! The engine never owns the item registry or the tag dictionary. Specs and
//! loaders reach them through the two traits below. `ItemTable` and
//! `TagTable` are in-memory implementations used by the pack loader and by
//! tests.
//!
//! Tag membership is read through on every call. `TagTable` hands out
//! `Arc` snapshots under a read lock, so a reader sees a member list either
//! before or after a concurrent update, with no guarantee across calls.

use std::sync::Arc;

use ahash::AHashMap;
use infusion_common::ItemTypeId;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::item_stack::ItemStack;

/// Resolves host identifiers to item types.
pub trait ItemRegistry {
    /// Look up an item type by numeric id.
    fn by_id(&self, id: u32) -> Option<ItemTypeId>;

    /// Look up an item type by registry name.
    fn by_name(&self, name: &str) -> Option<ItemTypeId>;
}

/// Resolves a tag name to its current ordered member list.
pub trait TagDictionary: Send + Sync {
    /// Current members of `tag`. Unknown tags resolve to an empty slice.
    fn members(&self, tag: &str) -> Arc<[ItemStack]>;
}

/// In-memory item registry (name <-> numeric id).
#[derive(Debug, Default, Clone)]
pub struct ItemTable {
    by_name: AHashMap<String, ItemTypeId>,
    names: AHashMap<ItemTypeId, String>,
}

impl ItemTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an item name under a numeric id.
    ///
    /// Id 0 is reserved for "no item" and is ignored.
    pub fn register(&mut self, name: impl Into<String>, id: u32) {
        let name = name.into();
        let item = ItemTypeId::new(id);
        if !item.is_valid() {
            warn!("Ignoring item {name}: id 0 is reserved");
            return;
        }
        if let Some(previous) = self.by_name.insert(name.clone(), item) {
            if previous != item {
                warn!("Item {name} re-registered: {previous} -> {item}");
                // Another name may still own the old id.
                if self.names.get(&previous) == Some(&name) {
                    self.names.remove(&previous);
                }
            }
        }
        debug!("Registered item {name} as {item}");
        self.names.insert(item, name);
    }

    /// Returns the registry name of an item type.
    #[must_use]
    pub fn name_of(&self, item: ItemTypeId) -> Option<&str> {
        self.names.get(&item).map(String::as_str)
    }

    /// Returns the number of registered items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns true if no item is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl ItemRegistry for ItemTable {
    fn by_id(&self, id: u32) -> Option<ItemTypeId> {
        let item = ItemTypeId::new(id);
        self.names.contains_key(&item).then_some(item)
    }

    fn by_name(&self, name: &str) -> Option<ItemTypeId> {
        self.by_name.get(name).copied()
    }
}

/// In-memory, shareable tag dictionary.
///
/// All mutation goes through `&self`, so specs holding an `Arc<TagTable>`
/// observe registrations made after they were built.
#[derive(Debug, Default)]
pub struct TagTable {
    tags: RwLock<AHashMap<String, Arc<[ItemStack]>>>,
}

impl TagTable {
    /// Creates an empty tag table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the members of a tag. Empty stacks are skipped and counts
    /// are normalized to one.
    pub fn register(&self, tag: impl Into<String>, members: impl IntoIterator<Item = ItemStack>) {
        let tag = tag.into();
        let members: Vec<ItemStack> = members
            .into_iter()
            .filter(|m| !m.is_empty())
            .map(|m| m.clone_with_count(1))
            .collect();
        debug!("Tag {tag} now has {} members", members.len());
        self.tags.write().insert(tag, members.into());
    }

    /// Appends one member to a tag, creating the tag if needed.
    pub fn add_member(&self, tag: &str, member: ItemStack) {
        if member.is_empty() {
            return;
        }
        let mut tags = self.tags.write();
        let mut members: Vec<ItemStack> = tags.get(tag).map(|m| m.to_vec()).unwrap_or_default();
        members.push(member.clone_with_count(1));
        tags.insert(tag.to_string(), members.into());
    }

    /// Removes a tag entirely.
    pub fn clear_tag(&self, tag: &str) {
        self.tags.write().remove(tag);
    }

    /// Returns the number of known tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.read().len()
    }

    /// Returns true if no tag is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.read().is_empty()
    }
}

impl TagDictionary for TagTable {
    fn members(&self, tag: &str) -> Arc<[ItemStack]> {
        self.tags
            .read()
            .get(tag)
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::<ItemStack>::new()))
    }
}

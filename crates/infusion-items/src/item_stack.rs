//! Item Stack Identity
//!
//! This module provides the item model the matcher reads. A stack is an
//! item type, a damage/variant value, optional tag data and a count. It
//! handles:
//!
//! - Identity comparison (type, damage, tag data)
//! - Unit expansion for consumption matching
//! - The empty stack used wherever a host would pass "no item"
//!
//! # Example
//!
//! ```
//! use infusion_common::ItemTypeId;
//! use infusion_items::item_stack::{ItemStack, ItemStackBuilder};
//!
//! let planks = ItemStack::with_damage(ItemTypeId::new(5), 3, 2);
//! let single = ItemStackBuilder::new(ItemTypeId::new(5)).damage(2).build();
//!
//! assert!(planks.same_identity(&single));
//! assert_eq!(planks.units().count(), 3);
//! ```

use std::fmt;

use infusion_common::ItemTypeId;

/// Damage value type.
pub type Damage = u16;

/// An item stack with identity and count.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemStack {
    /// Item type (NONE = empty/air).
    item_type: ItemTypeId,
    /// Number of items in the stack.
    count: u32,
    /// Item variant/damage value.
    damage: Damage,
    /// Custom tag data. Never `Some` of an empty blob.
    tag: Option<Box<[u8]>>,
}

impl Default for ItemStack {
    fn default() -> Self {
        Self::empty()
    }
}

impl ItemStack {
    /// Create an empty stack.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            item_type: ItemTypeId::NONE,
            count: 0,
            damage: 0,
            tag: None,
        }
    }

    /// Create a new item stack with damage 0 and no tag data.
    #[must_use]
    pub const fn new(item_type: ItemTypeId, count: u32) -> Self {
        Self {
            item_type,
            count,
            damage: 0,
            tag: None,
        }
    }

    /// Create a stack with a damage value.
    #[must_use]
    pub const fn with_damage(item_type: ItemTypeId, count: u32, damage: Damage) -> Self {
        Self {
            item_type,
            count,
            damage,
            tag: None,
        }
    }

    /// Create a single item of the given type.
    #[must_use]
    pub const fn one(item_type: ItemTypeId) -> Self {
        Self::new(item_type, 1)
    }

    /// Get the item type.
    #[must_use]
    pub const fn item_type(&self) -> ItemTypeId {
        self.item_type
    }

    /// Get the stack count.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Get the damage value.
    #[must_use]
    pub const fn damage(&self) -> Damage {
        self.damage
    }

    /// Set the damage value.
    pub fn set_damage(&mut self, damage: Damage) {
        self.damage = damage;
    }

    /// Get custom tag data.
    #[must_use]
    pub fn tag(&self) -> Option<&[u8]> {
        self.tag.as_deref()
    }

    /// Set custom tag data. An empty blob clears the tag.
    pub fn set_tag(&mut self, tag: &[u8]) {
        self.tag = if tag.is_empty() { None } else { Some(tag.into()) };
    }

    /// Check if the stack is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.item_type.is_valid() || self.count == 0
    }

    /// Check whether both stacks carry the same tag data.
    ///
    /// Absent and empty tag data compare equal.
    #[must_use]
    pub fn tags_equal(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }

    /// Check whether both stacks are the same item: type, damage and tag data.
    ///
    /// The count is not part of the identity.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.item_type == other.item_type && self.damage == other.damage && self.tags_equal(other)
    }

    /// Clone the stack with a new count.
    #[must_use]
    pub fn clone_with_count(&self, count: u32) -> Self {
        if count == 0 {
            return Self::empty();
        }
        let mut cloned = self.clone();
        cloned.count = count;
        cloned
    }

    /// Split off up to `amount` items into a new stack.
    ///
    /// The remainder stays in `self`, which becomes empty when exhausted.
    #[must_use]
    pub fn split(&mut self, amount: u32) -> Self {
        if self.is_empty() || amount == 0 {
            return Self::empty();
        }

        let take = amount.min(self.count);
        self.count -= take;
        let split = self.clone_with_count(take);
        if self.count == 0 {
            *self = Self::empty();
        }
        split
    }

    /// Take one item from the stack.
    #[must_use]
    pub fn take_one(&mut self) -> Self {
        self.split(1)
    }

    /// Expand the stack into `count` independent single-item copies.
    ///
    /// An empty stack yields nothing.
    pub fn units(&self) -> impl Iterator<Item = ItemStack> + '_ {
        let n = if self.is_empty() { 0 } else { self.count };
        (0..n).map(move |_| self.clone_with_count(1))
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "empty");
        }
        write!(f, "{}x{}@{}", self.count, self.item_type, self.damage)?;
        if let Some(tag) = self.tag() {
            write!(f, "{{{} bytes}}", tag.len())?;
        }
        Ok(())
    }
}

/// Builder for creating item stacks with tag data.
#[derive(Debug, Clone)]
pub struct ItemStackBuilder {
    stack: ItemStack,
}

impl ItemStackBuilder {
    /// Create a new builder for a single item.
    #[must_use]
    pub const fn new(item_type: ItemTypeId) -> Self {
        Self {
            stack: ItemStack::one(item_type),
        }
    }

    /// Set the count.
    #[must_use]
    pub const fn count(mut self, count: u32) -> Self {
        self.stack.count = count;
        self
    }

    /// Set the damage value.
    #[must_use]
    pub const fn damage(mut self, damage: Damage) -> Self {
        self.stack.damage = damage;
        self
    }

    /// Add tag data.
    #[must_use]
    pub fn tag(mut self, data: &[u8]) -> Self {
        self.stack.set_tag(data);
        self
    }

    /// Build the item stack.
    #[must_use]
    pub fn build(self) -> ItemStack {
        self.stack
    }
}

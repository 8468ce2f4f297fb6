//! Aspect costs of a recipe.
//!
//! The matcher never looks at aspects; they are carried for the host's
//! infusion altar, which drains them while the recipe runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aspect name to amount, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AspectList {
    amounts: BTreeMap<String, u32>,
}

impl AspectList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an amount of an aspect. Amounts for the same aspect accumulate.
    #[must_use]
    pub fn with(mut self, aspect: impl Into<String>, amount: u32) -> Self {
        self.add(aspect, amount);
        self
    }

    /// Add an amount of an aspect in place.
    pub fn add(&mut self, aspect: impl Into<String>, amount: u32) {
        let entry = self.amounts.entry(aspect.into()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Amount of one aspect (0 if absent).
    #[must_use]
    pub fn get(&self, aspect: &str) -> u32 {
        self.amounts.get(aspect).copied().unwrap_or(0)
    }

    /// Sum of all amounts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.amounts.values().map(|&a| u64::from(a)).sum()
    }

    /// Number of distinct aspects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// True if no aspect is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Iterate aspects in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.amounts.iter().map(|(name, &amount)| (name.as_str(), amount))
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for AspectList {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut list = Self::new();
        for (aspect, amount) in iter {
            list.add(aspect, amount);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspects_accumulate() {
        let aspects = AspectList::new()
            .with("praecantatio", 8)
            .with("herba", 4)
            .with("praecantatio", 2);

        assert_eq!(aspects.get("praecantatio"), 10);
        assert_eq!(aspects.get("herba"), 4);
        assert_eq!(aspects.get("ignis"), 0);
        assert_eq!(aspects.len(), 2);
        assert_eq!(aspects.total(), 14);
    }

    #[test]
    fn test_aspects_ordered() {
        let aspects: AspectList = [("terra", 1), ("aer", 2)].into_iter().collect();
        let names: Vec<_> = aspects.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["aer", "terra"]);
    }

    #[test]
    fn test_aspects_serde_transparent() {
        let aspects = AspectList::new().with("aqua", 3);
        let json = serde_json::to_string(&aspects).expect("serialize");
        assert_eq!(json, r#"{"aqua":3}"#);
    }
}

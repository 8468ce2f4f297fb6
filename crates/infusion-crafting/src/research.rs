//! Research gating.
//!
//! A recipe with a non-empty research key only matches for a player who
//! has completed that research. The host decides what "completed" means;
//! the recipe only asks through `ResearchGate`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Answers whether the current player has completed a research key.
pub trait ResearchGate {
    /// True if `research` is complete for the player this gate speaks for.
    fn is_research_complete(&self, research: &str) -> bool;
}

impl<F> ResearchGate for F
where
    F: Fn(&str) -> bool,
{
    fn is_research_complete(&self, research: &str) -> bool {
        self(research)
    }
}

/// Gate that lets every research through.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unrestricted;

impl ResearchGate for Unrestricted {
    fn is_research_complete(&self, _research: &str) -> bool {
        true
    }
}

/// Research keys one player has completed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchLog {
    /// Player the log belongs to.
    player: String,
    /// Completed research keys.
    completed: BTreeSet<String>,
}

impl ResearchLog {
    /// Create an empty log for a player.
    #[must_use]
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            completed: BTreeSet::new(),
        }
    }

    /// The player this log belongs to.
    #[must_use]
    pub fn player(&self) -> &str {
        &self.player
    }

    /// Mark research as complete. Returns true if it was not already.
    pub fn complete(&mut self, research: impl Into<String>) -> bool {
        let research = research.into();
        let added = self.completed.insert(research.clone());
        if added {
            debug!("{} completed research {research}", self.player);
        }
        added
    }

    /// Forget a completed research. Returns true if it was complete.
    pub fn forget(&mut self, research: &str) -> bool {
        self.completed.remove(research)
    }

    /// Number of completed research keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.completed.len()
    }

    /// True if nothing is completed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Completed research keys in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.completed.iter().map(String::as_str)
    }
}

impl ResearchGate for ResearchLog {
    fn is_research_complete(&self, research: &str) -> bool {
        self.completed.contains(research)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_complete_and_forget() {
        let mut log = ResearchLog::new("Azanor");
        assert!(log.complete("INFUSION"));
        assert!(!log.complete("INFUSION"));
        assert!(log.is_research_complete("INFUSION"));
        assert!(!log.is_research_complete("ELDRITCH"));
        assert_eq!(log.len(), 1);

        assert!(log.forget("INFUSION"));
        assert!(!log.is_research_complete("INFUSION"));
        assert!(log.is_empty());
    }

    #[test]
    fn test_closure_gate() {
        let gate = |research: &str| research.starts_with("BASIC");
        assert!(gate.is_research_complete("BASICS"));
        assert!(!gate.is_research_complete("ADVANCED"));
    }

    #[test]
    fn test_unrestricted() {
        assert!(Unrestricted.is_research_complete("ANYTHING"));
    }

    #[test]
    fn test_log_roundtrips_through_json() {
        let mut log = ResearchLog::new("player");
        log.complete("B");
        log.complete("A");
        let json = serde_json::to_string(&log).expect("serialize");
        let restored: ResearchLog = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored.iter().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(restored.player(), "player");
    }
}

//! Consumption matching of candidate stacks against ingredient specs.
//!
//! Candidates are first expanded into single units, each remembering the
//! index of the stack it came from. Every ingredient spec then claims
//! exactly one unit. A match is an exact cover: all specs claim a unit and
//! no unit is left over.
//!
//! Two assignment policies exist:
//!
//! - `Greedy` (default): specs claim, in declaration order, the first
//!   remaining unit they accept. No backtracking, so an ingredient that
//!   could only use a unit an earlier, broader ingredient took will fail
//!   even if another assignment exists.
//! - `Exhaustive`: augmenting-path bipartite matching. Finds an assignment
//!   whenever one exists, in O(specs * units * specs) spec checks at worst.

use infusion_items::{ItemSpec, ItemStack};
use serde::{Deserialize, Serialize};

/// How ingredient specs are assigned to candidate units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// First-fit in ingredient order, no backtracking.
    #[default]
    Greedy,
    /// Search for any valid one-to-one assignment.
    Exhaustive,
}

/// One unit of a candidate stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Index of the candidate stack this unit came from.
    pub source: usize,
    /// The single item.
    pub item: ItemStack,
}

/// Expand candidate stacks into single units, preserving input order.
#[must_use]
pub fn denormalize(candidates: &[ItemStack]) -> Vec<Unit> {
    candidates
        .iter()
        .enumerate()
        .flat_map(|(source, stack)| stack.units().map(move |item| Unit { source, item }))
        .collect()
}

/// Result of assigning specs to units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// Every spec claimed a unit. `sources[i]` is the candidate stack index
    /// of the unit claimed by spec `i`; `leftover` counts unclaimed units.
    Complete {
        /// Candidate stack index per spec.
        sources: Vec<usize>,
        /// Units nobody claimed.
        leftover: usize,
    },
    /// The spec at this index found no unit.
    Unsatisfied(usize),
}

/// Assign each spec one unit according to `policy`.
#[must_use]
pub fn assign(policy: MatchPolicy, specs: &[ItemSpec], units: Vec<Unit>) -> Assignment {
    match policy {
        MatchPolicy::Greedy => assign_greedy(specs, units),
        MatchPolicy::Exhaustive => assign_exhaustive(specs, &units),
    }
}

fn assign_greedy(specs: &[ItemSpec], mut remaining: Vec<Unit>) -> Assignment {
    let mut sources = Vec::with_capacity(specs.len());

    for (index, spec) in specs.iter().enumerate() {
        let Some(pos) = remaining.iter().position(|unit| spec.matches(&unit.item)) else {
            return Assignment::Unsatisfied(index);
        };
        sources.push(remaining.remove(pos).source);
    }

    Assignment::Complete {
        sources,
        leftover: remaining.len(),
    }
}

fn assign_exhaustive(specs: &[ItemSpec], units: &[Unit]) -> Assignment {
    let accepts: Vec<Vec<usize>> = specs
        .iter()
        .map(|spec| {
            units
                .iter()
                .enumerate()
                .filter(|(_, unit)| spec.matches(&unit.item))
                .map(|(u, _)| u)
                .collect()
        })
        .collect();

    // owner[u] = spec currently holding unit u
    let mut owner: Vec<Option<usize>> = vec![None; units.len()];

    for spec in 0..specs.len() {
        let mut seen = vec![false; units.len()];
        if !augment(spec, &accepts, &mut seen, &mut owner) {
            return Assignment::Unsatisfied(spec);
        }
    }

    let mut sources = vec![0; specs.len()];
    for (u, holder) in owner.iter().enumerate() {
        if let Some(spec) = holder {
            sources[*spec] = units[u].source;
        }
    }

    Assignment::Complete {
        sources,
        leftover: units.len() - specs.len(),
    }
}

/// Kuhn's augmenting path step for one spec.
fn augment(
    spec: usize,
    accepts: &[Vec<usize>],
    seen: &mut [bool],
    owner: &mut [Option<usize>],
) -> bool {
    for &u in &accepts[spec] {
        if seen[u] {
            continue;
        }
        seen[u] = true;
        let free = match owner[u] {
            None => true,
            Some(other) => augment(other, accepts, seen, owner),
        };
        if free {
            owner[u] = Some(spec);
            return true;
        }
    }
    false
}

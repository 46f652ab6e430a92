// LuckyDraw - core/dedup.rs
//
// Filters import candidates whose name already exists in the registry.
// Core layer: pure logic, no I/O.

use crate::core::model::Participant;
use std::collections::HashSet;

/// Outcome of filtering an import batch against the registry.
#[derive(Debug, Default)]
pub struct DedupOutcome {
    /// Candidates to append, in their original relative order.
    pub accepted: Vec<Participant>,
    /// Candidates dropped as name collisions. Informational only.
    pub excluded: Vec<Participant>,
}

/// Name key used for collision checks: trimmed and lowercased.
pub fn normalise_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Split `candidates` into those whose normalised name is new to `existing`
/// and those that collide.
///
/// Candidates are not compared with each other: two identical names in one
/// batch are both accepted when neither matches an existing entry.
pub fn filter_against_registry(
    candidates: Vec<Participant>,
    existing: &[Participant],
) -> DedupOutcome {
    let known: HashSet<String> = existing.iter().map(|p| normalise_name(&p.name)).collect();

    let (accepted, excluded): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| !known.contains(&normalise_name(&c.name)));

    tracing::debug!(
        accepted = accepted.len(),
        excluded = excluded.len(),
        "Import candidates deduplicated"
    );

    DedupOutcome { accepted, excluded }
}

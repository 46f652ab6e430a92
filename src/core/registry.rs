// LuckyDraw - core/registry.rs
//
// Participant registry: the ordered candidate pool.
// Core layer: pure logic, no I/O.

use crate::core::model::{IdAllocator, Participant, ParticipantId};
use std::sync::Arc;

/// Ordered pool of participants.
///
/// Insertion order is kept for display only; selection is uniform over the
/// snapshot regardless of position. Names need not be unique here; import
/// dedup is the only place name collisions are rejected.
#[derive(Debug, Default)]
pub struct Registry {
    participants: Vec<Participant>,
    ids: IdAllocator,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant at the end of the pool.
    ///
    /// A name that is blank after trimming is silently ignored and `None` is
    /// returned; the registry is left unchanged.
    pub fn add(&mut self, name: &str, email: Option<&str>) -> Option<&Participant> {
        if name.trim().is_empty() {
            tracing::debug!("Ignoring participant with blank name");
            return None;
        }
        let id = self.ids.next_id();
        let participant = Participant::new(id, name, email)?;
        tracing::debug!(id = %participant.id, name = %participant.name, "Participant added");
        self.participants.push(participant);
        self.participants.last()
    }

    /// Remove the participant with `id`. Returns the removed entry, or `None`
    /// when no such participant exists.
    pub fn remove(&mut self, id: ParticipantId) -> Option<Participant> {
        let pos = self.participants.iter().position(|p| p.id == id)?;
        let removed = self.participants.remove(pos);
        tracing::debug!(id = %removed.id, "Participant removed");
        Some(removed)
    }

    /// Append an accepted import batch in one step.
    pub fn extend_batch(&mut self, batch: Vec<Participant>) {
        if batch.is_empty() {
            return;
        }
        tracing::debug!(count = batch.len(), "Appending import batch");
        self.participants.extend(batch);
    }

    /// Remove every participant. Ids already issued stay retired.
    pub fn reset(&mut self) {
        self.participants.clear();
    }

    /// Immutable copy of the current pool, used for all sampling in a draw.
    pub fn snapshot(&self) -> Arc<[Participant]> {
        Arc::from(self.participants.as_slice())
    }

    /// Id source shared with the import parser.
    pub fn id_allocator(&mut self) -> &mut IdAllocator {
        &mut self.ids
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(registry: &Registry) -> Vec<&str> {
        registry
            .participants()
            .iter()
            .map(|p| p.name.as_str())
            .collect()
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut reg = Registry::new();
        reg.add("Alice", None);
        reg.add("  Bob  ", Some("bob@example.com"));
        assert_eq!(names(&reg), vec!["Alice", "Bob"]);
        assert_eq!(
            reg.participants()[1].email.as_deref(),
            Some("bob@example.com")
        );
    }

    #[test]
    fn test_add_blank_name_is_noop() {
        let mut reg = Registry::new();
        assert!(reg.add("   ", Some("x@example.com")).is_none());
        assert!(reg.add("", None).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_add_allows_duplicate_names() {
        let mut reg = Registry::new();
        let a = reg.add("Sam", None).unwrap().id;
        let b = reg.add("Sam", None).unwrap().id;
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut reg = Registry::new();
        let id = reg.add("Alice", None).unwrap().id;
        assert_eq!(reg.get(id).map(|p| p.name.as_str()), Some("Alice"));
        assert!(reg.remove(id).is_some());
        assert!(reg.remove(id).is_none());
        assert!(reg.get(id).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_reset() {
        let mut reg = Registry::new();
        let first = reg.add("Alice", None).unwrap().id;
        reg.reset();
        assert!(reg.is_empty());
        let second = reg.add("Alice", None).unwrap().id;
        assert_ne!(first, second);
    }

    #[test]
    fn test_snapshot_is_independent_of_later_edits() {
        let mut reg = Registry::new();
        reg.add("A", None);
        let b = reg.add("B", None).unwrap().id;
        let snapshot = reg.snapshot();
        reg.remove(b);
        reg.add("C", None);
        let snap_names: Vec<_> = snapshot.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(snap_names, vec!["A", "B"]);
        assert_eq!(names(&reg), vec!["A", "C"]);
    }
}

// LuckyDraw - core/history.rs
//
// Append-only log of past winners, newest first.

use crate::core::model::Winner;
use std::collections::VecDeque;

/// Past winners, newest first. Storage is unbounded; callers truncate for
/// display with [`History::recent`].
#[derive(Debug, Default)]
pub struct History {
    winners: VecDeque<Winner>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a winner.
    pub fn record(&mut self, winner: Winner) {
        self.winners.push_front(winner);
    }

    /// Forget every recorded winner.
    pub fn clear_all(&mut self) {
        self.winners.clear();
    }

    /// All winners, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Winner> {
        self.winners.iter()
    }

    /// The newest `limit` winners.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &Winner> {
        self.winners.iter().take(limit)
    }

    pub fn latest(&self) -> Option<&Winner> {
        self.winners.front()
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{IdAllocator, Participant};
    use chrono::{TimeZone, Utc};

    fn winner(ids: &mut IdAllocator, name: &str, secs: i64) -> Winner {
        Winner::new(
            Participant::new(ids.next_id(), name, None).unwrap(),
            Utc.timestamp_opt(secs, 0).unwrap(),
        )
    }

    #[test]
    fn test_record_prepends() {
        let mut ids = IdAllocator::new();
        let mut history = History::new();
        history.record(winner(&mut ids, "first", 1));
        history.record(winner(&mut ids, "second", 2));
        history.record(winner(&mut ids, "third", 3));

        let order: Vec<_> = history.iter().map(|w| w.participant.name.as_str()).collect();
        assert_eq!(order, vec!["third", "second", "first"]);
        assert_eq!(history.latest().unwrap().participant.name, "third");
    }

    #[test]
    fn test_recent_truncates_view_only() {
        let mut ids = IdAllocator::new();
        let mut history = History::new();
        for i in 0..12 {
            history.record(winner(&mut ids, &format!("w{i}"), i));
        }
        assert_eq!(history.recent(10).count(), 10);
        assert_eq!(history.len(), 12);
        assert_eq!(history.recent(10).last().unwrap().participant.name, "w2");
    }

    #[test]
    fn test_clear_all() {
        let mut ids = IdAllocator::new();
        let mut history = History::new();
        history.record(winner(&mut ids, "a", 1));
        history.clear_all();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }
}

// LuckyDraw - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies. These types are the shared vocabulary across
// all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// =============================================================================
// Participant identity
// =============================================================================

/// Opaque participant identifier.
///
/// Issued by an [`IdAllocator`] and never reused, even after the participant
/// is removed or the registry is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Monotonic source of participant ids.
///
/// Shared by manual adds and import candidates so the two can never collide.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Issue a fresh id.
    pub fn next_id(&mut self) -> ParticipantId {
        let id = ParticipantId(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Participant
// =============================================================================

/// A named entry in the draw pool.
///
/// `name` is always trimmed and non-empty; construction goes through
/// [`Participant::new`], which enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Participant {
    /// Build a participant from untrimmed input.
    ///
    /// Returns `None` when the name is empty after trimming. An email that is
    /// empty after trimming is stored as no contact.
    pub fn new(id: ParticipantId, name: &str, email: Option<&str>) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        Some(Self {
            id,
            name: name.to_string(),
            email,
        })
    }
}

// =============================================================================
// Winner
// =============================================================================

/// A committed draw result. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Winner {
    pub participant: Participant,
    pub timestamp: DateTime<Utc>,
}

impl Winner {
    pub fn new(participant: Participant, timestamp: DateTime<Utc>) -> Self {
        Self {
            participant,
            timestamp,
        }
    }
}

// =============================================================================
// Import format
// =============================================================================

/// Line format of bulk-import text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ImportFormat {
    /// One name per line.
    #[default]
    #[serde(rename = "names")]
    NamesOnly,

    /// `name<comma-or-tab>email` per line; extra fields ignored.
    #[serde(rename = "name_email")]
    NameAndContact,
}

impl ImportFormat {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ImportFormat::NamesOnly => "Names Only",
            ImportFormat::NameAndContact => "Name & Email",
        }
    }

    /// Parse the config-file spelling (`names` / `name_email`).
    pub fn from_config_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "names" => Some(ImportFormat::NamesOnly),
            "name_email" | "name-email" => Some(ImportFormat::NameAndContact),
            _ => None,
        }
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Draw state machine vocabulary
// =============================================================================

/// Observable state of the draw engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DrawState {
    /// No draw in progress and no winner on display.
    #[default]
    Idle,

    /// Suspense ticks are running. `highlighted` is the transient pick of the
    /// most recent tick (None before the first tick lands); it is never a
    /// committed winner.
    Animating {
        highlighted: Option<Participant>,
        ticks_done: u32,
    },

    /// A winner has been committed and is on display.
    Revealed,
}

impl DrawState {
    pub fn label(&self) -> &'static str {
        match self {
            DrawState::Idle => "Idle",
            DrawState::Animating { .. } => "Animating",
            DrawState::Revealed => "Revealed",
        }
    }
}

/// One scheduled step of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawStep {
    /// Suspense tick with its zero-based sequence number.
    Tick(u32),

    /// Final uniform pick; commits the winner.
    Reveal,

    /// Lowers the celebration flag raised by the reveal.
    CelebrationEnd,
}

/// A scheduled step tagged with the epoch of the draw that scheduled it.
///
/// The engine discards signals whose epoch no longer matches its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawSignal {
    pub epoch: u64,
    pub step: DrawStep,
}

/// The timed plan for one draw, produced when the draw starts.
///
/// Each step carries the delay to wait after the previous step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawSchedule {
    pub epoch: u64,
    pub steps: Vec<(Duration, DrawStep)>,
}

impl DrawSchedule {
    /// Signals in delivery order, ignoring the delays.
    pub fn signals(&self) -> impl Iterator<Item = DrawSignal> + '_ {
        self.steps.iter().map(move |&(_, step)| DrawSignal {
            epoch: self.epoch,
            step,
        })
    }

    /// Sum of all delays in the schedule.
    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|(delay, _)| *delay).sum()
    }
}

/// Effect of applying a draw signal, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawEvent {
    /// A suspense tick published a new highlighted participant.
    Highlighted {
        tick: u32,
        participant: Participant,
    },

    /// The winner was committed and recorded in history.
    Revealed(Winner),

    /// The celebration flag was lowered.
    CelebrationEnded,
}

// =============================================================================
// Statistics
// =============================================================================

/// Summary figures for the stats bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DrawStats {
    pub participants: usize,
    pub total_draws: usize,
    pub win_chance_percent: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_allocator_is_monotonic() {
        let mut ids = IdAllocator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "p1");
    }

    #[test]
    fn test_participant_new_trims_and_rejects_blank() {
        let mut ids = IdAllocator::new();
        let p = Participant::new(ids.next_id(), "  Ada Lovelace ", Some("  ")).unwrap();
        assert_eq!(p.name, "Ada Lovelace");
        assert_eq!(p.email, None);

        assert!(Participant::new(ids.next_id(), " \t ", Some("x@y.z")).is_none());

        let q = Participant::new(ids.next_id(), "Bob", Some(" bob@example.com ")).unwrap();
        assert_eq!(q.email.as_deref(), Some("bob@example.com"));
    }

    #[test]
    fn test_import_format_config_spelling() {
        assert_eq!(
            ImportFormat::from_config_str("names"),
            Some(ImportFormat::NamesOnly)
        );
        assert_eq!(
            ImportFormat::from_config_str(" Name_Email "),
            Some(ImportFormat::NameAndContact)
        );
        assert_eq!(ImportFormat::from_config_str("xml"), None);
    }

    #[test]
    fn test_schedule_signals_carry_epoch() {
        let schedule = DrawSchedule {
            epoch: 7,
            steps: vec![
                (Duration::from_millis(100), DrawStep::Tick(0)),
                (Duration::from_millis(500), DrawStep::Reveal),
            ],
        };
        let signals: Vec<_> = schedule.signals().collect();
        assert_eq!(signals.len(), 2);
        assert!(signals.iter().all(|s| s.epoch == 7));
        assert_eq!(schedule.total_duration(), Duration::from_millis(600));
    }
}

// LuckyDraw - app/state.rs
//
// Application state: the single container for the registry, draw engine,
// history, and pending import. Every user intent is a method here; the
// presentation layer reads state through the accessors and never mutates
// the parts directly.

use crate::core::dedup;
use crate::core::draw::{self, DrawEngine, IndexSource, RngIndexSource};
use crate::core::history::History;
use crate::core::import::ImportDraft;
use crate::core::model::{
    DrawEvent, DrawSchedule, DrawSignal, DrawState, DrawStats, ImportFormat, Participant,
    ParticipantId, Winner,
};
use crate::core::registry::Registry;
use crate::platform::config::AppConfig;

/// Result of accepting a pending import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportOutcome {
    /// Participants appended to the registry.
    pub accepted: usize,
    /// Candidates dropped as name collisions with the registry.
    pub excluded: usize,
}

/// Top-level application state.
pub struct AppState {
    registry: Registry,
    engine: DrawEngine,
    history: History,
    import: ImportDraft,
    index_source: Box<dyn IndexSource + Send>,
    config: AppConfig,
}

impl AppState {
    /// Create initial state with an OS-seeded random source.
    pub fn new(config: AppConfig) -> Self {
        Self::with_index_source(config, Box::new(RngIndexSource::from_entropy()))
    }

    /// Create initial state with a caller-supplied random source.
    pub fn with_index_source(config: AppConfig, index_source: Box<dyn IndexSource + Send>) -> Self {
        Self {
            registry: Registry::new(),
            engine: DrawEngine::new(config.draw.clone()),
            history: History::new(),
            import: ImportDraft::new(config.default_import_format),
            index_source,
            config,
        }
    }

    // -------------------------------------------------------------------------
    // Registry intents
    // -------------------------------------------------------------------------

    /// Add a participant. Blank names are ignored and return `None`.
    pub fn add_participant(&mut self, name: &str, email: Option<&str>) -> Option<ParticipantId> {
        self.registry.add(name, email).map(|p| p.id)
    }

    /// Remove a participant. Returns false when the id is unknown.
    /// An in-flight draw keeps sampling its snapshot.
    pub fn remove_participant(&mut self, id: ParticipantId) -> bool {
        self.registry.remove(id).is_some()
    }

    // -------------------------------------------------------------------------
    // Draw intents
    // -------------------------------------------------------------------------

    /// Start a draw. Returns the schedule to hand to a timer, or `None` when
    /// the registry is empty.
    pub fn start_draw(&mut self) -> Option<DrawSchedule> {
        self.engine.start(&self.registry)
    }

    /// Deliver a scheduled draw step. Stale or out-of-place signals return
    /// `None` and change nothing.
    pub fn apply_signal(&mut self, signal: DrawSignal) -> Option<DrawEvent> {
        self.engine
            .apply(signal, self.index_source.as_mut(), &mut self.history)
    }

    /// Clear the displayed winner, cancelling any in-flight draw.
    pub fn clear_winner(&mut self) {
        self.engine.clear_winner();
    }

    /// Cancel any draw and empty the registry and history.
    pub fn reset_all(&mut self) {
        self.engine.reset();
        self.registry.reset();
        self.history.clear_all();
        tracing::info!("All participants and history cleared");
    }

    // -------------------------------------------------------------------------
    // Import intents
    // -------------------------------------------------------------------------

    pub fn set_import_format(&mut self, format: ImportFormat) {
        self.import.set_format(format, self.registry.id_allocator());
    }

    /// Replace the pending import text (pasted or read from a file).
    pub fn submit_import_text(&mut self, text: &str) {
        self.import.set_text(text, self.registry.id_allocator());
    }

    /// Append the non-colliding preview candidates to the registry in one
    /// step and clear the pending import. An empty preview is a no-op.
    pub fn accept_import(&mut self) -> ImportOutcome {
        if self.import.is_empty() {
            return ImportOutcome::default();
        }
        let candidates = self.import.take_preview();
        let outcome = dedup::filter_against_registry(candidates, self.registry.participants());
        let result = ImportOutcome {
            accepted: outcome.accepted.len(),
            excluded: outcome.excluded.len(),
        };
        self.registry.extend_batch(outcome.accepted);

        tracing::info!(
            accepted = result.accepted,
            excluded = result.excluded,
            total = self.registry.len(),
            "Import accepted"
        );
        result
    }

    /// Discard the pending import.
    pub fn cancel_import(&mut self) {
        self.import.clear();
    }

    // -------------------------------------------------------------------------
    // Read-only views
    // -------------------------------------------------------------------------

    pub fn participants(&self) -> &[Participant] {
        self.registry.participants()
    }

    pub fn draw_state(&self) -> &DrawState {
        self.engine.state()
    }

    pub fn highlighted(&self) -> Option<&Participant> {
        self.engine.highlighted()
    }

    pub fn current_winner(&self) -> Option<&Winner> {
        self.engine.current_winner()
    }

    pub fn is_drawing(&self) -> bool {
        self.engine.is_drawing()
    }

    pub fn is_celebrating(&self) -> bool {
        self.engine.is_celebrating()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Newest winners up to the configured display limit.
    pub fn recent_winners(&self) -> impl Iterator<Item = &Winner> {
        self.history.recent(self.config.history_limit)
    }

    pub fn import_format(&self) -> ImportFormat {
        self.import.format()
    }

    pub fn import_text(&self) -> &str {
        self.import.text()
    }

    pub fn import_preview(&self) -> &[Participant] {
        self.import.preview()
    }

    pub fn import_preview_len(&self) -> usize {
        self.import.len()
    }

    /// Preview rows up to the configured display limit, plus the hidden count.
    pub fn import_preview_page(&self) -> (&[Participant], usize) {
        self.import.display_page(self.config.preview_limit)
    }

    pub fn stats(&self) -> DrawStats {
        DrawStats {
            participants: self.registry.len(),
            total_draws: self.history.len(),
            win_chance_percent: draw::win_chance_percent(self.registry.len()),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("registry", &self.registry)
            .field("engine", &self.engine)
            .field("history", &self.history)
            .field("import", &self.import)
            .finish_non_exhaustive()
    }
}

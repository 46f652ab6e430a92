// LuckyDraw - core/draw.rs
//
// Draw engine: the Idle -> Animating -> Revealed state machine.
//
// Architecture:
//   - `start` snapshots the registry and returns a `DrawSchedule` (the epoch
//     plus the timed steps of the draw). The engine never sleeps; whoever
//     owns the clock delivers the scheduled `DrawSignal`s back via `apply`.
//   - Every cancel (clear, reset, restart) bumps the epoch. Signals carrying
//     an older epoch are discarded, so timers that fire late cannot touch
//     the current state.
//   - All sampling reads the snapshot, never the live registry.
//   - Randomness comes through `IndexSource` so tests can script or seed it.

use crate::core::history::History;
use crate::core::model::{
    DrawEvent, DrawSchedule, DrawSignal, DrawState, DrawStep, Participant, Winner,
};
use crate::core::registry::Registry;
use crate::util::constants;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Randomness
// =============================================================================

/// Source of uniform indices.
pub trait IndexSource {
    /// Uniform index in `0..len`. Callers guarantee `len > 0`.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// [`IndexSource`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngIndexSource<R> {
    rng: R,
}

impl<R: Rng> RngIndexSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngIndexSource<StdRng> {
    /// OS-seeded generator for normal use.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> IndexSource for RngIndexSource<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Timing of a draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawConfig {
    pub tick_count: u32,
    pub tick_interval: Duration,
    pub reveal_delay: Duration,
    pub celebration: Duration,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            tick_count: constants::DEFAULT_TICK_COUNT,
            tick_interval: Duration::from_millis(constants::DEFAULT_TICK_INTERVAL_MS),
            reveal_delay: Duration::from_millis(constants::DEFAULT_REVEAL_DELAY_MS),
            celebration: Duration::from_millis(constants::DEFAULT_CELEBRATION_MS),
        }
    }
}

impl DrawConfig {
    /// Same step sequence with every delay set to zero.
    pub fn instant(&self) -> Self {
        Self {
            tick_count: self.tick_count,
            tick_interval: Duration::ZERO,
            reveal_delay: Duration::ZERO,
            celebration: Duration::ZERO,
        }
    }

    /// Timed plan for one draw: `tick_count` ticks, the reveal, then the end
    /// of the celebration.
    pub fn schedule(&self, epoch: u64) -> DrawSchedule {
        let mut steps = Vec::with_capacity(self.tick_count as usize + 2);
        for tick in 0..self.tick_count {
            steps.push((self.tick_interval, DrawStep::Tick(tick)));
        }
        steps.push((self.reveal_delay, DrawStep::Reveal));
        steps.push((self.celebration, DrawStep::CelebrationEnd));
        DrawSchedule { epoch, steps }
    }
}

/// Pre-draw chance of any single participant winning, rounded to a whole
/// percent. An empty pool reports 0.
pub fn win_chance_percent(pool_size: usize) -> u32 {
    if pool_size == 0 {
        return 0;
    }
    (100.0 / pool_size as f64).round() as u32
}

// =============================================================================
// Engine
// =============================================================================

/// Data of the in-flight draw.
#[derive(Debug)]
struct ActiveDraw {
    snapshot: Arc<[Participant]>,
    ticks_planned: u32,
}

/// Owns the draw state and every transition of it.
#[derive(Debug)]
pub struct DrawEngine {
    config: DrawConfig,
    state: DrawState,
    epoch: u64,
    active: Option<ActiveDraw>,
    current_winner: Option<Winner>,
    celebrating: bool,
}

impl DrawEngine {
    pub fn new(config: DrawConfig) -> Self {
        Self {
            config,
            state: DrawState::Idle,
            epoch: 0,
            active: None,
            current_winner: None,
            celebrating: false,
        }
    }

    /// Begin a draw over a snapshot of `registry`.
    ///
    /// With an empty registry nothing happens and `None` is returned. A draw
    /// already in flight is superseded; a revealed winner is cleared first.
    pub fn start(&mut self, registry: &Registry) -> Option<DrawSchedule> {
        if registry.is_empty() {
            tracing::debug!("Draw requested with empty registry; ignoring");
            return None;
        }
        if self.is_drawing() {
            tracing::info!(epoch = self.epoch, "Superseding in-flight draw");
        }
        self.cancel();

        let snapshot = registry.snapshot();
        let pool = snapshot.len();
        self.active = Some(ActiveDraw {
            snapshot,
            ticks_planned: self.config.tick_count,
        });
        self.state = DrawState::Animating {
            highlighted: None,
            ticks_done: 0,
        };

        tracing::info!(epoch = self.epoch, pool, "Draw started");
        Some(self.config.schedule(self.epoch))
    }

    /// Apply one scheduled step.
    ///
    /// Returns `None` when the signal is stale (older epoch) or does not fit
    /// the current state, in which case nothing changes. On reveal the
    /// winner is prepended to `history`.
    pub fn apply(
        &mut self,
        signal: DrawSignal,
        source: &mut dyn IndexSource,
        history: &mut History,
    ) -> Option<DrawEvent> {
        if signal.epoch != self.epoch {
            tracing::debug!(
                signal_epoch = signal.epoch,
                epoch = self.epoch,
                "Discarding stale draw signal"
            );
            return None;
        }

        match signal.step {
            DrawStep::Tick(tick) => self.tick(tick, source),
            DrawStep::Reveal => self.reveal(source, history),
            DrawStep::CelebrationEnd => {
                if !self.celebrating {
                    return None;
                }
                self.celebrating = false;
                tracing::debug!(epoch = self.epoch, "Celebration ended");
                Some(DrawEvent::CelebrationEnded)
            }
        }
    }

    fn tick(&mut self, tick: u32, source: &mut dyn IndexSource) -> Option<DrawEvent> {
        let ticks_done = match self.state {
            DrawState::Animating { ticks_done, .. } => ticks_done,
            _ => return None,
        };
        let active = self.active.as_ref()?;
        if tick != ticks_done || tick >= active.ticks_planned {
            tracing::debug!(tick, ticks_done, "Out-of-order tick ignored");
            return None;
        }

        let participant = pick(&active.snapshot, source).clone();
        tracing::trace!(tick, name = %participant.name, "Tick");
        self.state = DrawState::Animating {
            highlighted: Some(participant.clone()),
            ticks_done: ticks_done + 1,
        };
        Some(DrawEvent::Highlighted { tick, participant })
    }

    fn reveal(&mut self, source: &mut dyn IndexSource, history: &mut History) -> Option<DrawEvent> {
        let ticks_done = match self.state {
            DrawState::Animating { ticks_done, .. } => ticks_done,
            _ => return None,
        };
        match &self.active {
            Some(active) if active.ticks_planned == ticks_done => {}
            _ => {
                tracing::debug!(ticks_done, "Reveal before ticks completed; ignoring");
                return None;
            }
        }
        let active = self.active.take()?;

        // Independent of whatever the last tick highlighted.
        let participant = pick(&active.snapshot, source).clone();
        let winner = Winner::new(participant, chrono::Utc::now());

        self.state = DrawState::Revealed;
        self.current_winner = Some(winner.clone());
        self.celebrating = true;
        history.record(winner.clone());

        tracing::info!(
            epoch = self.epoch,
            winner_id = %winner.participant.id,
            pool = active.snapshot.len(),
            "Winner revealed"
        );
        tracing::debug!(name = %winner.participant.name, "Winner name");
        Some(DrawEvent::Revealed(winner))
    }

    /// Clear the displayed winner and cancel any in-flight draw.
    pub fn clear_winner(&mut self) {
        if self.is_drawing() {
            tracing::info!(epoch = self.epoch, "Draw cancelled by clear");
        }
        self.cancel();
    }

    /// Return to `Idle`, invalidating every outstanding signal.
    pub fn reset(&mut self) {
        if self.is_drawing() {
            tracing::info!(epoch = self.epoch, "Draw cancelled by reset");
        }
        self.cancel();
    }

    fn cancel(&mut self) {
        self.epoch += 1;
        self.active = None;
        self.state = DrawState::Idle;
        self.current_winner = None;
        self.celebrating = false;
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Transient pick of the latest tick while animating.
    pub fn highlighted(&self) -> Option<&Participant> {
        match &self.state {
            DrawState::Animating { highlighted, .. } => highlighted.as_ref(),
            _ => None,
        }
    }

    pub fn current_winner(&self) -> Option<&Winner> {
        self.current_winner.as_ref()
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebrating
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Animating { .. })
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }
}

fn pick<'a>(snapshot: &'a [Participant], source: &mut dyn IndexSource) -> &'a Participant {
    let idx = source.pick_index(snapshot.len()).min(snapshot.len() - 1);
    &snapshot[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Returns scripted indices, then 0.
    struct Scripted(VecDeque<usize>);

    impl Scripted {
        fn new(indices: &[usize]) -> Self {
            Self(indices.iter().copied().collect())
        }
    }

    impl IndexSource for Scripted {
        fn pick_index(&mut self, _len: usize) -> usize {
            self.0.pop_front().unwrap_or(0)
        }
    }

    fn config(ticks: u32) -> DrawConfig {
        DrawConfig {
            tick_count: ticks,
            ..DrawConfig::default()
        }
        .instant()
    }

    fn registry(names: &[&str]) -> Registry {
        let mut reg = Registry::new();
        for n in names {
            reg.add(n, None);
        }
        reg
    }

    fn run_all(
        engine: &mut DrawEngine,
        schedule: &DrawSchedule,
        source: &mut dyn IndexSource,
        history: &mut History,
    ) -> Vec<DrawEvent> {
        schedule
            .signals()
            .filter_map(|s| engine.apply(s, source, history))
            .collect()
    }

    #[test]
    fn test_start_with_empty_registry_is_noop() {
        let mut engine = DrawEngine::new(config(3));
        assert!(engine.start(&Registry::new()).is_none());
        assert_eq!(engine.state(), &DrawState::Idle);
        assert_eq!(engine.epoch(), 0);
    }

    #[test]
    fn test_schedule_shape_matches_reference_timing() {
        let schedule = DrawConfig::default().schedule(4);
        assert_eq!(schedule.steps.len(), 22);
        assert_eq!(schedule.steps[0], (Duration::from_millis(100), DrawStep::Tick(0)));
        assert_eq!(schedule.steps[20], (Duration::from_millis(500), DrawStep::Reveal));
        assert_eq!(
            schedule.steps[21],
            (Duration::from_millis(3_000), DrawStep::CelebrationEnd)
        );
        assert_eq!(schedule.total_duration(), Duration::from_millis(5_500));
    }

    #[test]
    fn test_full_draw_final_pick_independent_of_last_tick() {
        let reg = registry(&["A", "B", "C"]);
        let mut engine = DrawEngine::new(config(2));
        let mut history = History::new();
        // Ticks pick A then B; the reveal picks C.
        let mut source = Scripted::new(&[0, 1, 2]);

        let schedule = engine.start(&reg).unwrap();
        let mut signals = schedule.signals();

        let ev = engine.apply(signals.next().unwrap(), &mut source, &mut history);
        assert!(matches!(ev, Some(DrawEvent::Highlighted { tick: 0, .. })));
        assert_eq!(engine.highlighted().unwrap().name, "A");

        engine.apply(signals.next().unwrap(), &mut source, &mut history);
        assert_eq!(engine.highlighted().unwrap().name, "B");
        assert!(engine.current_winner().is_none());
        assert!(history.is_empty());

        let ev = engine.apply(signals.next().unwrap(), &mut source, &mut history);
        match ev {
            Some(DrawEvent::Revealed(w)) => assert_eq!(w.participant.name, "C"),
            other => panic!("expected reveal, got {other:?}"),
        }
        assert_eq!(engine.state(), &DrawState::Revealed);
        assert!(engine.is_celebrating());
        assert_eq!(history.len(), 1);
        assert_eq!(engine.current_winner().unwrap().participant.name, "C");

        let ev = engine.apply(signals.next().unwrap(), &mut source, &mut history);
        assert_eq!(ev, Some(DrawEvent::CelebrationEnded));
        assert!(!engine.is_celebrating());
        assert_eq!(engine.state(), &DrawState::Revealed);
    }

    #[test]
    fn test_snapshot_isolation_after_removal() {
        let mut reg = registry(&["A", "B", "C"]);
        let b = reg.participants()[1].id;
        let mut engine = DrawEngine::new(config(1));
        let mut history = History::new();
        let mut source = Scripted::new(&[1, 1]);

        let schedule = engine.start(&reg).unwrap();
        reg.remove(b);
        reg.remove(reg.participants()[0].id);

        let events = run_all(&mut engine, &schedule, &mut source, &mut history);
        let winner = events
            .iter()
            .find_map(|e| match e {
                DrawEvent::Revealed(w) => Some(w),
                _ => None,
            })
            .expect("draw should reveal");
        assert_eq!(winner.participant.name, "B");
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_stale_signals_discarded_after_clear() {
        let reg = registry(&["A", "B"]);
        let mut engine = DrawEngine::new(config(3));
        let mut history = History::new();
        let mut source = Scripted::new(&[]);

        let schedule = engine.start(&reg).unwrap();
        let mut signals = schedule.signals();
        engine.apply(signals.next().unwrap(), &mut source, &mut history);
        engine.clear_winner();

        for signal in signals {
            assert!(engine.apply(signal, &mut source, &mut history).is_none());
        }
        assert_eq!(engine.state(), &DrawState::Idle);
        assert!(engine.current_winner().is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn test_restart_supersedes_previous_draw() {
        let reg = registry(&["A", "B"]);
        let mut engine = DrawEngine::new(config(1));
        let mut history = History::new();
        let mut source = Scripted::new(&[]);

        let first = engine.start(&reg).unwrap();
        let second = engine.start(&reg).unwrap();
        assert!(second.epoch > first.epoch);

        assert!(run_all(&mut engine, &first, &mut source, &mut history).is_empty());
        assert!(engine.is_drawing());

        let events = run_all(&mut engine, &second, &mut source, &mut history);
        assert_eq!(events.len(), 3);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_start_from_revealed_clears_winner() {
        let reg = registry(&["A"]);
        let mut engine = DrawEngine::new(config(1));
        let mut history = History::new();
        let mut source = Scripted::new(&[]);

        let first = engine.start(&reg).unwrap();
        run_all(&mut engine, &first, &mut source, &mut history);
        assert!(engine.current_winner().is_some());

        let second = engine.start(&reg).unwrap();
        assert!(engine.current_winner().is_none());
        assert!(!engine.is_celebrating());

        // The first draw's celebration end must not lower a later flag.
        let late = DrawSignal {
            epoch: first.epoch,
            step: DrawStep::CelebrationEnd,
        };
        assert!(engine.apply(late, &mut source, &mut history).is_none());
        run_all(&mut engine, &second, &mut source, &mut history);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_out_of_order_steps_ignored() {
        let reg = registry(&["A", "B"]);
        let mut engine = DrawEngine::new(config(2));
        let mut history = History::new();
        let mut source = Scripted::new(&[]);
        let schedule = engine.start(&reg).unwrap();
        let epoch = schedule.epoch;

        let reveal = DrawSignal {
            epoch,
            step: DrawStep::Reveal,
        };
        assert!(engine.apply(reveal, &mut source, &mut history).is_none());

        let skip_ahead = DrawSignal {
            epoch,
            step: DrawStep::Tick(1),
        };
        assert!(engine.apply(skip_ahead, &mut source, &mut history).is_none());
        assert_eq!(
            engine.state(),
            &DrawState::Animating {
                highlighted: None,
                ticks_done: 0
            }
        );
        assert!(history.is_empty());
    }

    #[test]
    fn test_reveal_frequencies_are_uniform() {
        let reg = registry(&["A", "B", "C", "D"]);
        let mut engine = DrawEngine::new(config(1));
        let mut history = History::new();
        let mut source = RngIndexSource::seeded(0x5eed);

        let trials = 4_000;
        for _ in 0..trials {
            let schedule = engine.start(&reg).unwrap();
            run_all(&mut engine, &schedule, &mut source, &mut history);
        }
        assert_eq!(history.len(), trials);

        for name in ["A", "B", "C", "D"] {
            let hits = history.iter().filter(|w| w.participant.name == name).count();
            // Expected 1000, sd ~27.
            assert!(
                (850..=1150).contains(&hits),
                "{name} won {hits} of {trials} draws"
            );
        }
    }

    #[test]
    fn test_win_chance_percent() {
        assert_eq!(win_chance_percent(0), 0);
        assert_eq!(win_chance_percent(1), 100);
        assert_eq!(win_chance_percent(3), 33);
        assert_eq!(win_chance_percent(4), 25);
        assert_eq!(win_chance_percent(8), 13);
    }
}

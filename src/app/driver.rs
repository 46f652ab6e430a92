// LuckyDraw - app/driver.rs
//
// Wires `AppState` to a `DrawTimer`: starting a draw hands its schedule to
// the timer, and each frame the owner calls `pump` to apply whatever signals
// are due. Cancelling intents stop the timer as well as the engine.

use crate::app::draw_timer::DrawTimer;
use crate::app::state::AppState;
use crate::core::model::{DrawEvent, Winner};
use std::time::Duration;

/// Application state plus the timer that animates its draws.
pub struct DrawDriver {
    state: AppState,
    timer: DrawTimer,
}

impl DrawDriver {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            timer: DrawTimer::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Mutable access for registry and import intents, which do not
    /// interact with the timer.
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Start a draw and its timer. Returns false when the registry is empty.
    pub fn start_draw(&mut self) -> bool {
        match self.state.start_draw() {
            Some(schedule) => {
                self.timer.start(schedule);
                true
            }
            None => false,
        }
    }

    /// Apply every due signal, returning the resulting events in order.
    pub fn pump(&mut self) -> Vec<DrawEvent> {
        self.timer
            .poll_signals()
            .into_iter()
            .filter_map(|signal| self.state.apply_signal(signal))
            .collect()
    }

    /// True while the timer still has steps to deliver (including the
    /// celebration end after a reveal).
    pub fn is_busy(&self) -> bool {
        self.timer.is_active()
    }

    pub fn clear_winner(&mut self) {
        self.timer.stop();
        self.state.clear_winner();
    }

    pub fn reset_all(&mut self) {
        self.timer.stop();
        self.state.reset_all();
    }

    /// Run one draw to completion, polling every `frame`.
    ///
    /// `on_event` sees each event together with the state after it was
    /// applied. Returns the winner, or `None` when the registry is empty.
    pub fn run_draw(
        &mut self,
        frame: Duration,
        mut on_event: impl FnMut(&DrawEvent, &AppState),
    ) -> Option<Winner> {
        if !self.start_draw() {
            return None;
        }
        let mut winner = None;
        while self.is_busy() {
            std::thread::sleep(frame);
            for event in self.pump() {
                if let DrawEvent::Revealed(w) = &event {
                    winner = Some(w.clone());
                }
                on_event(&event, &self.state);
            }
        }
        winner
    }
}

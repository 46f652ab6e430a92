// LuckyDraw - app/draw_timer.rs
//
// Draw timer: delivers the scheduled steps of a draw at their due times.
//
// Architecture:
//   - `DrawTimer` lives on the owning (UI) thread; `run_draw_timer` runs on a
//     background thread that only sleeps and sends. It holds no draw state.
//   - Each `DrawSignal` is sent over an mpsc channel; the owner polls the
//     channel and feeds signals to `AppState::apply_signal`, so every state
//     change happens on the owner's thread in schedule order.
//   - An `Arc<AtomicBool>` cancel flag stops the thread; sleeps are sliced so
//     cancel is noticed within DRAW_CANCEL_CHECK_INTERVAL_MS.
//   - Signals already queued when a draw is superseded are dropped with the
//     receiver, and the engine's epoch check rejects any that slip through.

use crate::core::model::{DrawSchedule, DrawSignal};
use crate::util::constants::DRAW_CANCEL_CHECK_INTERVAL_MS;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

/// Runs one draw schedule at a time on a background thread.
pub struct DrawTimer {
    /// Channel receiver for the owner to poll due signals.
    signal_rx: Option<mpsc::Receiver<DrawSignal>>,
    /// Cancel flag shared with the background thread.
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl DrawTimer {
    pub fn new() -> Self {
        Self {
            signal_rx: None,
            cancel_flag: None,
        }
    }

    /// Start delivering `schedule`. A schedule already running is stopped first.
    pub fn start(&mut self, schedule: DrawSchedule) {
        self.stop();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        self.signal_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));

        let epoch = schedule.epoch;
        let steps = schedule.steps.len();
        std::thread::spawn(move || {
            run_draw_timer(schedule, tx, cancel);
        });

        tracing::debug!(epoch, steps, "Draw timer started");
    }

    /// Stop the background thread and drop any undelivered signals.
    pub fn stop(&mut self) {
        if let Some(flag) = &self.cancel_flag {
            flag.store(true, Ordering::SeqCst);
        }
        self.cancel_flag = None;
        self.signal_rx = None;
    }

    /// Returns `true` while a schedule still has signals to deliver.
    pub fn is_active(&self) -> bool {
        self.signal_rx.is_some()
    }

    /// Drain the signals that are due, without blocking.
    ///
    /// Once the thread has delivered its last step and the channel is empty,
    /// the timer becomes inactive.
    pub fn poll_signals(&mut self) -> Vec<DrawSignal> {
        let mut signals = Vec::new();
        let mut finished = false;
        if let Some(ref rx) = self.signal_rx {
            loop {
                match rx.try_recv() {
                    Ok(signal) => signals.push(signal),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        finished = true;
                        break;
                    }
                }
            }
        }
        if finished {
            self.signal_rx = None;
            self.cancel_flag = None;
        }
        signals
    }
}

impl Default for DrawTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DrawTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Background loop: sleep each step's delay, then send its signal.
fn run_draw_timer(schedule: DrawSchedule, tx: mpsc::Sender<DrawSignal>, cancel: Arc<AtomicBool>) {
    let slice = Duration::from_millis(DRAW_CANCEL_CHECK_INTERVAL_MS);

    for (delay, step) in schedule.steps {
        // Interruptible sleep: check cancel flag between slices.
        let mut remaining = delay;
        while !remaining.is_zero() {
            let nap = remaining.min(slice);
            std::thread::sleep(nap);
            remaining -= nap;
            if cancel.load(Ordering::SeqCst) {
                tracing::debug!(epoch = schedule.epoch, "Draw timer cancelled");
                return;
            }
        }
        if cancel.load(Ordering::SeqCst) {
            tracing::debug!(epoch = schedule.epoch, "Draw timer cancelled");
            return;
        }

        let signal = DrawSignal {
            epoch: schedule.epoch,
            step,
        };
        if tx.send(signal).is_err() {
            // Owner dropped the receiver; exit quietly.
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::draw::DrawConfig;
    use crate::core::model::DrawStep;
    use std::time::Instant;

    fn drain(timer: &mut DrawTimer, deadline: Duration) -> Vec<DrawSignal> {
        let start = Instant::now();
        let mut out = Vec::new();
        while timer.is_active() && start.elapsed() < deadline {
            out.extend(timer.poll_signals());
            std::thread::sleep(Duration::from_millis(1));
        }
        out
    }

    #[test]
    fn test_delivers_all_steps_in_order() {
        let config = DrawConfig {
            tick_count: 3,
            ..DrawConfig::default()
        }
        .instant();
        let schedule = config.schedule(9);
        let expected: Vec<_> = schedule.signals().collect();

        let mut timer = DrawTimer::new();
        timer.start(schedule);
        let got = drain(&mut timer, Duration::from_secs(5));

        assert_eq!(got, expected);
        assert!(!timer.is_active());
    }

    #[test]
    fn test_stop_prevents_further_signals() {
        let schedule = DrawSchedule {
            epoch: 1,
            steps: vec![
                (Duration::ZERO, DrawStep::Tick(0)),
                (Duration::from_secs(30), DrawStep::Reveal),
            ],
        };
        let mut timer = DrawTimer::new();
        timer.start(schedule);
        timer.stop();
        assert!(!timer.is_active());
        assert!(timer.poll_signals().is_empty());
    }

    #[test]
    fn test_restart_replaces_previous_schedule() {
        let slow = DrawSchedule {
            epoch: 1,
            steps: vec![(Duration::from_secs(30), DrawStep::Reveal)],
        };
        let fast = DrawSchedule {
            epoch: 2,
            steps: vec![(Duration::ZERO, DrawStep::Reveal)],
        };
        let mut timer = DrawTimer::new();
        timer.start(slow);
        timer.start(fast);
        let got = drain(&mut timer, Duration::from_secs(5));
        assert_eq!(
            got,
            vec![DrawSignal {
                epoch: 2,
                step: DrawStep::Reveal
            }]
        );
    }
}

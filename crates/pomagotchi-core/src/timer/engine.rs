//! Timer engine implementation.
//!
//! The engine is a whole-second countdown. It does not own a thread or a
//! timer: ticking is requested from an injected [`TickScheduler`] and the
//! host calls `tick()` each time the scheduler fires.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running
//!           |          |
//!           +--> Idle <+   (completion, reset)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(SelectedDuration::default(), ticker);
//! engine.start();
//! // Each time the scheduler fires:
//! if let Some(Event::TimerExpired { .. }) = engine.tick() { /* complete */ }
//! ```

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::duration::SelectedDuration;
use super::ticker::TickScheduler;
use crate::events::Event;

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
}

/// Countdown state.
///
/// `is_running` and `is_paused` are never both set, and the remaining time
/// never exceeds `initial_total_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    #[serde(rename = "minutes")]
    pub remaining_minutes: u32,
    #[serde(rename = "seconds")]
    pub remaining_seconds: u32,
    pub is_running: bool,
    pub is_paused: bool,
    pub initial_total_seconds: u32,
}

impl TimerState {
    /// An idle countdown loaded with `duration`.
    pub fn from_duration(duration: SelectedDuration) -> Self {
        Self {
            remaining_minutes: duration.minutes,
            remaining_seconds: duration.seconds,
            is_running: false,
            is_paused: false,
            initial_total_seconds: duration.total_seconds(),
        }
    }

    pub fn phase(&self) -> TimerPhase {
        if self.is_running {
            TimerPhase::Running
        } else if self.is_paused {
            TimerPhase::Paused
        } else {
            TimerPhase::Idle
        }
    }

    pub fn remaining_total_seconds(&self) -> u32 {
        self.remaining_minutes
            .saturating_mul(60)
            .saturating_add(self.remaining_seconds)
    }

    /// Seconds already counted down in this session.
    pub fn elapsed_seconds(&self) -> u32 {
        self.initial_total_seconds
            .saturating_sub(self.remaining_total_seconds())
    }

    /// Bring externally supplied state back within the invariants.
    ///
    /// A running countdown becomes paused: no tick schedule survives the
    /// trip through storage.
    fn settled(mut self) -> Self {
        let remaining = SelectedDuration::new(self.remaining_minutes, self.remaining_seconds);
        self.remaining_minutes = remaining.minutes;
        self.remaining_seconds = remaining.seconds;
        self.initial_total_seconds = self.initial_total_seconds.max(remaining.total_seconds());
        if self.is_running {
            self.is_running = false;
            self.is_paused = true;
        }
        self
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::from_duration(SelectedDuration::default())
    }
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}",
            self.remaining_minutes, self.remaining_seconds
        )
    }
}

/// Core timer engine.
#[derive(Debug)]
pub struct TimerEngine<S> {
    state: TimerState,
    selected: SelectedDuration,
    tick_period: Duration,
    scheduler: S,
}

impl<S: TickScheduler> TimerEngine<S> {
    /// Create an idle engine loaded with `selected`.
    pub fn new(selected: SelectedDuration, scheduler: S) -> Self {
        Self {
            state: TimerState::from_duration(selected),
            selected,
            tick_period: DEFAULT_TICK_PERIOD,
            scheduler,
        }
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn selected(&self) -> SelectedDuration {
        self.selected
    }

    pub fn phase(&self) -> TimerPhase {
        self.state.phase()
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Early completion is only meaningful for a session in progress.
    pub fn can_complete(&self) -> bool {
        self.state.is_running || self.state.is_paused
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Select a new duration. Ignored while running; a zero duration is
    /// ignored as well.
    pub fn set_duration(&mut self, minutes: u32, seconds: u32) -> Option<Event> {
        if self.state.is_running {
            return None;
        }
        let duration = SelectedDuration::new(minutes, seconds);
        if duration.is_zero() {
            debug!("ignoring zero-length duration");
            return None;
        }
        self.selected = duration;
        self.state.remaining_minutes = duration.minutes;
        self.state.remaining_seconds = duration.seconds;
        self.state.initial_total_seconds = duration.total_seconds();
        Some(Event::DurationSelected {
            minutes: duration.minutes,
            seconds: duration.seconds,
            at: Utc::now(),
        })
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_running {
            return None;
        }
        let resumed = self.state.is_paused;
        self.state.is_running = true;
        self.state.is_paused = false;
        self.scheduler.cancel();
        self.scheduler.schedule(self.tick_period);
        Some(Event::TimerStarted {
            remaining_secs: self.state.remaining_total_seconds(),
            resumed,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `TimerTicked` after a decrement, `TimerExpired` when the
    /// countdown was already at 0:00, and `None` when not running.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        if self.state.remaining_seconds == 0 {
            if self.state.remaining_minutes == 0 {
                return Some(Event::TimerExpired {
                    initial_total_secs: self.state.initial_total_seconds,
                    at: Utc::now(),
                });
            }
            self.state.remaining_minutes -= 1;
            self.state.remaining_seconds = 59;
        } else {
            self.state.remaining_seconds -= 1;
        }
        Some(Event::TimerTicked {
            remaining_secs: self.state.remaining_total_seconds(),
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.scheduler.cancel();
        self.state.is_running = false;
        self.state.is_paused = true;
        Some(Event::TimerPaused {
            remaining_secs: self.state.remaining_total_seconds(),
            at: Utc::now(),
        })
    }

    /// Stop and reload the selected duration. Valid from any phase.
    pub fn reset(&mut self) -> Event {
        self.scheduler.cancel();
        self.state = TimerState::from_duration(self.selected);
        Event::TimerReset {
            remaining_secs: self.state.remaining_total_seconds(),
            at: Utc::now(),
        }
    }

    /// Stop ticking and clear the running flags, keeping the remaining time
    /// so the elapsed part of the session can still be measured.
    pub fn stop(&mut self) {
        self.scheduler.cancel();
        self.state.is_running = false;
        self.state.is_paused = false;
    }

    /// Adopt state that came from storage or from an undo snapshot.
    pub fn restore(&mut self, state: TimerState, selected: SelectedDuration) {
        self.scheduler.cancel();
        self.selected = if selected.is_zero() {
            SelectedDuration::default()
        } else {
            selected
        };
        let state = state.settled();
        // An empty countdown would complete on its first tick.
        self.state = if state.initial_total_seconds == 0 {
            TimerState::from_duration(self.selected)
        } else {
            state
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualTicker;

    fn engine(minutes: u32, seconds: u32) -> TimerEngine<ManualTicker> {
        TimerEngine::new(SelectedDuration::new(minutes, seconds), ManualTicker::default())
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = engine(25, 0);
        assert_eq!(engine.phase(), TimerPhase::Idle);

        assert!(engine.start().is_some());
        assert_eq!(engine.phase(), TimerPhase::Running);
        assert!(engine.scheduler().is_active());

        assert!(engine.pause().is_some());
        assert_eq!(engine.phase(), TimerPhase::Paused);
        assert!(!engine.scheduler().is_active());

        match engine.start() {
            Some(Event::TimerStarted { resumed, .. }) => assert!(resumed),
            other => panic!("Expected TimerStarted, got {other:?}"),
        }
        assert_eq!(engine.phase(), TimerPhase::Running);
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut engine = engine(25, 0);
        engine.start();
        assert!(engine.start().is_none());
        assert_eq!(engine.scheduler().schedule_count(), 1);
    }

    #[test]
    fn tick_borrows_from_minutes() {
        let mut engine = engine(1, 0);
        engine.start();
        engine.tick();
        assert_eq!(engine.state().remaining_minutes, 0);
        assert_eq!(engine.state().remaining_seconds, 59);
    }

    #[test]
    fn tick_at_zero_signals_expiry() {
        let mut engine = engine(0, 1);
        engine.start();
        engine.tick();
        assert_eq!(engine.state().remaining_total_seconds(), 0);
        match engine.tick() {
            Some(Event::TimerExpired { initial_total_secs, .. }) => {
                assert_eq!(initial_total_secs, 1)
            }
            other => panic!("Expected TimerExpired, got {other:?}"),
        }
        assert_eq!(engine.state().remaining_minutes, 0);
        assert_eq!(engine.state().remaining_seconds, 0);
    }

    #[test]
    fn tick_while_idle_does_nothing() {
        let mut engine = engine(1, 0);
        assert!(engine.tick().is_none());
        assert_eq!(engine.state().remaining_total_seconds(), 60);
    }

    #[test]
    fn pause_while_idle_is_noop() {
        let mut engine = engine(25, 0);
        let before = *engine.state();
        assert!(engine.pause().is_none());
        assert_eq!(*engine.state(), before);
        assert_eq!(engine.scheduler().cancel_count(), 0);
    }

    #[test]
    fn set_duration_ignored_while_running() {
        let mut engine = engine(25, 0);
        engine.start();
        assert!(engine.set_duration(5, 0).is_none());
        assert_eq!(engine.selected(), SelectedDuration::new(25, 0));
        assert_eq!(engine.state().initial_total_seconds, 1500);
    }

    #[test]
    fn set_duration_while_paused_reloads_countdown() {
        let mut engine = engine(25, 0);
        engine.start();
        engine.tick();
        engine.pause();
        assert!(engine.set_duration(5, 30).is_some());
        assert_eq!(engine.state().remaining_minutes, 5);
        assert_eq!(engine.state().remaining_seconds, 30);
        assert_eq!(engine.state().initial_total_seconds, 330);
        assert_eq!(engine.selected(), SelectedDuration::new(5, 30));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut engine = engine(25, 0);
        assert!(engine.set_duration(0, 0).is_none());
        assert_eq!(engine.state().initial_total_seconds, 1500);
    }

    #[test]
    fn reset_restores_selected_duration_and_cancels() {
        let mut engine = engine(0, 10);
        engine.start();
        engine.tick();
        engine.tick();
        engine.reset();
        assert_eq!(engine.phase(), TimerPhase::Idle);
        assert_eq!(engine.state().remaining_total_seconds(), 10);
        assert_eq!(engine.state().initial_total_seconds, 10);
        assert!(!engine.scheduler().is_active());
    }

    #[test]
    fn stop_keeps_remaining_time() {
        let mut engine = engine(0, 10);
        engine.start();
        engine.tick();
        engine.stop();
        assert_eq!(engine.phase(), TimerPhase::Idle);
        assert_eq!(engine.state().elapsed_seconds(), 1);
        assert!(!engine.scheduler().is_active());
    }

    #[test]
    fn restore_turns_running_into_paused() {
        let mut engine = engine(25, 0);
        let stored = TimerState {
            remaining_minutes: 3,
            remaining_seconds: 0,
            is_running: true,
            is_paused: false,
            initial_total_seconds: 600,
        };
        engine.restore(stored, SelectedDuration::new(10, 0));
        assert_eq!(engine.phase(), TimerPhase::Paused);
        assert!(engine.can_complete());
        assert_eq!(engine.state().elapsed_seconds(), 420);
    }

    #[test]
    fn restore_clamps_initial_total_to_remaining() {
        let mut engine = engine(25, 0);
        let stored = TimerState {
            remaining_minutes: 2,
            remaining_seconds: 90,
            is_running: false,
            is_paused: false,
            initial_total_seconds: 60,
        };
        engine.restore(stored, SelectedDuration::default());
        assert_eq!(engine.state().remaining_minutes, 3);
        assert_eq!(engine.state().remaining_seconds, 30);
        assert_eq!(engine.state().initial_total_seconds, 210);
    }

    #[test]
    fn restore_replaces_empty_countdown() {
        let mut engine = engine(25, 0);
        let stored = TimerState {
            remaining_minutes: 0,
            remaining_seconds: 0,
            is_running: false,
            is_paused: false,
            initial_total_seconds: 0,
        };
        engine.restore(stored, SelectedDuration::new(0, 0));
        assert_eq!(engine.selected(), SelectedDuration::default());
        assert_eq!(engine.state().remaining_total_seconds(), 1500);
        assert_eq!(engine.phase(), TimerPhase::Idle);
    }

    #[test]
    fn display_pads_to_two_digits() {
        let engine = engine(5, 7);
        assert_eq!(engine.state().to_string(), "05:07");
    }
}

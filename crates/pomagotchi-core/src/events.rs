use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progression::Stage;
use crate::timer::TimerPhase;

/// Every state change in the session produces an Event.
/// The presenter receives them through `Presenter::on_event`; the session
/// also logs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    DurationSelected {
        minutes: u32,
        seconds: u32,
        at: DateTime<Utc>,
    },
    TimerStarted {
        remaining_secs: u32,
        /// True when the countdown continues from a pause.
        resumed: bool,
        at: DateTime<Utc>,
    },
    TimerTicked {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// The countdown reached 0:00 while running.
    TimerExpired {
        initial_total_secs: u32,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        natural: bool,
        xp_gained: u32,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    CreatureEvolved {
        level: u32,
        stage: Stage,
        levels_gained: u32,
        at: DateTime<Utc>,
    },
    GameDataReset {
        at: DateTime<Utc>,
    },
    GameDataRestored {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: TimerPhase,
        remaining_secs: u32,
        initial_total_secs: u32,
        level: u32,
        xp: u32,
        xp_needed: u32,
        stage: Stage,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name, used for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Event::DurationSelected { .. } => "duration_selected",
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerTicked { .. } => "timer_ticked",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerReset { .. } => "timer_reset",
            Event::TimerExpired { .. } => "timer_expired",
            Event::SessionCompleted { .. } => "session_completed",
            Event::CreatureEvolved { .. } => "creature_evolved",
            Event::GameDataReset { .. } => "game_data_reset",
            Event::GameDataRestored { .. } => "game_data_restored",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::TimerPaused {
            remaining_secs: 90,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TimerPaused");
        assert_eq!(json["remaining_secs"], 90);
        assert_eq!(event.name(), "timer_paused");
    }
}

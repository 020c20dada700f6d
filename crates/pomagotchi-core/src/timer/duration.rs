use serde::{Deserialize, Serialize};

use super::engine::TimerState;

pub const DEFAULT_MINUTES: u32 = 25;
pub const DEFAULT_SECONDS: u32 = 0;

/// The preset the timer returns to after any completion or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedDuration {
    pub minutes: u32,
    pub seconds: u32,
}

impl SelectedDuration {
    /// Build a duration, carrying seconds >= 60 into minutes.
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes: minutes.saturating_add(seconds / 60),
            seconds: seconds % 60,
        }
    }

    pub fn from_total_seconds(total: u32) -> Self {
        Self::new(0, total)
    }

    pub fn total_seconds(&self) -> u32 {
        self.minutes.saturating_mul(60).saturating_add(self.seconds)
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl Default for SelectedDuration {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_MINUTES,
            seconds: DEFAULT_SECONDS,
        }
    }
}

impl std::fmt::Display for SelectedDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

/// Persisted form of the timer: countdown state plus the last selection.
///
/// The countdown fields are flattened so the stored JSON reads
/// `{"minutes": .., "seconds": .., "is_running": .., ..., "last_selected_minutes": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerRecord {
    #[serde(flatten)]
    pub state: TimerState,
    pub last_selected_minutes: u32,
    pub last_selected_seconds: u32,
}

impl TimerRecord {
    pub fn new(state: TimerState, selected: SelectedDuration) -> Self {
        Self {
            state,
            last_selected_minutes: selected.minutes,
            last_selected_seconds: selected.seconds,
        }
    }

    pub fn selected(&self) -> SelectedDuration {
        SelectedDuration::new(self.last_selected_minutes, self.last_selected_seconds)
    }
}

impl Default for TimerRecord {
    fn default() -> Self {
        let selected = SelectedDuration::default();
        Self::new(TimerState::from_duration(selected), selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_carry_into_minutes() {
        let d = SelectedDuration::new(1, 75);
        assert_eq!(d, SelectedDuration { minutes: 2, seconds: 15 });
        assert_eq!(d.total_seconds(), 135);
    }

    #[test]
    fn default_is_twenty_five_minutes() {
        let d = SelectedDuration::default();
        assert_eq!(d.total_seconds(), 1500);
        assert_eq!(d.to_string(), "25:00");
    }

    #[test]
    fn record_uses_flat_wire_names() {
        let json = serde_json::to_value(TimerRecord::default()).unwrap();
        assert_eq!(json["minutes"], 25);
        assert_eq!(json["seconds"], 0);
        assert_eq!(json["is_running"], false);
        assert_eq!(json["is_paused"], false);
        assert_eq!(json["initial_total_seconds"], 1500);
        assert_eq!(json["last_selected_minutes"], 25);
        assert_eq!(json["last_selected_seconds"], 0);
    }

    #[test]
    fn record_parses_flat_layout() {
        let json = r#"{
            "minutes": 12, "seconds": 30, "is_running": false, "is_paused": true,
            "initial_total_seconds": 1500, "last_selected_minutes": 25, "last_selected_seconds": 0
        }"#;
        let record: TimerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.state.remaining_minutes, 12);
        assert_eq!(record.state.remaining_seconds, 30);
        assert!(record.state.is_paused);
        assert_eq!(record.selected(), SelectedDuration::default());
    }
}

//! Aggregate study progress.
//!
//! The backend owns these numbers; the session only displays the last
//! snapshot it received.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregateProgress {
    #[serde(default)]
    pub total_pomodoros_completed: u32,
    #[serde(default)]
    pub total_xp_earned: u32,
    #[serde(default)]
    pub total_time_studied_seconds: u32,
    #[serde(default)]
    pub sessions_this_week: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    /// Day of the most recent completed session.
    #[serde(default)]
    pub last_session_date: Option<NaiveDate>,
}

impl AggregateProgress {
    /// Account for one completed session finished on `today`.
    ///
    /// Streaks count consecutive days with at least one session: a second
    /// session on the same day leaves the streak alone, the next calendar day
    /// extends it, and any gap restarts it at 1.
    pub fn record_session(&mut self, duration_seconds: u32, xp_gained: u32, today: NaiveDate) {
        self.total_pomodoros_completed = self.total_pomodoros_completed.saturating_add(1);
        self.total_xp_earned = self.total_xp_earned.saturating_add(xp_gained);
        self.total_time_studied_seconds = self
            .total_time_studied_seconds
            .saturating_add(duration_seconds);

        match self.last_session_date {
            Some(last) if last == today => {}
            Some(last) if is_consecutive_day(last, today) => {
                self.current_streak = self.current_streak.saturating_add(1);
            }
            _ => self.current_streak = 1,
        }
        self.best_streak = self.best_streak.max(self.current_streak);

        match self.last_session_date {
            Some(last) if same_iso_week(last, today) => {
                self.sessions_this_week = self.sessions_this_week.saturating_add(1);
            }
            _ => self.sessions_this_week = 1,
        }

        self.last_session_date = Some(today);
    }

    /// `"2h 5m"`, or `"5m"` under an hour.
    pub fn study_time_label(&self) -> String {
        let hours = self.total_time_studied_seconds / 3600;
        let minutes = (self.total_time_studied_seconds % 3600) / 60;
        if hours > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{minutes}m")
        }
    }
}

pub fn is_consecutive_day(last: NaiveDate, current: NaiveDate) -> bool {
    last.succ_opt() == Some(current)
}

fn same_iso_week(a: NaiveDate, b: NaiveDate) -> bool {
    a.iso_week() == b.iso_week()
}

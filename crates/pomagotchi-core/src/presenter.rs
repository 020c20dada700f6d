//! Outbound port to the presentation layer.
//!
//! The session calls these sinks with snapshots of its state; it never reads
//! anything back from them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::progress::AggregateProgress;
use crate::progression::CreatureState;
use crate::timer::TimerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Evolution,
    Xp,
    Warning,
    Error,
}

/// A follow-up the user can trigger from a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationAction {
    /// Calls `Session::undo_data_reset`.
    Undo,
}

impl NotificationAction {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationAction::Undo => "Undo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub action: Option<NotificationAction>,
    /// How long the notification stays up.
    pub duration: Duration,
    pub show_countdown: bool,
}

pub trait Presenter {
    fn update_timer_display(&mut self, timer: &TimerState);

    fn update_creature_display(&mut self, creature: &CreatureState);

    fn update_progress_display(&mut self, progress: &AggregateProgress);

    fn notify(&mut self, notification: Notification);

    /// Raw transition feed. Ignored unless overridden.
    fn on_event(&mut self, _event: &Event) {}
}

/// Presenter that keeps everything it was shown.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub timer_updates: Vec<TimerState>,
    pub creature_updates: Vec<CreatureState>,
    pub progress_updates: Vec<AggregateProgress>,
    pub notifications: Vec<Notification>,
    pub events: Vec<Event>,
}

impl RecordingPresenter {
    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    pub fn last_progress(&self) -> Option<&AggregateProgress> {
        self.progress_updates.last()
    }
}

impl Presenter for RecordingPresenter {
    fn update_timer_display(&mut self, timer: &TimerState) {
        self.timer_updates.push(*timer);
    }

    fn update_creature_display(&mut self, creature: &CreatureState) {
        self.creature_updates.push(*creature);
    }

    fn update_progress_display(&mut self, progress: &AggregateProgress) {
        self.progress_updates.push(progress.clone());
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn on_event(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}

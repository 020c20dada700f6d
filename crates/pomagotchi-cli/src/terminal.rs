//! Plain-text presenter for the interactive session.

use std::io::Write;

use pomagotchi_core::{
    AggregateProgress, CreatureState, Event, Notification, NotificationKind, Presenter, TimerState,
};

pub struct TerminalPresenter {
    /// Also print every event as a JSON line.
    events: bool,
    last_creature: Option<CreatureState>,
}

impl TerminalPresenter {
    pub fn new(events: bool) -> Self {
        Self {
            events,
            last_creature: None,
        }
    }
}

fn kind_tag(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Success => "ok",
        NotificationKind::Evolution => "evolved",
        NotificationKind::Xp => "xp",
        NotificationKind::Warning => "warning",
        NotificationKind::Error => "error",
    }
}

pub fn creature_line(creature: &CreatureState) -> String {
    format!(
        "creature: level {} {} ({}/{} XP)",
        creature.level, creature.stage, creature.xp, creature.xp_needed
    )
}

pub fn progress_line(progress: &AggregateProgress) -> String {
    format!(
        "progress: {} pomodoros, {} studied, {} this week, streak {}",
        progress.total_pomodoros_completed,
        progress.study_time_label(),
        progress.sessions_this_week,
        progress.current_streak
    )
}

pub fn notification_line(notification: &Notification) -> String {
    let mut line = format!("[{}] {}", kind_tag(notification.kind), notification.message);
    if let Some(action) = notification.action {
        line.push_str(&format!(
            " (type '{}' within {}s)",
            action.label().to_lowercase(),
            notification.duration.as_secs()
        ));
    }
    line
}

impl Presenter for TerminalPresenter {
    fn update_timer_display(&mut self, timer: &TimerState) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "\r{timer} [{:?}] ", timer.phase());
        let _ = out.flush();
    }

    fn update_creature_display(&mut self, creature: &CreatureState) {
        if self.last_creature.as_ref() == Some(creature) {
            return;
        }
        self.last_creature = Some(*creature);
        println!("\n{}", creature_line(creature));
    }

    fn update_progress_display(&mut self, progress: &AggregateProgress) {
        println!("\n{}", progress_line(progress));
    }

    fn notify(&mut self, notification: Notification) {
        println!("\n{}", notification_line(&notification));
    }

    fn on_event(&mut self, event: &Event) {
        if !self.events {
            return;
        }
        match serde_json::to_string(event) {
            Ok(json) => println!("\n{json}"),
            Err(e) => tracing::warn!("failed to encode event: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pomagotchi_core::NotificationAction;

    use super::*;

    #[test]
    fn undo_notification_mentions_command() {
        let notification = Notification {
            kind: NotificationKind::Warning,
            message: "All data has been reset!".into(),
            action: Some(NotificationAction::Undo),
            duration: Duration::from_secs(8),
            show_countdown: true,
        };
        assert_eq!(
            notification_line(&notification),
            "[warning] All data has been reset! (type 'undo' within 8s)"
        );
    }

    #[test]
    fn creature_line_shows_stage() {
        assert_eq!(
            creature_line(&CreatureState::default()),
            "creature: level 1 egg (0/100 XP)"
        );
    }

    #[test]
    fn progress_line_uses_study_label() {
        let progress = AggregateProgress {
            total_pomodoros_completed: 3,
            total_time_studied_seconds: 3900,
            sessions_this_week: 2,
            current_streak: 1,
            ..Default::default()
        };
        assert_eq!(
            progress_line(&progress),
            "progress: 3 pomodoros, 1h 5m studied, 2 this week, streak 1"
        );
    }
}

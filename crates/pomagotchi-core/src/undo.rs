//! Single-slot backup taken before a destructive reset.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::gateway::{GameState, GAME_STATE_VERSION};
use crate::progress::AggregateProgress;
use crate::progression::CreatureState;
use crate::timer::{SelectedDuration, TimerRecord, TimerState};

/// Everything needed to put the game back the way it was before a reset.
#[derive(Debug, Clone, PartialEq)]
pub struct DataBackup {
    pub creature: CreatureState,
    pub timer: TimerState,
    pub selected: SelectedDuration,
    pub progress: AggregateProgress,
    pub captured_at: DateTime<Utc>,
    /// After this instant the backup can no longer be restored.
    pub expires_at: Option<DateTime<Utc>>,
}

impl DataBackup {
    pub fn capture(
        creature: CreatureState,
        timer: TimerState,
        selected: SelectedDuration,
        progress: AggregateProgress,
        window: Option<Duration>,
    ) -> Self {
        let captured_at = Utc::now();
        let expires_at = window
            .and_then(|w| chrono::Duration::from_std(w).ok())
            .map(|w| captured_at + w);
        Self {
            creature,
            timer,
            selected,
            progress,
            captured_at,
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }

    /// The full snapshot handed to the backend on restore.
    pub fn to_game_state(&self) -> GameState {
        GameState {
            creature: self.creature,
            timer: TimerRecord::new(self.timer, self.selected),
            progress: self.progress.clone(),
            version: GAME_STATE_VERSION.to_string(),
        }
    }
}

/// Holds at most one [`DataBackup`].
///
/// Written only by a data reset, taken only by an undo.
#[derive(Debug, Default)]
pub struct UndoSlot {
    backup: Option<DataBackup>,
}

impl UndoSlot {
    /// Store `backup`, replacing any older one.
    pub fn store(&mut self, backup: DataBackup) {
        self.backup = Some(backup);
    }

    pub fn peek(&self) -> Option<&DataBackup> {
        self.backup.as_ref()
    }

    pub fn take(&mut self) -> Option<DataBackup> {
        self.backup.take()
    }

    pub fn is_empty(&self) -> bool {
        self.backup.is_none()
    }
}

//! Authoritative game backend.
//!
//! Holds the current [`GameState`] in memory and writes it to the `kv` table
//! as JSON after every change. This is the only place aggregate progress
//! (totals, streaks) is computed.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use super::database::Database;
use crate::error::GatewayError;
use crate::gateway::GameState;
use crate::progress::AggregateProgress;
use crate::progression::CreatureState;
use crate::timer::TimerRecord;

pub const GAME_STATE_KEY: &str = "game_state";

#[derive(Debug)]
pub struct GameStore {
    db: Database,
    state: GameState,
    /// Whether a state document exists on disk.
    persisted: bool,
}

impl GameStore {
    /// Load the stored game, falling back to defaults when the record is
    /// missing or unreadable.
    pub fn open(db: Database) -> Result<Self, GatewayError> {
        let (state, persisted) = match db.kv_get(GAME_STATE_KEY)? {
            Some(json) => match serde_json::from_str::<GameState>(&json) {
                Ok(state) => (state, true),
                Err(e) => {
                    warn!("stored game state is unreadable, starting fresh: {e}");
                    (GameState::default(), false)
                }
            },
            None => (GameState::default(), false),
        };
        Ok(Self {
            db,
            state,
            persisted,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Write `next` to disk and adopt it. On failure the current state is
    /// left as it was.
    fn commit(&mut self, next: GameState) -> Result<(), GatewayError> {
        let json = serde_json::to_string(&next)?;
        self.db.kv_set(GAME_STATE_KEY, &json)?;
        self.state = next;
        self.persisted = true;
        Ok(())
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn complete_pomodoro(
        &mut self,
        duration_seconds: u32,
        xp_gained: u32,
    ) -> Result<AggregateProgress, GatewayError> {
        self.complete_pomodoro_on(duration_seconds, xp_gained, Utc::now().date_naive())
    }

    /// [`Self::complete_pomodoro`] with an explicit calendar day.
    pub fn complete_pomodoro_on(
        &mut self,
        duration_seconds: u32,
        xp_gained: u32,
        today: NaiveDate,
    ) -> Result<AggregateProgress, GatewayError> {
        let mut next = self.state.clone();
        next.progress.record_session(duration_seconds, xp_gained, today);
        self.commit(next)?;
        info!(
            duration_seconds,
            xp_gained,
            total = self.state.progress.total_pomodoros_completed,
            streak = self.state.progress.current_streak,
            "pomodoro recorded"
        );
        Ok(self.state.progress.clone())
    }

    pub fn save_creature_state(&mut self, creature: &CreatureState) -> Result<(), GatewayError> {
        let mut next = self.state.clone();
        next.creature = *creature;
        self.commit(next)
    }

    /// Store the timer. A running countdown is only kept in memory; it is
    /// written out at the next pause, reset or completion.
    pub fn update_timer_state(&mut self, timer: &TimerRecord) -> Result<(), GatewayError> {
        if timer.state.is_running {
            debug!("timer running, deferring write");
            self.state.timer = *timer;
            return Ok(());
        }
        let mut next = self.state.clone();
        next.timer = *timer;
        self.commit(next)
    }

    pub fn full_game_state(&self) -> Option<GameState> {
        self.persisted.then(|| self.state.clone())
    }

    pub fn game_progress(&self) -> AggregateProgress {
        self.state.progress.clone()
    }

    pub fn reset_game_data(&mut self) -> Result<(), GatewayError> {
        self.commit(GameState::default())?;
        info!("game data reset");
        Ok(())
    }

    pub fn save_full_game_state(&mut self, state: &GameState) -> Result<(), GatewayError> {
        self.commit(state.clone())?;
        info!(version = %state.version, "full game state saved");
        Ok(())
    }
}

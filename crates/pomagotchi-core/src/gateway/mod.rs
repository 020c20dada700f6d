//! Persistence gateway.
//!
//! Every durable write goes through [`GameGateway`]. The session never stores
//! anything itself; it pushes state out and takes back the backend's
//! authoritative [`AggregateProgress`].

mod sqlite;

pub use sqlite::SqliteGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::progress::AggregateProgress;
use crate::progression::CreatureState;
use crate::timer::TimerRecord;

/// Version tag written with every full snapshot.
pub const GAME_STATE_VERSION: &str = "1.0.0";

/// Everything the backend persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub creature: CreatureState,
    pub timer: TimerRecord,
    pub progress: AggregateProgress,
    pub version: String,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            creature: CreatureState::default(),
            timer: TimerRecord::default(),
            progress: AggregateProgress::default(),
            version: GAME_STATE_VERSION.to_string(),
        }
    }
}

/// Asynchronous command boundary to the persistence backend.
#[async_trait]
pub trait GameGateway: Send + Sync {
    /// Record a finished session and return the updated totals.
    async fn complete_pomodoro(
        &self,
        duration_seconds: u32,
        xp_gained: u32,
    ) -> Result<AggregateProgress, GatewayError>;

    async fn save_creature_state(&self, creature: &CreatureState) -> Result<(), GatewayError>;

    async fn update_timer_state(&self, timer: &TimerRecord) -> Result<(), GatewayError>;

    /// `None` when nothing has ever been saved.
    async fn get_full_game_state(&self) -> Result<Option<GameState>, GatewayError>;

    async fn get_game_progress(&self) -> Result<AggregateProgress, GatewayError>;

    /// Wipe all game data back to defaults.
    async fn reset_game_data(&self) -> Result<(), GatewayError>;

    /// Replace all game data. Used to undo a reset.
    async fn save_full_game_state(&self, state: &GameState) -> Result<(), GatewayError>;
}

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{GameGateway, GameState};
use crate::error::{CoreError, GatewayError};
use crate::progress::AggregateProgress;
use crate::progression::CreatureState;
use crate::storage::{Database, GameStore};
use crate::timer::TimerRecord;

/// [`GameGateway`] over a local [`GameStore`].
///
/// Cloning shares the same store.
#[derive(Debug, Clone)]
pub struct SqliteGateway {
    store: Arc<Mutex<GameStore>>,
}

impl SqliteGateway {
    pub fn new(store: GameStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Open the store in the default data directory.
    pub fn open_default() -> Result<Self, CoreError> {
        let db = Database::open()?;
        Ok(Self::new(GameStore::open(db)?))
    }

    /// A gateway over a throwaway in-memory database.
    pub fn in_memory() -> Result<Self, GatewayError> {
        let db = Database::open_memory()?;
        Ok(Self::new(GameStore::open(db)?))
    }

    /// Direct access to the backing store.
    pub fn store(&self) -> Arc<Mutex<GameStore>> {
        Arc::clone(&self.store)
    }
}

#[async_trait]
impl GameGateway for SqliteGateway {
    async fn complete_pomodoro(
        &self,
        duration_seconds: u32,
        xp_gained: u32,
    ) -> Result<AggregateProgress, GatewayError> {
        self.store
            .lock()
            .await
            .complete_pomodoro(duration_seconds, xp_gained)
    }

    async fn save_creature_state(&self, creature: &CreatureState) -> Result<(), GatewayError> {
        self.store.lock().await.save_creature_state(creature)
    }

    async fn update_timer_state(&self, timer: &TimerRecord) -> Result<(), GatewayError> {
        self.store.lock().await.update_timer_state(timer)
    }

    async fn get_full_game_state(&self) -> Result<Option<GameState>, GatewayError> {
        Ok(self.store.lock().await.full_game_state())
    }

    async fn get_game_progress(&self) -> Result<AggregateProgress, GatewayError> {
        Ok(self.store.lock().await.game_progress())
    }

    async fn reset_game_data(&self) -> Result<(), GatewayError> {
        self.store.lock().await.reset_game_data()
    }

    async fn save_full_game_state(&self, state: &GameState) -> Result<(), GatewayError> {
        self.store.lock().await.save_full_game_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::Stage;
    use crate::timer::{SelectedDuration, TimerState};

    #[tokio::test]
    async fn creature_and_timer_round_trip() {
        let gateway = SqliteGateway::in_memory().unwrap();
        let creature = CreatureState {
            level: 2,
            xp: 60,
            xp_needed: 150,
            stage: Stage::Baby,
        };
        let timer = TimerRecord::new(
            TimerState {
                remaining_minutes: 7,
                remaining_seconds: 41,
                is_running: false,
                is_paused: true,
                initial_total_seconds: 900,
            },
            SelectedDuration::new(15, 0),
        );

        gateway.save_creature_state(&creature).await.unwrap();
        gateway.update_timer_state(&timer).await.unwrap();

        let loaded = gateway.get_full_game_state().await.unwrap().unwrap();
        assert_eq!(loaded.creature, creature);
        assert_eq!(loaded.timer, timer);
    }

    #[tokio::test]
    async fn progress_comes_from_backend() {
        let gateway = SqliteGateway::in_memory().unwrap();
        let progress = gateway.complete_pomodoro(300, 5).await.unwrap();
        assert_eq!(progress.total_pomodoros_completed, 1);
        assert_eq!(gateway.get_game_progress().await.unwrap(), progress);
    }

    #[tokio::test]
    async fn clones_share_one_store() {
        let gateway = SqliteGateway::in_memory().unwrap();
        let other = gateway.clone();
        gateway.complete_pomodoro(60, 1).await.unwrap();
        assert_eq!(
            other.get_game_progress().await.unwrap().total_pomodoros_completed,
            1
        );
    }
}

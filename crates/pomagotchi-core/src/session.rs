//! Session orchestrator.
//!
//! [`Session`] owns the timer engine, the creature, the last progress
//! snapshot and the undo slot, and exposes the command surface the
//! presentation layer calls. Gateway calls are awaited in order; a failed
//! call is logged and never rolls back local state.

use chrono::Utc;
use tracing::{debug, info, trace, warn};

use crate::events::Event;
use crate::gateway::GameGateway;
use crate::presenter::{Notification, NotificationAction, NotificationKind, Presenter};
use crate::progress::AggregateProgress;
use crate::progression::{calculate_xp, CreatureState, EvolutionResult};
use crate::storage::SessionConfig;
use crate::timer::{SelectedDuration, TickScheduler, TimerEngine, TimerPhase, TimerRecord, TimerState};
use crate::undo::{DataBackup, UndoSlot};

/// What a completed session produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub natural: bool,
    pub xp_gained: u32,
    pub duration_seconds: u32,
    pub evolution: EvolutionResult,
    /// False when the backend did not acknowledge the session.
    pub progress_synced: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    Restored,
    NothingToRestore,
    Expired,
    Failed,
}

pub struct Session<G, S, P> {
    timer: TimerEngine<S>,
    creature: CreatureState,
    progress: AggregateProgress,
    undo: UndoSlot,
    gateway: G,
    presenter: P,
    config: SessionConfig,
}

impl<G, S, P> Session<G, S, P>
where
    G: GameGateway,
    S: TickScheduler,
    P: Presenter,
{
    pub fn new(gateway: G, scheduler: S, presenter: P, config: SessionConfig) -> Self {
        let timer = TimerEngine::new(config.default_duration, scheduler)
            .with_tick_period(config.tick_period);
        Self {
            timer,
            creature: CreatureState::default(),
            progress: AggregateProgress::default(),
            undo: UndoSlot::default(),
            gateway,
            presenter,
            config,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer(&self) -> &TimerState {
        self.timer.state()
    }

    pub fn selected(&self) -> SelectedDuration {
        self.timer.selected()
    }

    pub fn phase(&self) -> TimerPhase {
        self.timer.phase()
    }

    pub fn scheduler(&self) -> &S {
        self.timer.scheduler()
    }

    pub fn creature(&self) -> &CreatureState {
        &self.creature
    }

    pub fn progress(&self) -> &AggregateProgress {
        &self.progress
    }

    pub fn has_backup(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn backup(&self) -> Option<&DataBackup> {
        self.undo.peek()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Event {
        let timer = self.timer.state();
        Event::StateSnapshot {
            phase: timer.phase(),
            remaining_secs: timer.remaining_total_seconds(),
            initial_total_secs: timer.initial_total_seconds,
            level: self.creature.level,
            xp: self.creature.xp,
            xp_needed: self.creature.xp_needed,
            stage: self.creature.stage,
            at: Utc::now(),
        }
    }

    // ── Startup ──────────────────────────────────────────────────────

    /// Adopt the backend's saved game.
    ///
    /// A missing save keeps the defaults. A failed load keeps the defaults
    /// too and shows zeroed progress; it is not retried.
    pub async fn load(&mut self) {
        match self.gateway.get_full_game_state().await {
            Ok(Some(state)) => {
                let mut creature = state.creature;
                // Settle a save whose XP already covers the next level.
                creature.apply_xp(0);
                self.creature = creature;
                if !self.timer.state().is_running {
                    self.timer.restore(state.timer.state, state.timer.selected());
                }
                self.progress = state.progress;
                self.refresh_displays();
                info!(
                    level = self.creature.level,
                    pomodoros = self.progress.total_pomodoros_completed,
                    "loaded saved game"
                );

                if self.progress.total_pomodoros_completed > 0 {
                    let streak = self.progress.current_streak;
                    let message = if streak > 1 {
                        format!("Welcome back! You're on a {streak} day streak!")
                    } else {
                        "Welcome back!".to_string()
                    };
                    self.notify(NotificationKind::Success, message, None);
                }
            }
            Ok(None) => {
                debug!("no saved game, starting fresh");
                self.refresh_displays();
            }
            Err(e) => {
                warn!(error = %e, "failed to load game state, using defaults");
                self.progress = AggregateProgress::default();
                self.refresh_displays();
            }
        }
    }

    /// Push every current snapshot to the presenter.
    pub fn refresh_displays(&mut self) {
        self.presenter.update_timer_display(self.timer.state());
        self.presenter.update_creature_display(&self.creature);
        self.presenter.update_progress_display(&self.progress);
    }

    // ── Timer commands ───────────────────────────────────────────────

    /// Ignored while running.
    pub fn set_duration(&mut self, minutes: u32, seconds: u32) -> bool {
        let Some(event) = self.timer.set_duration(minutes, seconds) else {
            return false;
        };
        self.presenter.update_timer_display(self.timer.state());
        self.emit(event);
        true
    }

    pub fn start(&mut self) -> bool {
        let Some(event) = self.timer.start() else {
            return false;
        };
        self.presenter.update_timer_display(self.timer.state());
        self.emit(event);
        true
    }

    /// Handle one firing of the tick scheduler.
    ///
    /// Reaching 0:00 completes the session naturally.
    pub async fn tick(&mut self) -> Option<Event> {
        let event = self.timer.tick()?;
        self.emit(event.clone());
        if matches!(event, Event::TimerExpired { .. }) {
            self.complete_session(true).await;
        } else {
            self.presenter.update_timer_display(self.timer.state());
        }
        Some(event)
    }

    pub async fn pause(&mut self) -> bool {
        let Some(event) = self.timer.pause() else {
            return false;
        };
        self.presenter.update_timer_display(self.timer.state());
        self.emit(event);
        self.save_timer_state().await;
        true
    }

    pub async fn reset(&mut self) {
        let event = self.timer.reset();
        self.presenter.update_timer_display(self.timer.state());
        self.emit(event);
        self.save_timer_state().await;
    }

    /// Finish the session in progress early. Ignored when idle.
    pub async fn complete_now(&mut self) -> Option<SessionOutcome> {
        self.complete_session(false).await
    }

    // ── Completion ───────────────────────────────────────────────────

    /// Finish the session in progress and award XP.
    ///
    /// Returns `None` when there is no session to finish.
    pub async fn complete_session(&mut self, natural: bool) -> Option<SessionOutcome> {
        if !self.timer.can_complete() {
            return None;
        }
        self.timer.stop();

        let xp_gained = calculate_xp(natural, self.timer.state());
        let duration_seconds = self.timer.state().elapsed_seconds();

        let evolution = self.creature.apply_xp(xp_gained);
        self.presenter.update_creature_display(&self.creature);
        if evolution.evolved {
            info!(
                level = evolution.level,
                stage = %evolution.stage,
                levels_gained = evolution.levels_gained,
                "creature evolved"
            );
            self.emit(Event::CreatureEvolved {
                level: evolution.level,
                stage: evolution.stage,
                levels_gained: evolution.levels_gained,
                at: Utc::now(),
            });
            self.notify(
                NotificationKind::Evolution,
                format!("Your creature evolved to level {}!", evolution.level),
                None,
            );
        }
        // Written after every completion: the backend does not apply XP to
        // its copy of the creature.
        self.save_creature_state().await;

        let progress_synced = match self
            .gateway
            .complete_pomodoro(duration_seconds, xp_gained)
            .await
        {
            Ok(progress) => {
                self.progress = progress;
                self.presenter.update_progress_display(&self.progress);
                true
            }
            Err(e) => {
                warn!(error = %e, duration_seconds, xp_gained, "failed to complete session on backend");
                false
            }
        };

        self.timer.reset();
        self.presenter.update_timer_display(self.timer.state());
        self.save_timer_state().await;

        info!(natural, xp_gained, duration_seconds, "session completed");
        self.emit(Event::SessionCompleted {
            natural,
            xp_gained,
            duration_secs: duration_seconds,
            at: Utc::now(),
        });
        let completion = if natural { "completed" } else { "completed early" };
        self.notify(
            NotificationKind::Xp,
            format!("Pomodoro {completion}! Your creature gained {xp_gained} XP!"),
            None,
        );

        Some(SessionOutcome {
            natural,
            xp_gained,
            duration_seconds,
            evolution,
            progress_synced,
        })
    }

    // ── Reset & undo ─────────────────────────────────────────────────

    /// Wipe all game data, keeping one backup for [`Self::undo_data_reset`].
    ///
    /// Nothing changes locally when the backend refuses the reset.
    pub async fn reset_all_data(&mut self) -> bool {
        let progress = match self.gateway.get_game_progress().await {
            Ok(progress) => progress,
            Err(e) => {
                warn!(error = %e, "failed to fetch progress for backup, using last snapshot");
                self.progress.clone()
            }
        };
        let backup = DataBackup::capture(
            self.creature,
            *self.timer.state(),
            self.timer.selected(),
            progress,
            self.config.undo_window,
        );

        if let Err(e) = self.gateway.reset_game_data().await {
            warn!(error = %e, "failed to reset data");
            self.notify(NotificationKind::Error, "Failed to reset data".into(), None);
            return false;
        }

        self.undo.store(backup);
        self.creature = CreatureState::default();
        let default_duration = self.config.default_duration;
        self.timer
            .restore(TimerState::from_duration(default_duration), default_duration);
        self.progress = AggregateProgress::default();
        self.refresh_displays();

        info!("all game data reset");
        self.emit(Event::GameDataReset { at: Utc::now() });
        self.notify(
            NotificationKind::Warning,
            "All data has been reset!".into(),
            Some(NotificationAction::Undo),
        );
        true
    }

    /// Restore the backup taken by the last [`Self::reset_all_data`].
    ///
    /// The backup is single-use: a second call reports there is nothing to
    /// restore. A failed restore keeps the backup so it can be retried.
    pub async fn undo_data_reset(&mut self) -> UndoOutcome {
        let backup = match self.undo.peek() {
            Some(backup) => backup.clone(),
            None => {
                self.notify(
                    NotificationKind::Error,
                    "No backup available to restore".into(),
                    None,
                );
                return UndoOutcome::NothingToRestore;
            }
        };

        if backup.is_expired_at(Utc::now()) {
            self.undo.take();
            debug!(captured_at = %backup.captured_at, "undo window expired");
            self.notify(
                NotificationKind::Error,
                "The undo window has expired".into(),
                None,
            );
            return UndoOutcome::Expired;
        }

        if let Err(e) = self
            .gateway
            .save_full_game_state(&backup.to_game_state())
            .await
        {
            warn!(error = %e, "failed to restore data");
            self.notify(NotificationKind::Error, "Failed to restore data".into(), None);
            return UndoOutcome::Failed;
        }

        self.undo.take();
        self.creature = backup.creature;
        self.timer.restore(backup.timer, backup.selected);
        self.progress = backup.progress;
        self.refresh_displays();
        if backup.timer.is_running {
            // The restored countdown comes back paused; tell the backend.
            self.save_timer_state().await;
        }

        info!(level = self.creature.level, "game data restored");
        self.emit(Event::GameDataRestored { at: Utc::now() });
        self.notify(
            NotificationKind::Success,
            "Data has been restored!".into(),
            None,
        );
        UndoOutcome::Restored
    }

    // ── Internal ─────────────────────────────────────────────────────

    async fn save_timer_state(&self) {
        let record = TimerRecord::new(*self.timer.state(), self.timer.selected());
        if let Err(e) = self.gateway.update_timer_state(&record).await {
            warn!(error = %e, "failed to save timer state");
        }
    }

    async fn save_creature_state(&self) {
        if let Err(e) = self.gateway.save_creature_state(&self.creature).await {
            warn!(error = %e, "failed to save creature state");
        }
    }

    fn notify(&mut self, kind: NotificationKind, message: String, action: Option<NotificationAction>) {
        let style = self.config.notifications.style(kind, action.is_some());
        self.presenter.notify(Notification {
            kind,
            message,
            action,
            duration: style.duration(),
            show_countdown: style.show_countdown || action.is_some(),
        });
    }

    fn emit(&mut self, event: Event) {
        if matches!(event, Event::TimerTicked { .. }) {
            trace!(event = event.name(), "timer event");
        } else {
            debug!(event = event.name(), "timer event");
        }
        self.presenter.on_event(&event);
    }
}

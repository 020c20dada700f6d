//! # Pomagotchi Core Library
//!
//! This library provides the core logic for the Pomagotchi Pomodoro timer: a
//! countdown whose completed sessions feed XP to a virtual creature. The CLI
//! binary is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A whole-second countdown driven by an injected tick
//!   scheduler; the caller invokes `tick()` each time it fires
//! - **Progression**: XP rewards and the creature's level/stage curve
//! - **Gateway**: Asynchronous persistence boundary, backed by SQLite
//! - **Session**: Orchestrates the timer, the creature, and reset/undo
//!
//! ## Key Components
//!
//! - [`Session`]: Command surface for the presentation layer
//! - [`TimerEngine`]: Core timer state machine
//! - [`GameGateway`]: Trait for the persistence backend
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod gateway;
pub mod presenter;
pub mod progress;
pub mod progression;
pub mod session;
pub mod storage;
pub mod timer;
pub mod undo;

pub use error::{ConfigError, CoreError, DatabaseError, GatewayError};
pub use events::Event;
pub use gateway::{GameGateway, GameState, SqliteGateway, GAME_STATE_VERSION};
pub use presenter::{Notification, NotificationAction, NotificationKind, Presenter, RecordingPresenter};
pub use progress::AggregateProgress;
pub use progression::{calculate_xp, CreatureState, EvolutionResult, Stage};
pub use session::{Session, SessionOutcome, UndoOutcome};
pub use storage::{Config, Database, GameStore, SessionConfig};
pub use timer::{
    ManualTicker, SelectedDuration, TickReceiver, TickScheduler, TimerEngine, TimerPhase,
    TimerRecord, TimerState, TokioTicker,
};
pub use undo::{DataBackup, UndoSlot};

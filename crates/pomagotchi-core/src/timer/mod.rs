mod duration;
mod engine;
mod ticker;

pub use duration::{SelectedDuration, TimerRecord, DEFAULT_MINUTES, DEFAULT_SECONDS};
pub use engine::{TimerEngine, TimerPhase, TimerState, DEFAULT_TICK_PERIOD};
pub use ticker::{tokio_ticker, ManualTicker, TickReceiver, TickScheduler, TokioTicker};

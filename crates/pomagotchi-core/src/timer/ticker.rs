//! Tick scheduling port.
//!
//! The engine asks a [`TickScheduler`] to fire periodically and cancels it on
//! pause, reset and completion. [`TokioTicker`] is the runtime implementation;
//! [`ManualTicker`] only records calls so tests can drive `tick()` by hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub trait TickScheduler {
    /// Begin firing every `period`. Replaces any active schedule.
    fn schedule(&mut self, period: Duration);

    /// Stop firing. No-op when nothing is scheduled.
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

/// Scheduler that never fires on its own.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    active: bool,
    period: Option<Duration>,
    schedules: u32,
    cancels: u32,
}

impl ManualTicker {
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    pub fn schedule_count(&self) -> u32 {
        self.schedules
    }

    pub fn cancel_count(&self) -> u32 {
        self.cancels
    }
}

impl TickScheduler for ManualTicker {
    fn schedule(&mut self, period: Duration) {
        self.active = true;
        self.period = Some(period);
        self.schedules += 1;
    }

    fn cancel(&mut self) {
        if self.active {
            self.active = false;
            self.cancels += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Interval task on the tokio runtime.
///
/// Every schedule and cancel bumps a shared generation; each tick carries the
/// generation it was produced under and [`TickReceiver`] drops ticks from
/// older generations, so a tick queued just before a pause is never delivered.
#[derive(Debug)]
pub struct TokioTicker {
    generation: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<u64>,
    task: Option<JoinHandle<()>>,
}

/// Receiving half of a [`TokioTicker`].
#[derive(Debug)]
pub struct TickReceiver {
    generation: Arc<AtomicU64>,
    rx: mpsc::UnboundedReceiver<u64>,
}

/// Create a connected ticker/receiver pair.
pub fn tokio_ticker() -> (TokioTicker, TickReceiver) {
    let generation = Arc::new(AtomicU64::new(0));
    let (tx, rx) = mpsc::unbounded_channel();
    (
        TokioTicker {
            generation: Arc::clone(&generation),
            tx,
            task: None,
        },
        TickReceiver { generation, rx },
    )
}

impl TickScheduler for TokioTicker {
    /// Must be called from within a tokio runtime.
    fn schedule(&mut self, period: Duration) {
        self.cancel();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let tx = self.tx.clone();
        self.task = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if current.load(Ordering::SeqCst) != generation || tx.send(generation).is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_active(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl TickReceiver {
    /// Wait for the next tick of the active schedule.
    ///
    /// Pends forever while nothing is scheduled; returns `None` once the
    /// ticker has been dropped.
    pub async fn recv(&mut self) -> Option<()> {
        loop {
            let generation = self.rx.recv().await?;
            if generation == self.generation.load(Ordering::SeqCst) {
                return Some(());
            }
        }
    }
}

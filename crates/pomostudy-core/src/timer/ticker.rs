//! Background tick source for a shared [`PeriodTimer`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::engine::PeriodTimer;

/// The one handle every caller mutates the timer through. The ticker and
/// user commands take the same lock, so a tick never interleaves with a
/// command.
pub type SharedTimer = Arc<Mutex<PeriodTimer>>;

pub fn shared(timer: PeriodTimer) -> SharedTimer {
    Arc::new(Mutex::new(timer))
}

/// Calls [`PeriodTimer::tick`] every `interval` until shut down or dropped.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn on the current tokio runtime. The first tick happens one
    /// `interval` from now.
    pub fn spawn(timer: SharedTimer, interval: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                ticks.tick().await;
                let mut guard = timer.lock().await;
                if let Some(event) = guard.tick() {
                    tracing::debug!(?event, "tick completed a period");
                }
            }
        });
        tracing::debug!(interval_ms = interval.as_millis() as u64, "ticker started");
        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop ticking without waiting for the task to finish.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Stop ticking and wait until the task has released the timer.
    pub async fn shutdown(mut self) {
        self.handle.abort();
        if let Err(e) = (&mut self.handle).await {
            if !e.is_cancelled() {
                tracing::warn!(error = %e, "ticker task failed");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

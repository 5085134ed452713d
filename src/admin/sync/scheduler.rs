//! # Sync Scheduler
//!
//! Periodic background task driving refreshes. The first tick fires
//! immediately so the startup refresh and the interval share one code path.
//! Ticks that fall behind a slow refresh are delayed, never bunched.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to the running interval task
///
/// The task is aborted on [`stop`](Self::stop) and on drop.
#[derive(Debug)]
pub struct SyncScheduler {
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl SyncScheduler {
    /// Spawn a task calling `on_tick` now and then every `interval`
    pub fn spawn<F, Fut>(interval: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                on_tick().await;
            }
        });

        tracing::debug!("Sync scheduler started, every {:?}", interval);
        Self {
            interval,
            task: Some(task),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop ticking; a tick in progress is cancelled
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Sync scheduler stopped");
        }
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

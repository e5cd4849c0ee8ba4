//! Background task scheduler.
//!
//! Tasks are small structs implementing [`Task`]; the scheduler runs each
//! one immediately at startup and then on its own interval until the
//! shutdown signal flips. Task failures are logged and never surfaced to
//! the host.

pub(crate) mod tasks;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::ripple::Ripple;
use crate::ripple::error::Result;

#[async_trait]
pub(crate) trait Task: Send + Sync {
    fn name(&self) -> &'static str;
    fn interval(&self) -> Duration;
    async fn execute(&self, ripple: &Ripple) -> Result<()>;
}

/// Spawns one scheduler loop per task. The first tick fires immediately, so
/// every task runs once at startup.
pub(crate) fn start_scheduled_tasks(
    ripple: Arc<Ripple>,
    shutdown: watch::Receiver<bool>,
    tasks: Vec<Box<dyn Task>>,
) -> Vec<JoinHandle<()>> {
    tasks
        .into_iter()
        .map(|task| spawn_task(ripple.clone(), shutdown.clone(), task))
        .collect()
}

fn spawn_task(
    ripple: Arc<Ripple>,
    mut shutdown: watch::Receiver<bool>,
    task: Box<dyn Task>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(task.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::debug!(
            target: "ripple::scheduler",
            "Scheduled task '{}' started with interval {:?}",
            task.name(),
            task.interval()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = task.execute(&ripple).await {
                        tracing::warn!(
                            target: "ripple::scheduler",
                            "Scheduled task '{}' failed: {}",
                            task.name(),
                            e
                        );
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::debug!(
            target: "ripple::scheduler",
            "Scheduled task '{}' stopped",
            task.name()
        );
    })
}

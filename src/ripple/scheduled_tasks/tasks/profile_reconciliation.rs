//! Scheduled task that reconciles the authenticated user's cached profile
//! against the server copy.

use std::time::Duration;

use async_trait::async_trait;

use crate::ripple::Ripple;
use crate::ripple::error::Result;
use crate::ripple::scheduled_tasks::Task;

/// Periodically re-fetches the authenticated profile and replaces the cache
/// only when server-authoritative fields diverge. Runs once at startup
/// (covering the foreground transition) and then every 15 minutes.
pub(crate) struct ProfileReconciliation;

#[async_trait]
impl Task for ProfileReconciliation {
    fn name(&self) -> &'static str {
        "profile_reconciliation"
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(15 * 60)
    }

    async fn execute(&self, ripple: &Ripple) -> Result<()> {
        if ripple.current_profile().await.is_none() {
            tracing::debug!(
                target: "ripple::scheduler::profile_reconciliation",
                "No active session, skipping reconciliation"
            );
            return Ok(());
        }
        ripple.reconcile_current_profile().await;
        Ok(())
    }
}

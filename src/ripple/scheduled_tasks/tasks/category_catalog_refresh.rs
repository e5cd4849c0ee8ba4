//! Scheduled task that keeps the persisted category catalog fresh.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::ripple::Ripple;
use crate::ripple::error::Result;
use crate::ripple::scheduled_tasks::Task;
use crate::ripple::taxonomy::default_categories;

/// Age after which the persisted catalog is considered stale.
const CATALOG_MAX_AGE_DAYS: i64 = 30;

/// Re-seeds the persisted category catalog when it is missing or older than
/// [`CATALOG_MAX_AGE_DAYS`]. The check runs daily; the catalog itself
/// changes at most monthly.
pub(crate) struct CategoryCatalogRefresh;

#[async_trait]
impl Task for CategoryCatalogRefresh {
    fn name(&self) -> &'static str {
        "category_catalog_refresh"
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(24 * 60 * 60)
    }

    async fn execute(&self, ripple: &Ripple) -> Result<()> {
        let now = Utc::now();
        let stale = match ripple.storage.load_category_catalog()? {
            Some((_, updated_at)) => {
                now - updated_at > chrono::Duration::days(CATALOG_MAX_AGE_DAYS)
            }
            None => true,
        };

        if stale {
            ripple
                .storage
                .save_category_catalog(&default_categories(), now)?;
            tracing::info!(
                target: "ripple::scheduler::category_catalog_refresh",
                "Category catalog re-seeded"
            );
        } else {
            tracing::debug!(
                target: "ripple::scheduler::category_catalog_refresh",
                "Category catalog still fresh"
            );
        }

        Ok(())
    }
}

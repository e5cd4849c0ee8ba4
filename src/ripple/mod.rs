use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

pub mod credentials;
pub mod error;
pub mod feed;
pub mod index_cache;
pub mod mutations;
pub mod profiles;
pub mod reactions;
pub(crate) mod scheduled_tasks;
pub mod storage;
pub mod sync_bus;
pub mod taxonomy;
#[cfg(test)]
pub(crate) mod test_utils;

use crate::api::SocialApi;
use crate::init_tracing;

use credentials::CredentialStore;
pub use error::{Result, RippleError};
use feed::ReactionsFeedState;
use index_cache::IndexCache;
use profiles::ProfileCache;
use reactions::ReactionStore;
use storage::Storage;
use sync_bus::SyncBus;
use taxonomy::{Category, default_categories};

#[derive(Clone, Debug)]
pub struct RippleConfig {
    /// Directory for application data
    pub data_dir: PathBuf,

    /// Directory for application logs
    pub logs_dir: PathBuf,

    /// Base URL of the social API, e.g. `https://api.example.com`
    pub api_base_url: String,

    /// Page size for every paginated list (reactor lists, feed, follow lists)
    pub page_size: u32,

    /// Minimum interval between network fetches of the same non-current
    /// user's profile
    pub profile_debounce: Duration,

    /// Attempts per page load before the failure is surfaced
    pub max_page_retries: u32,

    /// Feed items kept in memory before the oldest-fetched half is dropped
    pub feed_retention_limit: usize,
}

impl RippleConfig {
    pub fn new(data_dir: &Path, logs_dir: &Path, api_base_url: &str) -> Self {
        let env_suffix = if cfg!(debug_assertions) {
            "dev"
        } else {
            "release"
        };

        Self {
            data_dir: data_dir.join(env_suffix),
            logs_dir: logs_dir.join(env_suffix),
            api_base_url: api_base_url.to_string(),
            page_size: 20,
            profile_debounce: Duration::from_secs(5 * 60),
            max_page_retries: 3,
            feed_retention_limit: 1000,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(RippleError::Configuration(
                "api_base_url cannot be empty or whitespace".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(RippleError::Configuration(
                "page_size must be at least 1".to_string(),
            ));
        }
        if self.max_page_retries == 0 {
            return Err(RippleError::Configuration(
                "max_page_retries must be at least 1".to_string(),
            ));
        }
        if self.feed_retention_limit < self.page_size as usize {
            return Err(RippleError::Configuration(
                "feed_retention_limit must hold at least one page".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything the session caches, behind one lock.
///
/// A single mutator at a time keeps the index cache coherent with the lists
/// it indexes: the lock is never held across network I/O, and every
/// completion re-checks `generation` before applying, so a response that
/// raced a logout is discarded instead of resurrecting cleared state.
pub(crate) struct SocialState {
    pub generation: u64,
    /// Count of optimistic mutations whose remote call is still in flight.
    /// While non-zero, background reconciliation must not replace the
    /// current profile, or it would discard the optimistic edit.
    pub pending_mutations: u32,
    pub profiles: ProfileCache,
    pub reactions: ReactionStore,
    pub index: IndexCache,
    pub feed: ReactionsFeedState,
}

pub struct Ripple {
    pub config: RippleConfig,
    pub(crate) api: Arc<dyn SocialApi>,
    pub(crate) credentials: Arc<dyn CredentialStore>,
    pub(crate) storage: Storage,
    pub(crate) state: Mutex<SocialState>,
    pub(crate) sync_bus: SyncBus,
    /// Shutdown signal for scheduled tasks
    scheduler_shutdown: watch::Sender<bool>,
    /// Handles for spawned scheduler tasks
    scheduler_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for Ripple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ripple")
            .field("config", &self.config)
            .field("api", &"<REDACTED>")
            .field("credentials", &"<REDACTED>")
            .field("storage", &"<REDACTED>")
            .field("state", &"<REDACTED>")
            .field("sync_bus", &"<REDACTED>")
            .finish()
    }
}

impl Ripple {
    /// Initializes the client core with the provided configuration and the
    /// host-supplied API and credential implementations.
    ///
    /// Sets up the data and log directories, configures logging, opens the
    /// persistent store, and restores the persisted session profile so the
    /// UI can render immediately while reconciliation runs in the
    /// background.
    pub async fn new(
        config: RippleConfig,
        api: Arc<dyn SocialApi>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Arc<Self>> {
        config.validate()?;

        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", config.data_dir))
            .map_err(RippleError::from)?;
        std::fs::create_dir_all(&config.logs_dir)
            .with_context(|| format!("Failed to create logs directory: {:?}", config.logs_dir))
            .map_err(RippleError::from)?;

        init_tracing(&config.logs_dir);
        tracing::debug!(
            target: "ripple::initialize",
            "Logging initialized in directory: {:?}",
            config.logs_dir
        );

        let storage = Storage::open(&config.data_dir.join("ripple.redb"))?;

        let (scheduler_shutdown, _scheduler_shutdown_rx) = watch::channel(false);

        let mut profiles = ProfileCache::new(config.profile_debounce);
        if let Some(profile) = storage.load_current_profile()? {
            tracing::debug!(
                target: "ripple::initialize",
                "Restored persisted profile for user {}",
                profile.id
            );
            profiles.current = Some(profile);
        }

        let ripple = Arc::new(Self {
            config,
            api,
            credentials,
            storage,
            state: Mutex::new(SocialState {
                generation: 0,
                pending_mutations: 0,
                profiles,
                reactions: ReactionStore::new(),
                index: IndexCache::new(),
                feed: ReactionsFeedState::new(),
            }),
            sync_bus: SyncBus::default(),
            scheduler_shutdown,
            scheduler_handles: Mutex::new(Vec::new()),
        });

        tracing::debug!(target: "ripple::initialize", "Initialization complete");
        Ok(ripple)
    }

    /// Registers and starts the background tasks (profile reconciliation and
    /// category-catalog refresh). Each task runs once immediately and then on
    /// its own interval until [`Ripple::shutdown`].
    pub async fn start_scheduled_tasks(self: &Arc<Self>) {
        let tasks: Vec<Box<dyn scheduled_tasks::Task>> = vec![
            Box::new(scheduled_tasks::tasks::ProfileReconciliation),
            Box::new(scheduled_tasks::tasks::CategoryCatalogRefresh),
        ];
        let handles = scheduled_tasks::start_scheduled_tasks(
            self.clone(),
            self.scheduler_shutdown.subscribe(),
            tasks,
        );
        *self.scheduler_handles.lock().await = handles;
    }

    /// Gracefully stops all scheduled tasks without deleting data.
    ///
    /// Any panicked tasks are logged but do not cause this method to fail.
    pub async fn shutdown(&self) {
        tracing::info!(target: "ripple::shutdown", "Initiating graceful shutdown");

        let _ = self.scheduler_shutdown.send(true);

        let mut handles = self.scheduler_handles.lock().await;
        for handle in handles.drain(..) {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    tracing::error!(
                        target: "ripple::shutdown",
                        "Scheduler task panicked: {:?}",
                        e
                    );
                } else {
                    tracing::warn!(
                        target: "ripple::shutdown",
                        "Scheduler task cancelled: {:?}",
                        e
                    );
                }
            }
        }

        tracing::info!(target: "ripple::shutdown", "Graceful shutdown complete");
    }

    /// Ends the session: wipes all in-memory caches, removes the persisted
    /// session and profile, and bumps the generation so any network
    /// completion still in flight is discarded instead of repopulating the
    /// cleared state.
    pub async fn logout(&self) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            state.generation = state.generation.wrapping_add(1);
            state.pending_mutations = 0;
            state.profiles.clear();
            state.reactions.clear();
            state.index.clear();
            state.feed = ReactionsFeedState::new();
        }

        self.storage.clear_session()?;
        self.storage.clear_current_profile()?;

        tracing::info!(target: "ripple::session", "Session ended, caches cleared");
        Ok(())
    }

    /// The current bearer token, or an auth error when no credential is
    /// available.
    pub(crate) fn auth_token(&self) -> Result<String> {
        self.credentials
            .token()
            .ok_or_else(|| RippleError::Auth("no access token available".to_string()))
    }

    /// The interest-category catalog: the persisted copy when present,
    /// otherwise the built-in defaults.
    pub fn category_catalog(&self) -> Result<Vec<Category>> {
        match self.storage.load_category_catalog()? {
            Some((categories, _)) => Ok(categories),
            None => Ok(default_categories()),
        }
    }
}

//! Headless client core for the Ripple social app.
//!
//! This crate owns the client-side social state: the authenticated user's
//! profile, a session-scoped cache of other users' profiles, per-user
//! reaction tallies and paginated reactor lists, the global reaction
//! timeline, and the optimistic mutation engine that keeps all of it
//! consistent while the UI mutates state before the server confirms it.
//!
//! The embedding application constructs a [`Ripple`] instance and drives it;
//! rendering, push delivery, and platform credential storage live outside
//! this crate behind the [`api::SocialApi`] and
//! [`ripple::credentials::CredentialStore`] seams.

use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;

pub mod api;
pub mod ripple;

pub use ripple::{Ripple, RippleConfig};
pub use ripple::error::{Result, RippleError};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initializes tracing with a daily-rolling file appender plus stdout.
///
/// Safe to call multiple times; only the first call has an effect. The
/// appender's worker guard is held for the life of the process so buffered
/// log lines are flushed.
pub fn init_tracing(logs_dir: &Path) {
    let file_appender = tracing_appender::rolling::daily(logs_dir, "ripple.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,ripple=debug"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout));

    if registry.try_init().is_ok() {
        let _ = LOG_GUARD.set(guard);
    }
}

//! Access to the device credential store.
//!
//! Secure storage itself lives outside this crate (platform keychain or
//! equivalent); the core only needs the bearer token and the session
//! username. Implementations must be cheap to call — the mutation engine
//! reads the token on every action.

use std::sync::Mutex;

/// The credential surface the core consumes.
pub trait CredentialStore: Send + Sync {
    /// The bearer token for API calls, if a session exists.
    fn token(&self) -> Option<String>;

    /// The authenticated username, if a session exists.
    fn username(&self) -> Option<String>;
}

/// In-memory credential store for tests and ephemeral sessions.
#[derive(Default)]
pub struct InMemoryCredentials {
    token: Mutex<Option<String>>,
    username: Mutex<Option<String>>,
}

impl InMemoryCredentials {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
            username: Mutex::new(Some(username.into())),
        }
    }

    pub fn clear(&self) {
        *self.token.lock().unwrap() = None;
        *self.username.lock().unwrap() = None;
    }
}

impl CredentialStore for InMemoryCredentials {
    fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn username(&self) -> Option<String> {
        self.username.lock().unwrap().clone()
    }
}

//! Profile cache: the authenticated user's canonical profile plus a
//! session-scoped map of other users' profiles with a fetch-debounce policy.
//!
//! The cache is the exclusive owner of the session's canonical
//! [`UserProfile`]. For the authenticated user, cached data is always valid;
//! refresh happens only via [`Ripple::force_refresh_profile`] or the
//! background reconciliation pass. For any other user a fetch is allowed
//! only if no fetch timestamp exists for that id or the debounce window has
//! elapsed, and the timestamp is recorded *before* the network call so
//! concurrent duplicate fetches for the same id are suppressed.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{FollowListPage, ProfileDto};
use crate::ripple::error::{Result, RippleError};
use crate::ripple::storage::Session;
use crate::ripple::sync_bus::SyncEvent;
use crate::ripple::Ripple;

/// A user profile as the cache holds it.
///
/// `reaction_counts` are reactions this user has *received*, keyed by
/// reaction type id. Counters are unsigned so the non-negativity invariant
/// is structural.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub nickname: String,
    pub avatar: String,
    pub status: String,
    pub follows: u32,
    pub followings: u32,
    pub tweets_count: u32,
    pub is_following: bool,
    pub is_friend: bool,
    pub categories: Vec<i64>,
    pub reaction_counts: HashMap<i64, u32>,
    pub is_online: bool,
}

impl UserProfile {
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            nickname: String::new(),
            avatar: String::new(),
            status: String::new(),
            follows: 0,
            followings: 0,
            tweets_count: 0,
            is_following: false,
            is_friend: false,
            categories: Vec::new(),
            reaction_counts: HashMap::new(),
            is_online: false,
        }
    }
}

impl From<ProfileDto> for UserProfile {
    fn from(dto: ProfileDto) -> Self {
        Self {
            id: dto.id,
            username: dto.username,
            nickname: dto.nickname,
            avatar: dto.avatar,
            status: dto.status,
            follows: dto.follows,
            followings: dto.followings,
            tweets_count: dto.tweets_count,
            is_following: dto.is_following,
            is_friend: dto.is_friend,
            categories: dto.categories,
            reaction_counts: dto.reaction_counts,
            is_online: dto.is_online,
        }
    }
}

/// True when any of the reconciled fields diverge between a cached profile
/// and a freshly fetched one.
fn reconciled_fields_differ(cached: &UserProfile, fresh: &UserProfile) -> bool {
    cached.follows != fresh.follows
        || cached.followings != fresh.followings
        || cached.tweets_count != fresh.tweets_count
        || cached.nickname != fresh.nickname
        || cached.avatar != fresh.avatar
        || cached.status != fresh.status
        || cached.categories != fresh.categories
        || cached.reaction_counts != fresh.reaction_counts
}

pub(crate) struct ProfileCache {
    pub current: Option<UserProfile>,
    pub others: HashMap<i64, UserProfile>,
    fetch_times: HashMap<i64, DateTime<Utc>>,
    debounce: chrono::Duration,
}

impl ProfileCache {
    pub fn new(debounce: Duration) -> Self {
        Self {
            current: None,
            others: HashMap::new(),
            fetch_times: HashMap::new(),
            debounce: chrono::Duration::from_std(debounce)
                .unwrap_or_else(|_| chrono::Duration::minutes(5)),
        }
    }

    /// Whether a network fetch for `user_id` is allowed at `now`.
    ///
    /// Always false for the authenticated user (no TTL); for other users,
    /// true when never fetched or when the debounce window has elapsed.
    pub fn should_fetch_profile(&self, user_id: i64, now: DateTime<Utc>) -> bool {
        if self.current.as_ref().is_some_and(|p| p.id == user_id) {
            return false;
        }
        match self.fetch_times.get(&user_id) {
            None => true,
            Some(last) => now - *last > self.debounce,
        }
    }

    /// Records "now" as the fetch time for `user_id`, *before* the network
    /// call completes, so duplicate concurrent fetches are suppressed.
    pub fn mark_fetch_started(&mut self, user_id: i64, now: DateTime<Utc>) {
        self.fetch_times.insert(user_id, now);
    }

    pub fn get_profile(&self, user_id: i64) -> Option<&UserProfile> {
        if self.current.as_ref().is_some_and(|p| p.id == user_id) {
            return self.current.as_ref();
        }
        self.others.get(&user_id)
    }

    pub fn get_profile_mut(&mut self, user_id: i64) -> Option<&mut UserProfile> {
        if self.current.as_ref().is_some_and(|p| p.id == user_id) {
            return self.current.as_mut();
        }
        self.others.get_mut(&user_id)
    }

    pub fn set_profile(&mut self, profile: UserProfile) {
        if self.current.as_ref().is_some_and(|p| p.id == profile.id) {
            self.current = Some(profile);
        } else {
            self.others.insert(profile.id, profile);
        }
    }

    pub fn remove_other(&mut self, user_id: i64) -> Option<UserProfile> {
        self.others.remove(&user_id)
    }

    /// Drops the fetch timestamp so the next fetch bypasses the debounce.
    pub fn force_refresh(&mut self, user_id: i64) {
        self.fetch_times.remove(&user_id);
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.others.clear();
        self.fetch_times.clear();
    }
}

impl Ripple {
    /// Returns the authenticated user's cached profile.
    pub async fn current_profile(&self) -> Option<UserProfile> {
        self.state.lock().await.profiles.current.clone()
    }

    /// Returns a cached profile for any user, if present.
    pub async fn cached_profile(&self, user_id: i64) -> Option<UserProfile> {
        self.state.lock().await.profiles.get_profile(user_id).cloned()
    }

    /// Whether a fetch for `user_id` would hit the network right now.
    pub async fn should_fetch_profile(&self, user_id: i64) -> bool {
        self.state
            .lock()
            .await
            .profiles
            .should_fetch_profile(user_id, Utc::now())
    }

    /// Installs the authenticated user's profile and persists it together
    /// with the session identity. Called by the host after login.
    pub async fn set_current_profile(&self, profile: UserProfile) -> Result<()> {
        self.storage.save_current_profile(&profile)?;
        self.storage.save_session(&Session {
            user_id: profile.id,
            username: profile.username.clone(),
        })?;
        self.state.lock().await.profiles.current = Some(profile);
        Ok(())
    }

    /// Fetches another user's profile, honoring the debounce window.
    ///
    /// When the window has not elapsed the cached copy is returned without a
    /// network call. The fetch timestamp is recorded before the request is
    /// issued so a concurrent second call short-circuits to the cache.
    pub async fn fetch_user_profile(&self, user_id: i64, username: &str) -> Result<UserProfile> {
        let token = self.auth_token()?;

        let generation = {
            let mut state = self.state.lock().await;
            if !state.profiles.should_fetch_profile(user_id, Utc::now()) {
                return state
                    .profiles
                    .get_profile(user_id)
                    .cloned()
                    .ok_or(RippleError::ProfileNotFound);
            }
            state.profiles.mark_fetch_started(user_id, Utc::now());
            state.generation
        };

        let fetched = self.api.fetch_profile(&token, username).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            // Session ended while the request was in flight; the result must
            // not repopulate the cleared cache.
            return Err(RippleError::NotLoggedIn);
        }

        match fetched {
            Ok(dto) => {
                let profile: UserProfile = dto.into();
                state.profiles.set_profile(profile.clone());
                Ok(profile)
            }
            Err(e) => {
                // Allow an immediate retry instead of holding the debounce
                // for a failed fetch.
                state.profiles.force_refresh(user_id);
                Err(e)
            }
        }
    }

    /// Drops the debounce timestamp for `user_id`; the next
    /// [`Ripple::fetch_user_profile`] will hit the network.
    pub async fn force_refresh_profile(&self, user_id: i64) {
        self.state.lock().await.profiles.force_refresh(user_id);
    }

    /// Background reconciliation of the authenticated user's profile.
    ///
    /// Fetches unconditionally, diffs field by field, and replaces+persists
    /// the cached profile only on divergence. This path never surfaces an
    /// error to the caller; failures are logged and absorbed.
    pub async fn reconcile_current_profile(&self) {
        if let Err(e) = self.try_reconcile_current_profile().await {
            tracing::warn!(
                target: "ripple::profiles",
                "Profile reconciliation failed (non-fatal): {}",
                e
            );
        }
    }

    async fn try_reconcile_current_profile(&self) -> Result<()> {
        let token = self.auth_token()?;
        let username = self
            .credentials
            .username()
            .ok_or_else(|| RippleError::Auth("no session username".to_string()))?;

        let generation = {
            let state = self.state.lock().await;
            if state.pending_mutations > 0 {
                tracing::debug!(
                    target: "ripple::profiles",
                    "Deferring reconciliation: optimistic mutation in flight"
                );
                return Ok(());
            }
            state.generation
        };
        let fresh: UserProfile = self.api.fetch_profile(&token, &username).await?.into();

        let mut state = self.state.lock().await;
        if state.generation != generation {
            return Ok(());
        }
        // A mutation may have started while the fetch was in flight; its
        // optimistic counters would look divergent against the server's
        // pre-mutation copy, so back off and let the next pass reconcile.
        if state.pending_mutations > 0 {
            return Ok(());
        }

        let divergent = match &state.profiles.current {
            Some(cached) => reconciled_fields_differ(cached, &fresh),
            None => true,
        };

        if divergent {
            tracing::debug!(
                target: "ripple::profiles",
                "Reconciliation found divergent profile for user {}, replacing cache",
                fresh.id
            );
            self.storage.save_current_profile(&fresh)?;
            state.profiles.current = Some(fresh);
        }

        Ok(())
    }

    /// Fetches one page of the users `username` is followed by.
    ///
    /// Follow lists are view-driven and not cached: the caller owns the
    /// returned page.
    pub async fn follows_page(&self, username: &str, page: u32) -> Result<FollowListPage> {
        let token = self.auth_token()?;
        self.api
            .follows(&token, username, page, self.config.page_size)
            .await
    }

    /// Fetches one page of the users `username` follows.
    pub async fn followings_page(&self, username: &str, page: u32) -> Result<FollowListPage> {
        let token = self.auth_token()?;
        self.api
            .followings(&token, username, page, self.config.page_size)
            .await
    }

    /// Records a presence change and propagates it on the sync bus.
    pub async fn set_user_online(&self, user_id: i64, is_online: bool) {
        {
            let mut state = self.state.lock().await;
            if let Some(profile) = state.profiles.get_profile_mut(user_id) {
                profile.is_online = is_online;
            }
        }
        self.sync_bus.publish(SyncEvent::UserOnlineChanged { user_id, is_online });
    }
}

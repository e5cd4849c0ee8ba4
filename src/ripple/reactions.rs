//! Per-subject paginated "who reacted with type T" collections.
//!
//! Each subject (the current user, or any other user viewed this session)
//! owns one [`ReactionUsersPaginationState`]: a map from reaction type id to
//! an independently loading [`PaginationData`]. Reactor entries are copies
//! of profile data, not references, so a reactor's later profile edits never
//! silently rewrite historical list entries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::api::ProfileDto;
use crate::ripple::error::{Result, RippleError};
use crate::ripple::profiles::UserProfile;
use crate::ripple::taxonomy::is_valid_reaction_type;
use crate::ripple::Ripple;

/// Whose reaction lists are being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    CurrentUser,
    Other(i64),
}

/// A reactor-list entry: a snapshot copy of the reactor's profile fields the
/// list screens render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactorEntry {
    pub user_id: i64,
    pub username: String,
    pub nickname: String,
    pub avatar: String,
    pub is_following: bool,
    pub is_online: bool,
}

impl From<&ProfileDto> for ReactorEntry {
    fn from(dto: &ProfileDto) -> Self {
        Self {
            user_id: dto.id,
            username: dto.username.clone(),
            nickname: dto.nickname.clone(),
            avatar: dto.avatar.clone(),
            is_following: dto.is_following,
            is_online: dto.is_online,
        }
    }
}

impl From<&UserProfile> for ReactorEntry {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_id: profile.id,
            username: profile.username.clone(),
            nickname: profile.nickname.clone(),
            avatar: profile.avatar.clone(),
            is_following: profile.is_following,
            is_online: profile.is_online,
        }
    }
}

/// Loading and paging state for one (subject, reaction type) list.
///
/// `users` is ordered most-recent-first. `current_page` counts pages loaded
/// so far; the next request's offset is `current_page * page_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationData {
    pub users: Vec<ReactorEntry>,
    pub current_page: u32,
    pub has_more_data: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub retry_count: u32,
    /// Server-reported total, used to derive `has_more_data`.
    pub total: u64,
}

impl Default for PaginationData {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            current_page: 0,
            has_more_data: true,
            is_loading: false,
            error: None,
            retry_count: 0,
            total: 0,
        }
    }
}

impl PaginationData {
    /// Appends a fetched page, filtering out ids already present.
    pub fn merge_page(&mut self, page: Vec<ReactorEntry>, total: u64) {
        for entry in page {
            if !self.users.iter().any(|u| u.user_id == entry.user_id) {
                self.users.push(entry);
            }
        }
        self.total = total;
        self.current_page += 1;
        self.has_more_data = (self.users.len() as u64) < total;
        self.error = None;
        self.retry_count = 0;
    }

    /// Recomputes `current_page` by ceiling division after a local mutation
    /// changed the list length outside the paging path.
    pub fn recompute_pages(&mut self, page_size: u32) {
        let page_size = page_size.max(1) as usize;
        self.current_page = self.users.len().div_ceil(page_size) as u32;
        self.has_more_data = (self.users.len() as u64) < self.total;
    }

    /// Drops everything back to the initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Map from reaction type id to that type's pagination data, for one subject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactionUsersPaginationState {
    by_type: HashMap<i64, PaginationData>,
}

impl ReactionUsersPaginationState {
    pub fn get(&self, reaction_type_id: i64) -> Option<&PaginationData> {
        self.by_type.get(&reaction_type_id)
    }

    pub fn entry(&mut self, reaction_type_id: i64) -> &mut PaginationData {
        self.by_type.entry(reaction_type_id).or_default()
    }

    pub fn set_list(&mut self, reaction_type_id: i64, data: PaginationData) {
        self.by_type.insert(reaction_type_id, data);
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &PaginationData)> {
        self.by_type.iter().map(|(id, data)| (*id, data))
    }
}

/// All reaction-pagination state for the session. The current user always
/// has exactly one instance; every other user gets one lazily on first
/// access.
#[derive(Default)]
pub(crate) struct ReactionStore {
    current: ReactionUsersPaginationState,
    others: HashMap<i64, ReactionUsersPaginationState>,
}

impl ReactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_for(&self, subject: Subject) -> Option<&ReactionUsersPaginationState> {
        match subject {
            Subject::CurrentUser => Some(&self.current),
            Subject::Other(id) => self.others.get(&id),
        }
    }

    pub fn state_mut(&mut self, subject: Subject) -> &mut ReactionUsersPaginationState {
        match subject {
            Subject::CurrentUser => &mut self.current,
            Subject::Other(id) => self.others.entry(id).or_default(),
        }
    }

    /// Replaces a subject's whole pagination state (snapshot restore).
    pub fn restore(&mut self, subject: Subject, state: ReactionUsersPaginationState) {
        match subject {
            Subject::CurrentUser => self.current = state,
            Subject::Other(id) => {
                self.others.insert(id, state);
            }
        }
    }

    /// Per-subject reset.
    pub fn reset_subject(&mut self, subject: Subject) {
        match subject {
            Subject::CurrentUser => self.current = ReactionUsersPaginationState::default(),
            Subject::Other(id) => {
                self.others.remove(&id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.current = ReactionUsersPaginationState::default();
        self.others.clear();
    }

    /// Visits every tracked (subject, reaction type) list.
    pub fn for_each_list(&self, mut f: impl FnMut(Subject, i64, &PaginationData)) {
        for (reaction_type_id, data) in self.current.iter() {
            f(Subject::CurrentUser, reaction_type_id, data);
        }
        for (subject_id, state) in &self.others {
            for (reaction_type_id, data) in state.iter() {
                f(Subject::Other(*subject_id), reaction_type_id, data);
            }
        }
    }
}

impl Ripple {
    /// Snapshot of one (subject, reaction type) list for rendering.
    pub async fn reaction_pagination(
        &self,
        subject: Subject,
        reaction_type_id: i64,
    ) -> Option<PaginationData> {
        self.state
            .lock()
            .await
            .reactions
            .state_for(subject)
            .and_then(|s| s.get(reaction_type_id))
            .cloned()
    }

    /// Loads the next page of reactors for (subject, reaction type).
    ///
    /// A load already in flight for the same key short-circuits. On failure
    /// the request is retried with exponential backoff (2^attempt seconds)
    /// up to the configured attempt cap; after exhaustion a first-page load
    /// clears the list while later-page loads preserve what's loaded.
    pub async fn load_reaction_users(&self, subject: Subject, reaction_type_id: i64) -> Result<()> {
        if !is_valid_reaction_type(reaction_type_id) {
            return Err(RippleError::UnknownReactionType(reaction_type_id));
        }
        let token = self.auth_token()?;

        let (generation, subject_id, offset) = {
            let mut state = self.state.lock().await;
            let subject_id = match subject {
                Subject::CurrentUser => state
                    .profiles
                    .current
                    .as_ref()
                    .map(|p| p.id)
                    .ok_or(RippleError::NotLoggedIn)?,
                Subject::Other(id) => id,
            };
            let data = state.reactions.state_mut(subject).entry(reaction_type_id);
            if data.is_loading {
                tracing::debug!(
                    target: "ripple::reactions",
                    "Load already in flight for subject {:?} type {}, suppressing",
                    subject,
                    reaction_type_id
                );
                return Ok(());
            }
            data.is_loading = true;
            data.error = None;
            let offset = data.current_page * self.config.page_size;
            (state.generation, subject_id, offset)
        };

        let mut last_error: Option<RippleError> = None;
        for attempt in 0..self.config.max_page_retries {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_secs(1u64 << (attempt - 1))).await;
            }

            match self
                .api
                .reaction_users(
                    &token,
                    subject_id,
                    reaction_type_id,
                    self.config.page_size,
                    offset,
                )
                .await
            {
                Ok(page) => {
                    let mut state = self.state.lock().await;
                    if state.generation != generation {
                        return Ok(());
                    }
                    let entries: Vec<ReactorEntry> =
                        page.users.iter().map(ReactorEntry::from).collect();
                    let data = state.reactions.state_mut(subject).entry(reaction_type_id);
                    data.is_loading = false;
                    data.merge_page(entries, page.total);
                    let snapshot = data.clone();
                    state.index.patch_list(subject, reaction_type_id, &snapshot);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(
                        target: "ripple::reactions",
                        "Reaction-user page load failed (attempt {}/{}): {}",
                        attempt + 1,
                        self.config.max_page_retries,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        let error = last_error.unwrap_or(RippleError::Initialization);
        let mut state = self.state.lock().await;
        if state.generation != generation {
            return Ok(());
        }
        let first_page = offset == 0;
        let data = state.reactions.state_mut(subject).entry(reaction_type_id);
        data.is_loading = false;
        data.retry_count = self.config.max_page_retries;
        data.error = Some(error.to_string());
        if first_page {
            // A stale partial first page is worse than an empty list.
            data.users.clear();
            data.current_page = 0;
            let snapshot = data.clone();
            state.index.patch_list(subject, reaction_type_id, &snapshot);
        }
        Err(error)
    }

    /// Drops all reaction-pagination state for one subject and re-indexes.
    pub async fn reset_reaction_state(&self, subject: Subject) {
        let mut state = self.state.lock().await;
        state.reactions.reset_subject(subject);
        let crate::ripple::SocialState { reactions, index, .. } = &mut *state;
        index.rebuild_all(reactions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ReactionUsersPage;
    use crate::ripple::test_utils::{create_mock_ripple, profile_dto};

    fn entry(id: i64) -> ReactorEntry {
        ReactorEntry {
            user_id: id,
            username: format!("user{id}"),
            nickname: String::new(),
            avatar: String::new(),
            is_following: false,
            is_online: false,
        }
    }

    fn page_of(ids: &[i64], total: u64) -> ReactionUsersPage {
        ReactionUsersPage {
            users: ids.iter().map(|id| profile_dto(*id, &format!("user{id}"))).collect(),
            total,
        }
    }

    #[test]
    fn merge_page_dedupes_by_id() {
        let mut data = PaginationData::default();
        data.merge_page(vec![entry(1), entry(2)], 4);
        data.merge_page(vec![entry(2), entry(3)], 4);

        let ids: Vec<i64> = data.users.iter().map(|u| u.user_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(data.current_page, 2);
    }

    #[test]
    fn has_more_follows_server_total() {
        let mut data = PaginationData::default();
        data.merge_page(vec![entry(1), entry(2)], 5);
        assert!(data.has_more_data);

        data.merge_page(vec![entry(3), entry(4), entry(5)], 5);
        assert!(!data.has_more_data);
    }

    #[test]
    fn recompute_pages_uses_ceiling_division() {
        let mut data = PaginationData {
            users: (1..=21).map(entry).collect(),
            total: 40,
            ..Default::default()
        };
        data.recompute_pages(20);
        assert_eq!(data.current_page, 2);
        assert!(data.has_more_data);

        data.users.truncate(20);
        data.recompute_pages(20);
        assert_eq!(data.current_page, 1);
    }

    #[tokio::test]
    async fn load_merges_page_and_updates_index() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        ripple
            .set_current_profile(crate::ripple::profiles::UserProfile::new(1, "tester"))
            .await
            .unwrap();
        mock.push_reaction_page(Ok(page_of(&[10, 11], 2)));

        ripple
            .load_reaction_users(Subject::Other(42), 3)
            .await
            .unwrap();

        let data = ripple
            .reaction_pagination(Subject::Other(42), 3)
            .await
            .unwrap();
        assert_eq!(data.users.len(), 2);
        assert_eq!(data.current_page, 1);
        assert!(!data.has_more_data);
        assert!(!data.is_loading);

        let state = ripple.state.lock().await;
        let indices = state.index.indices_for(11);
        assert_eq!(
            indices.in_other_user_lists.get(&42).and_then(|m| m.get(&3)),
            Some(&1)
        );
    }

    #[tokio::test]
    async fn duplicate_load_is_suppressed() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        {
            let mut state = ripple.state.lock().await;
            state
                .reactions
                .state_mut(Subject::Other(42))
                .entry(3)
                .is_loading = true;
        }

        ripple
            .load_reaction_users(Subject::Other(42), 3)
            .await
            .unwrap();
        assert_eq!(mock.call_count("reaction_users"), 0);
    }

    #[tokio::test]
    async fn loading_same_page_twice_does_not_duplicate() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        // Server returns overlapping pages (an item shifted between pages).
        mock.push_reaction_page(Ok(page_of(&[10, 11], 3)));
        mock.push_reaction_page(Ok(page_of(&[11, 12], 3)));

        ripple
            .load_reaction_users(Subject::Other(42), 1)
            .await
            .unwrap();
        ripple
            .load_reaction_users(Subject::Other(42), 1)
            .await
            .unwrap();

        let data = ripple
            .reaction_pagination(Subject::Other(42), 1)
            .await
            .unwrap();
        let ids: Vec<i64> = data.users.iter().map(|u| u.user_id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
        assert_eq!(mock.call_count("reaction_users"), 2);
    }

    #[tokio::test]
    async fn invalid_reaction_type_is_rejected() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        let err = ripple
            .load_reaction_users(Subject::Other(42), 999)
            .await
            .unwrap_err();
        assert!(matches!(err, RippleError::UnknownReactionType(999)));
        assert_eq!(mock.call_count("reaction_users"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_first_page_load_clears_list() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        for _ in 0..3 {
            mock.push_reaction_page(Err(RippleError::Server {
                code: 500,
                message: "boom".to_string(),
            }));
        }

        let err = ripple
            .load_reaction_users(Subject::Other(42), 1)
            .await
            .unwrap_err();
        assert!(err.is_remote_failure());
        assert_eq!(mock.call_count("reaction_users"), 3);

        let data = ripple
            .reaction_pagination(Subject::Other(42), 1)
            .await
            .unwrap();
        assert!(data.users.is_empty());
        assert_eq!(data.current_page, 0);
        assert_eq!(data.retry_count, 3);
        assert!(data.error.is_some());
        assert!(!data.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_later_page_load_preserves_loaded_data() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        mock.push_reaction_page(Ok(page_of(&[10, 11], 40)));
        for _ in 0..3 {
            mock.push_reaction_page(Err(RippleError::Server {
                code: 500,
                message: "boom".to_string(),
            }));
        }

        ripple
            .load_reaction_users(Subject::Other(42), 1)
            .await
            .unwrap();
        let err = ripple
            .load_reaction_users(Subject::Other(42), 1)
            .await
            .unwrap_err();
        assert!(err.is_remote_failure());

        let data = ripple
            .reaction_pagination(Subject::Other(42), 1)
            .await
            .unwrap();
        assert_eq!(data.users.len(), 2);
        assert!(data.error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_recovers_within_retry_budget() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        mock.push_reaction_page(Err(RippleError::Server {
            code: 503,
            message: "unavailable".to_string(),
        }));
        mock.push_reaction_page(Ok(page_of(&[10], 1)));

        ripple
            .load_reaction_users(Subject::Other(42), 1)
            .await
            .unwrap();

        let data = ripple
            .reaction_pagination(Subject::Other(42), 1)
            .await
            .unwrap();
        assert_eq!(data.users.len(), 1);
        assert_eq!(data.retry_count, 0);
        assert!(data.error.is_none());
    }

    #[tokio::test]
    async fn reset_subject_drops_state_and_index() {
        let (ripple, mock, _dir) = create_mock_ripple().await;
        mock.push_reaction_page(Ok(page_of(&[10], 1)));
        ripple
            .load_reaction_users(Subject::Other(42), 1)
            .await
            .unwrap();

        ripple.reset_reaction_state(Subject::Other(42)).await;

        assert!(
            ripple
                .reaction_pagination(Subject::Other(42), 1)
                .await
                .is_none()
        );
        let state = ripple.state.lock().await;
        assert!(state.index.indices_for(10).is_empty());
    }
}

//! Shared test fixtures: a scripted in-memory [`SocialApi`] and helpers for
//! building a [`Ripple`] instance against it.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tempfile::TempDir;

use crate::api::{
    FollowListPage, Pager, ProfileDto, ReactionAck, ReactionEventDto, ReactionUsersPage,
    SocialApi, TimelinePage,
};
use crate::ripple::credentials::InMemoryCredentials;
use crate::ripple::error::{Result, RippleError};
use crate::ripple::{Ripple, RippleConfig};

pub(crate) fn profile_dto(id: i64, username: &str) -> ProfileDto {
    ProfileDto {
        id,
        username: username.to_string(),
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

pub(crate) fn feed_event(id: i64) -> ReactionEventDto {
    ReactionEventDto {
        id,
        actor_id: 100 + id,
        actor_username: format!("actor{id}"),
        actor_nickname: String::new(),
        actor_avatar: String::new(),
        target_user_id: 200 + id,
        target_nickname: String::new(),
        reaction_type_id: 1 + (id % 19),
        created_at: Utc::now(),
    }
}

pub(crate) fn server_error(message: &str) -> RippleError {
    RippleError::Server {
        code: 500,
        message: message.to_string(),
    }
}

/// Scripted [`SocialApi`] fake.
///
/// Profile fetches are served from a registry keyed by username; everything
/// else pops from a per-method queue of scripted results, falling back to a
/// benign empty response when the queue is empty. Every call is recorded by
/// method name for `call_count` assertions.
#[derive(Default)]
pub(crate) struct MockApi {
    profiles: Mutex<HashMap<String, ProfileDto>>,
    reaction_pages: Mutex<VecDeque<Result<ReactionUsersPage>>>,
    reaction_results: Mutex<VecDeque<Result<ReactionAck>>>,
    follow_results: Mutex<VecDeque<Result<()>>>,
    timeline_results: Mutex<VecDeque<Result<TimelinePage>>>,
    follow_list_results: Mutex<VecDeque<Result<FollowListPage>>>,
    calls: Mutex<Vec<&'static str>>,
    delay: Mutex<Option<Duration>>,
}

impl MockApi {
    pub fn add_profile(&self, dto: ProfileDto) {
        self.profiles
            .lock()
            .unwrap()
            .insert(dto.username.clone(), dto);
    }

    pub fn remove_profile(&self, username: &str) {
        self.profiles.lock().unwrap().remove(username);
    }

    pub fn push_reaction_page(&self, result: Result<ReactionUsersPage>) {
        self.reaction_pages.lock().unwrap().push_back(result);
    }

    pub fn push_reaction_result(&self, result: Result<ReactionAck>) {
        self.reaction_results.lock().unwrap().push_back(result);
    }

    pub fn push_follow_result(&self, result: Result<()>) {
        self.follow_results.lock().unwrap().push_back(result);
    }

    pub fn push_timeline_result(&self, result: Result<TimelinePage>) {
        self.timeline_results.lock().unwrap().push_back(result);
    }

    pub fn push_follow_list_result(&self, result: Result<FollowListPage>) {
        self.follow_list_results.lock().unwrap().push_back(result);
    }

    /// Delays every subsequent response, for in-flight-race tests.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|m| **m == method)
            .count()
    }

    async fn enter(&self, method: &'static str) {
        self.calls.lock().unwrap().push(method);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl SocialApi for MockApi {
    async fn fetch_profile(&self, _token: &str, username: &str) -> Result<ProfileDto> {
        self.enter("fetch_profile").await;
        self.profiles
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .ok_or_else(|| RippleError::Server {
                code: 404,
                message: format!("user not found: {username}"),
            })
    }

    async fn follow(&self, _token: &str, _user_id: i64) -> Result<()> {
        self.enter("follow").await;
        self.follow_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn unfollow(&self, _token: &str, _user_id: i64) -> Result<()> {
        self.enter("unfollow").await;
        self.follow_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn create_reaction(
        &self,
        _token: &str,
        _target_user_id: i64,
        _reaction_type_id: i64,
    ) -> Result<ReactionAck> {
        self.enter("create_reaction").await;
        self.reaction_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ReactionAck::default()))
    }

    async fn reaction_users(
        &self,
        _token: &str,
        _user_id: i64,
        _reaction_type_id: i64,
        _limit: u32,
        _offset: u32,
    ) -> Result<ReactionUsersPage> {
        self.enter("reaction_users").await;
        self.reaction_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ReactionUsersPage::default()))
    }

    async fn global_timeline(
        &self,
        _token: &str,
        page: u32,
        page_size: u32,
    ) -> Result<TimelinePage> {
        self.enter("global_timeline").await;
        self.timeline_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(TimelinePage {
                    list: Vec::new(),
                    pager: Pager {
                        page,
                        page_size,
                        total_rows: 0,
                    },
                })
            })
    }

    async fn follows(
        &self,
        _token: &str,
        _username: &str,
        _page: u32,
        _page_size: u32,
    ) -> Result<FollowListPage> {
        self.enter("follows").await;
        self.follow_list_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(FollowListPage::default()))
    }

    async fn followings(
        &self,
        _token: &str,
        _username: &str,
        _page: u32,
        _page_size: u32,
    ) -> Result<FollowListPage> {
        self.enter("followings").await;
        self.follow_list_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(FollowListPage::default()))
    }
}

fn test_config(root: &std::path::Path) -> RippleConfig {
    let mut config = RippleConfig::new(
        &root.join("data"),
        &root.join("logs"),
        "http://localhost:0",
    );
    // Small retention so window tests stay fast.
    config.feed_retention_limit = 100;
    config
}

/// Creates a [`Ripple`] instance wired to a scripted mock API, with its data
/// and logs in a fresh temp directory.
pub(crate) async fn create_mock_ripple() -> (Arc<Ripple>, Arc<MockApi>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (ripple, mock) = reopen_mock_ripple(&dir).await;
    (ripple, mock, dir)
}

/// Re-creates a [`Ripple`] over an existing temp directory, simulating an
/// app restart against the same persisted store.
pub(crate) async fn reopen_mock_ripple(dir: &TempDir) -> (Arc<Ripple>, Arc<MockApi>) {
    let mock = Arc::new(MockApi::default());
    let credentials = Arc::new(InMemoryCredentials::new("test-token", "tester"));
    let ripple = Ripple::new(test_config(dir.path()), mock.clone(), credentials)
        .await
        .expect("Failed to create Ripple instance");
    (ripple, mock)
}

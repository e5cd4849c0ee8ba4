//! Remote API surface.
//!
//! The core consumes the backend through the [`SocialApi`] trait so tests
//! can substitute a scripted in-memory fake; [`RestApi`] is the production
//! implementation over JSON/HTTPS with bearer-token auth.

use async_trait::async_trait;

pub(crate) mod envelope;
mod rest;
pub mod types;

pub use rest::RestApi;
pub use types::{
    FollowListPage, Pager, ProfileDto, ReactionAck, ReactionEventDto, ReactionUsersPage,
    TimelinePage,
};

use crate::ripple::error::Result;

/// The remote operations the social-state cache depends on.
///
/// All calls are authenticated with the caller-supplied bearer token; the
/// trait deliberately takes the token per call rather than holding it, so an
/// implementation never caches credentials across a logout.
#[async_trait]
pub trait SocialApi: Send + Sync {
    /// `GET /v1/user/profile?username=`
    async fn fetch_profile(&self, token: &str, username: &str) -> Result<ProfileDto>;

    /// `POST /v1/user/follow`
    async fn follow(&self, token: &str, user_id: i64) -> Result<()>;

    /// `POST /v1/user/unfollow`
    async fn unfollow(&self, token: &str, user_id: i64) -> Result<()>;

    /// `POST /v1/user/reaction`
    async fn create_reaction(
        &self,
        token: &str,
        target_user_id: i64,
        reaction_type_id: i64,
    ) -> Result<ReactionAck>;

    /// `GET /v1/user/reaction/users?reaction_type_id=&limit=&offset=&user_id=`
    async fn reaction_users(
        &self,
        token: &str,
        user_id: i64,
        reaction_type_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<ReactionUsersPage>;

    /// `GET /v1/user/reactions/timeline/global?page=&page_size=`
    async fn global_timeline(&self, token: &str, page: u32, page_size: u32)
    -> Result<TimelinePage>;

    /// `GET /v1/user/follows?username=&page=&page_size=`
    async fn follows(
        &self,
        token: &str,
        username: &str,
        page: u32,
        page_size: u32,
    ) -> Result<FollowListPage>;

    /// `GET /v1/user/followings?username=&page=&page_size=`
    async fn followings(
        &self,
        token: &str,
        username: &str,
        page: u32,
        page_size: u32,
    ) -> Result<FollowListPage>;
}

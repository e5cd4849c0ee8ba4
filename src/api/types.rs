//! Wire DTOs for the Ripple REST API.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user profile as the server sends it. Most fields default so partial
/// payloads (e.g. reactor-list entries) still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDto {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub follows: u32,
    #[serde(default)]
    pub followings: u32,
    #[serde(default)]
    pub tweets_count: u32,
    #[serde(default)]
    pub is_following: bool,
    #[serde(default)]
    pub is_friend: bool,
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(default)]
    pub reaction_counts: HashMap<i64, u32>,
    #[serde(default)]
    pub is_online: bool,
}

/// One page of "who reacted with type T" for a subject user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReactionUsersPage {
    #[serde(default)]
    pub users: Vec<ProfileDto>,
    #[serde(default)]
    pub total: u64,
}

/// Structured success payload for `POST /v1/user/reaction`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReactionAck {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reaction_type_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pager {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_rows: u64,
}

/// One event on the global reaction timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionEventDto {
    pub id: i64,
    pub actor_id: i64,
    #[serde(default)]
    pub actor_username: String,
    #[serde(default)]
    pub actor_nickname: String,
    #[serde(default)]
    pub actor_avatar: String,
    pub target_user_id: i64,
    #[serde(default)]
    pub target_nickname: String,
    pub reaction_type_id: i64,
    pub created_at: DateTime<Utc>,
}

/// One page of the global reaction timeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelinePage {
    #[serde(default)]
    pub list: Vec<ReactionEventDto>,
    #[serde(default)]
    pub pager: Pager,
}

/// One page of a follows/followings list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowListPage {
    #[serde(default)]
    pub users: Vec<ProfileDto>,
    #[serde(default)]
    pub total: u64,
}

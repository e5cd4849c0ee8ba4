use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::api::envelope::{decode_ack, decode_payload};
use crate::api::types::{FollowListPage, ProfileDto, ReactionAck, ReactionUsersPage, TimelinePage};
use crate::api::SocialApi;
use crate::ripple::error::{Result, RippleError};

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Production [`SocialApi`] implementation over reqwest.
pub struct RestApi {
    http: reqwest::Client,
    base_url: String,
}

impl RestApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reads the body, mapping non-2xx statuses to a server error that
    /// carries the backend's message when one can be extracted.
    async fn read_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let message = extract_server_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        Err(RippleError::Server {
            code: status.as_u16() as i64,
            message,
        })
    }

    async fn get(&self, token: &str, path: &str, query: &[(&str, String)]) -> Result<String> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn post_json(&self, token: &str, path: &str, body: serde_json::Value) -> Result<String> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::read_body(response).await
    }
}

/// Best-effort extraction of `msg` / `message` from an error body.
fn extract_server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("msg")
        .or_else(|| value.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

#[async_trait]
impl SocialApi for RestApi {
    async fn fetch_profile(&self, token: &str, username: &str) -> Result<ProfileDto> {
        let body = self
            .get(
                token,
                "/v1/user/profile",
                &[("username", username.to_string())],
            )
            .await?;
        decode_payload(&body)
    }

    async fn follow(&self, token: &str, user_id: i64) -> Result<()> {
        let body = self
            .post_json(token, "/v1/user/follow", json!({ "user_id": user_id }))
            .await?;
        decode_ack(&body).map(|_| ())
    }

    async fn unfollow(&self, token: &str, user_id: i64) -> Result<()> {
        let body = self
            .post_json(token, "/v1/user/unfollow", json!({ "user_id": user_id }))
            .await?;
        decode_ack(&body).map(|_| ())
    }

    async fn create_reaction(
        &self,
        token: &str,
        target_user_id: i64,
        reaction_type_id: i64,
    ) -> Result<ReactionAck> {
        let body = self
            .post_json(
                token,
                "/v1/user/reaction",
                json!({
                    "target_user_id": target_user_id,
                    "reaction_type_id": reaction_type_id,
                }),
            )
            .await?;
        decode_ack(&body)
    }

    async fn reaction_users(
        &self,
        token: &str,
        user_id: i64,
        reaction_type_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<ReactionUsersPage> {
        let body = self
            .get(
                token,
                "/v1/user/reaction/users",
                &[
                    ("reaction_type_id", reaction_type_id.to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                    ("user_id", user_id.to_string()),
                ],
            )
            .await?;
        decode_payload(&body)
    }

    async fn global_timeline(
        &self,
        token: &str,
        page: u32,
        page_size: u32,
    ) -> Result<TimelinePage> {
        let body = self
            .get(
                token,
                "/v1/user/reactions/timeline/global",
                &[
                    ("page", page.to_string()),
                    ("page_size", page_size.to_string()),
                ],
            )
            .await?;
        decode_payload(&body)
    }

    async fn follows(
        &self,
        token: &str,
        username: &str,
        page: u32,
        page_size: u32,
    ) -> Result<FollowListPage> {
        let body = self
            .get(
                token,
                "/v1/user/follows",
                &[
                    ("username", username.to_string()),
                    ("page", page.to_string()),
                    ("page_size", page_size.to_string()),
                ],
            )
            .await?;
        decode_payload(&body)
    }

    async fn followings(
        &self,
        token: &str,
        username: &str,
        page: u32,
        page_size: u32,
    ) -> Result<FollowListPage> {
        let body = self
            .get(
                token,
                "/v1/user/followings",
                &[
                    ("username", username.to_string()),
                    ("page", page.to_string()),
                    ("page_size", page_size.to_string()),
                ],
            )
            .await?;
        decode_payload(&body)
    }
}

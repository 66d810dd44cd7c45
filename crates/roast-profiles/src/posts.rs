//! Client for the hosted posts-dataset actor.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::error::ProfileError;
use crate::types::RawPost;

const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2";
const POSTS_ACTOR_ID: &str = "harvestapi~linkedin-profile-posts";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActorInput<'a> {
    start_urls: [&'a str; 1],
    max_items: u32,
}

/// Runs the posts actor synchronously and returns its dataset items.
pub struct PostsClient {
    client: Client,
    token: String,
    base_url: String,
    max_posts: u32,
}

impl PostsClient {
    /// # Errors
    ///
    /// Returns [`ProfileError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        token: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_posts: u32,
    ) -> Result<Self, ProfileError> {
        Self::with_base_url(token, timeout_secs, user_agent, max_posts, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ProfileError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ProfileError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        token: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_posts: u32,
        base_url: &str,
    ) -> Result<Self, ProfileError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        reqwest::Url::parse(base_url).map_err(|e| ProfileError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            token: token.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            max_posts,
        })
    }

    /// Fetches up to `max_posts` recent posts for a profile.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::Unauthorized`] on HTTP 401.
    /// - [`ProfileError::CreditsExhausted`] on HTTP 402.
    /// - [`ProfileError::RateLimited`] on HTTP 429.
    /// - [`ProfileError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ProfileError::Http`] on network failure.
    /// - [`ProfileError::Deserialize`] if the body is not an array of items.
    pub async fn fetch_posts(&self, profile_url: &str) -> Result<Vec<RawPost>, ProfileError> {
        let url = format!(
            "{}/acts/{POSTS_ACTOR_ID}/run-sync-get-dataset-items",
            self.base_url
        );
        let input = ActorInput {
            start_urls: [profile_url],
            max_items: self.max_posts,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&input)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => return Err(ProfileError::Unauthorized),
            StatusCode::PAYMENT_REQUIRED => return Err(ProfileError::CreditsExhausted),
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(ProfileError::RateLimited {
                    retry_after_secs: 60,
                })
            }
            s if !s.is_success() => {
                return Err(ProfileError::UnexpectedStatus {
                    status: s.as_u16(),
                    url,
                })
            }
            _ => {}
        }

        let body = response.text().await?;
        let mut posts =
            serde_json::from_str::<Vec<RawPost>>(&body).map_err(|e| ProfileError::Deserialize {
                context: format!("posts for {profile_url}"),
                source: e,
            })?;
        posts.truncate(self.max_posts as usize);
        Ok(posts)
    }
}

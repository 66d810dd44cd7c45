//! HTTP client for the hosted profile API.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::{Client, StatusCode};

use crate::error::ProfileError;
use crate::types::RawProfile;

const DEFAULT_BASE_URL: &str = "https://nubela.co/proxycurl/api/v2";

/// Client for the profile lookup endpoint.
///
/// Use [`ProfileClient::new`] for production or [`ProfileClient::with_base_url`]
/// to point at a mock server in tests.
pub struct ProfileClient {
    client: Client,
    api_key: String,
    base_url: String,
}

static PROFILE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)linkedin\.com/(in|pub)/[^/?#\s]+").expect("valid profile URL regex")
});

/// Whether `url` looks like a public profile URL.
#[must_use]
pub fn is_profile_url(url: &str) -> bool {
    PROFILE_URL_RE.is_match(url)
}

impl ProfileClient {
    /// # Errors
    ///
    /// Returns [`ProfileError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ProfileError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ProfileError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
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
            api_key: api_key.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Fetches one profile by its public URL.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::InvalidProfileUrl`] if `profile_url` is not a profile URL
    ///   (no request is made).
    /// - [`ProfileError::Unauthorized`] on HTTP 401.
    /// - [`ProfileError::CreditsExhausted`] on HTTP 402.
    /// - [`ProfileError::NotFound`] on HTTP 404.
    /// - [`ProfileError::RateLimited`] on HTTP 429.
    /// - [`ProfileError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ProfileError::Http`] on network failure.
    /// - [`ProfileError::Deserialize`] if the body is not a profile object.
    pub async fn fetch_profile(&self, profile_url: &str) -> Result<RawProfile, ProfileError> {
        if !is_profile_url(profile_url) {
            return Err(ProfileError::InvalidProfileUrl {
                url: profile_url.to_owned(),
            });
        }

        let url = format!("{}/linkedin", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("url", profile_url), ("use_cache", "if-present")])
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => return Err(ProfileError::Unauthorized),
            StatusCode::PAYMENT_REQUIRED => return Err(ProfileError::CreditsExhausted),
            StatusCode::NOT_FOUND => {
                return Err(ProfileError::NotFound {
                    url: profile_url.to_owned(),
                })
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(ProfileError::RateLimited { retry_after_secs });
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
        serde_json::from_str::<RawProfile>(&body).map_err(|e| ProfileError::Deserialize {
            context: format!("profile {profile_url}"),
            source: e,
        })
    }
}

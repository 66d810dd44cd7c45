//! Shared client construction and status mapping for the media services.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::error::MediaError;

/// Longest error body kept in [`MediaError::UnexpectedStatus`].
const MAX_ERROR_BODY_CHARS: usize = 300;

pub(crate) fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, MediaError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?)
}

pub(crate) fn normalize_base_url(base_url: &str) -> Result<String, MediaError> {
    reqwest::Url::parse(base_url).map_err(|e| MediaError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    Ok(base_url.trim_end_matches('/').to_owned())
}

/// Passes 2xx responses through and maps everything else to a typed error.
pub(crate) async fn check_status(
    service: &'static str,
    response: Response,
) -> Result<Response, MediaError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(MediaError::Unauthorized { service })
        }
        StatusCode::PAYMENT_REQUIRED => Err(MediaError::QuotaExhausted { service }),
        StatusCode::TOO_MANY_REQUESTS => Err(MediaError::RateLimited { service }),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(MediaError::UnexpectedStatus {
                service,
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            })
        }
    }
}

pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    response: Response,
    context: impl Into<String>,
) -> Result<T, MediaError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| MediaError::Deserialize {
        context: context.into(),
        source: e,
    })
}

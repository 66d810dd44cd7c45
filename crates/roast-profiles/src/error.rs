use roast_core::CollaboratorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("profile API rejected the API key")]
    Unauthorized,

    #[error("profile API credits exhausted")]
    CreditsExhausted,

    #[error("profile not found or private: {url}")]
    NotFound { url: String },

    #[error("rate limited by profile API (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid profile URL \"{url}\": must contain linkedin.com/in/ or linkedin.com/pub/")]
    InvalidProfileUrl { url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl From<ProfileError> for CollaboratorError {
    fn from(err: ProfileError) -> Self {
        let message = err.to_string();
        match err {
            ProfileError::Http(_) | ProfileError::InvalidBaseUrl { .. } => {
                CollaboratorError::Transport(message)
            }
            ProfileError::Deserialize { .. } => CollaboratorError::Malformed(message),
            ProfileError::Unauthorized => CollaboratorError::Unauthorized(message),
            ProfileError::CreditsExhausted => CollaboratorError::QuotaExhausted(message),
            ProfileError::NotFound { .. } => CollaboratorError::NotFound(message),
            ProfileError::RateLimited { .. } => CollaboratorError::RateLimited(message),
            ProfileError::UnexpectedStatus { status, .. } => {
                CollaboratorError::Status { status, message }
            }
            ProfileError::InvalidProfileUrl { .. } => CollaboratorError::InvalidIdentifier(message),
        }
    }
}

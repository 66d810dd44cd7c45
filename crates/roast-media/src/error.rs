use roast_core::CollaboratorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{service} rejected the API key")]
    Unauthorized { service: &'static str },

    #[error("{service} quota exhausted")]
    QuotaExhausted { service: &'static str },

    #[error("rate limited by {service}")]
    RateLimited { service: &'static str },

    #[error("{service} returned HTTP {status}: {body}")]
    UnexpectedStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} response missing {field}")]
    MissingField {
        service: &'static str,
        field: &'static str,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl From<MediaError> for CollaboratorError {
    fn from(err: MediaError) -> Self {
        let message = err.to_string();
        match err {
            MediaError::Http(_) | MediaError::InvalidBaseUrl { .. } => {
                CollaboratorError::Transport(message)
            }
            MediaError::Deserialize { .. } | MediaError::MissingField { .. } => {
                CollaboratorError::Malformed(message)
            }
            MediaError::Unauthorized { .. } => CollaboratorError::Unauthorized(message),
            MediaError::QuotaExhausted { .. } => CollaboratorError::QuotaExhausted(message),
            MediaError::RateLimited { .. } => CollaboratorError::RateLimited(message),
            MediaError::UnexpectedStatus { status, .. } => {
                CollaboratorError::Status { status, message }
            }
        }
    }
}

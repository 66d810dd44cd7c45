use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide configuration, loaded once at startup and handed to adapter
/// constructors.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub profile_api_key: String,
    pub anthropic_api_key: String,
    pub elevenlabs_api_key: String,
    pub did_api_key: String,
    /// Enables post acquisition when present.
    pub posts_api_token: Option<String>,
    pub profile_base_url: String,
    pub posts_base_url: String,
    pub anthropic_base_url: String,
    pub elevenlabs_base_url: String,
    pub did_base_url: String,
    pub anthropic_model: String,
    pub voice_id: String,
    pub tts_model: String,
    pub avatar_url: String,
    pub max_posts: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_in_flight: usize,
    pub batch_deadline_secs: u64,
    pub poll_interval_secs: u64,
    pub poll_max_attempts: u32,
    pub short_poll_max_attempts: u32,
    pub poll_max_transient_failures: u32,
    pub high_network_threshold: u32,
    pub medium_network_threshold: u32,
}

impl AppConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn batch_deadline(&self) -> Duration {
        Duration::from_secs(self.batch_deadline_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("profile_api_key", &"[redacted]")
            .field("anthropic_api_key", &"[redacted]")
            .field("elevenlabs_api_key", &"[redacted]")
            .field("did_api_key", &"[redacted]")
            .field(
                "posts_api_token",
                &self.posts_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("profile_base_url", &self.profile_base_url)
            .field("posts_base_url", &self.posts_base_url)
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field("elevenlabs_base_url", &self.elevenlabs_base_url)
            .field("did_base_url", &self.did_base_url)
            .field("anthropic_model", &self.anthropic_model)
            .field("voice_id", &self.voice_id)
            .field("tts_model", &self.tts_model)
            .field("avatar_url", &self.avatar_url)
            .field("max_posts", &self.max_posts)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_in_flight", &self.max_in_flight)
            .field("batch_deadline_secs", &self.batch_deadline_secs)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("poll_max_attempts", &self.poll_max_attempts)
            .field("short_poll_max_attempts", &self.short_poll_max_attempts)
            .field(
                "poll_max_transient_failures",
                &self.poll_max_transient_failures,
            )
            .field("high_network_threshold", &self.high_network_threshold)
            .field("medium_network_threshold", &self.medium_network_threshold)
            .finish()
    }
}

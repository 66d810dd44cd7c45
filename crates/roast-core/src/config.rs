use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_PROFILE_BASE_URL: &str = "https://nubela.co/proxycurl/api/v2";
const DEFAULT_POSTS_BASE_URL: &str = "https://api.apify.com/v2";
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io";
const DEFAULT_DID_BASE_URL: &str = "https://api.d-id.com";
const DEFAULT_AVATAR_URL: &str = "https://d-id-public-bucket.s3.amazonaws.com/alice.jpg";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Network-size cut-offs for persona classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkThresholds {
    pub high: u32,
    pub medium: u32,
}

/// Load only the classification thresholds, without requiring any API keys.
///
/// Loads `.env` first, like [`load_app_config`].
///
/// # Errors
///
/// Returns `ConfigError` if a threshold is not a number or medium exceeds high.
pub fn load_network_thresholds() -> Result<NetworkThresholds, ConfigError> {
    dotenvy::dotenv().ok();
    build_network_thresholds(&|key: &str| std::env::var(key))
}

fn build_network_thresholds<F>(lookup: &F) -> Result<NetworkThresholds, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = lookup(var).unwrap_or_else(|_| default.to_string());
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let high = parse_u32("ROAST_HIGH_NETWORK_THRESHOLD", "1000")?;
    let medium = parse_u32("ROAST_MEDIUM_NETWORK_THRESHOLD", "500")?;
    if medium > high {
        return Err(ConfigError::InvalidEnvVar {
            var: "ROAST_MEDIUM_NETWORK_THRESHOLD".to_string(),
            reason: format!("must not exceed ROAST_HIGH_NETWORK_THRESHOLD ({high})"),
        });
    }
    Ok(NetworkThresholds { high, medium })
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let at_least_one = |var: &str, value: u64| -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    };

    let env = parse_environment(&or_default("ROAST_ENV", "development"))?;
    let bind_addr = parse_addr("ROAST_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("ROAST_LOG_LEVEL", "info");

    let profile_api_key = require("PROXYCURL_API_KEY")?;
    let anthropic_api_key = require("ANTHROPIC_API_KEY")?;
    let elevenlabs_api_key = require("ELEVENLABS_API_KEY")?;
    let did_api_key = require("DID_API_KEY")?;
    let posts_api_token = lookup("APIFY_API_TOKEN")
        .ok()
        .filter(|v| !v.trim().is_empty());

    let profile_base_url = or_default("ROAST_PROFILE_BASE_URL", DEFAULT_PROFILE_BASE_URL);
    let posts_base_url = or_default("ROAST_POSTS_BASE_URL", DEFAULT_POSTS_BASE_URL);
    let anthropic_base_url = or_default("ROAST_ANTHROPIC_BASE_URL", DEFAULT_ANTHROPIC_BASE_URL);
    let elevenlabs_base_url = or_default("ROAST_ELEVENLABS_BASE_URL", DEFAULT_ELEVENLABS_BASE_URL);
    let did_base_url = or_default("ROAST_DID_BASE_URL", DEFAULT_DID_BASE_URL);

    let anthropic_model = or_default("ROAST_ANTHROPIC_MODEL", "claude-3-5-sonnet-20241022");
    let voice_id = or_default("ROAST_VOICE_ID", "pNInz6obpgDQGcFmaJgB");
    let tts_model = or_default("ROAST_TTS_MODEL", "eleven_multilingual_v2");
    let avatar_url = or_default("ROAST_AVATAR_URL", DEFAULT_AVATAR_URL);
    let max_posts = parse_u32("ROAST_MAX_POSTS", "20")?;

    let request_timeout_secs = parse_u64("ROAST_REQUEST_TIMEOUT_SECS", "60")?;
    let user_agent = or_default("ROAST_USER_AGENT", "roast/0.1 (persona-pipeline)");

    let max_in_flight = parse_usize("ROAST_MAX_IN_FLIGHT", "4")?;
    at_least_one("ROAST_MAX_IN_FLIGHT", max_in_flight as u64)?;
    let batch_deadline_secs = parse_u64("ROAST_BATCH_DEADLINE_SECS", "900")?;
    at_least_one("ROAST_BATCH_DEADLINE_SECS", batch_deadline_secs)?;

    let poll_interval_secs = parse_u64("ROAST_POLL_INTERVAL_SECS", "10")?;
    let poll_max_attempts = parse_u32("ROAST_POLL_MAX_ATTEMPTS", "60")?;
    at_least_one("ROAST_POLL_MAX_ATTEMPTS", u64::from(poll_max_attempts))?;
    let short_poll_max_attempts = parse_u32("ROAST_SHORT_POLL_MAX_ATTEMPTS", "30")?;
    at_least_one(
        "ROAST_SHORT_POLL_MAX_ATTEMPTS",
        u64::from(short_poll_max_attempts),
    )?;
    let poll_max_transient_failures = parse_u32("ROAST_POLL_MAX_TRANSIENT_FAILURES", "5")?;

    let NetworkThresholds {
        high: high_network_threshold,
        medium: medium_network_threshold,
    } = build_network_thresholds(&lookup)?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        profile_api_key,
        anthropic_api_key,
        elevenlabs_api_key,
        did_api_key,
        posts_api_token,
        profile_base_url,
        posts_base_url,
        anthropic_base_url,
        elevenlabs_base_url,
        did_base_url,
        anthropic_model,
        voice_id,
        tts_model,
        avatar_url,
        max_posts,
        request_timeout_secs,
        user_agent,
        max_in_flight,
        batch_deadline_secs,
        poll_interval_secs,
        poll_max_attempts,
        short_poll_max_attempts,
        poll_max_transient_failures,
        high_network_threshold,
        medium_network_threshold,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ROAST_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Roast script generation through the Anthropic Messages API.

use async_trait::async_trait;
use reqwest::Client;
use roast_core::{CollaboratorError, Persona, PersonaResult, ProfileRecord, ScriptWriter};
use serde::{Deserialize, Serialize};

use crate::error::MediaError;
use crate::http::{build_client, check_status, normalize_base_url, read_json};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const SERVICE: &str = "anthropic";
const MAX_TOKENS: u32 = 500;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ApiMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

/// [`ScriptWriter`] that asks a Claude model for a JSON `{"script": ...}` roast.
pub struct AnthropicScriptWriter {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicScriptWriter {
    /// # Errors
    ///
    /// Returns [`MediaError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, MediaError> {
        Self::with_base_url(api_key, model, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`MediaError::Http`] if the client cannot be constructed, or
    /// [`MediaError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, MediaError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Sends one user message and returns the first text block of the reply.
    ///
    /// # Errors
    ///
    /// Returns a [`MediaError`] on transport failure, a non-2xx status, or a
    /// reply without text content.
    pub async fn send(&self, prompt: &str) -> Result<String, MediaError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: [ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;
        let response = check_status(SERVICE, response).await?;
        let parsed: MessagesResponse = read_json(response, "messages response").await?;

        parsed
            .content
            .into_iter()
            .find(|block| block.block_type == "text")
            .and_then(|block| block.text)
            .ok_or(MediaError::MissingField {
                service: SERVICE,
                field: "text content",
            })
    }
}

#[async_trait]
impl ScriptWriter for AnthropicScriptWriter {
    async fn complete(
        &self,
        persona: &PersonaResult,
        profile: &ProfileRecord,
    ) -> Result<String, CollaboratorError> {
        let prompt = build_prompt(persona.persona, profile);
        let text = self.send(&prompt).await?;
        tracing::debug!(
            profile = %profile.identifier(),
            persona = %persona.persona,
            chars = text.len(),
            "script completion received"
        );
        Ok(text)
    }
}

/// Comedian brief for one profile.
#[must_use]
pub fn build_prompt(persona: Persona, profile: &ProfileRecord) -> String {
    let profile_json =
        serde_json::to_string_pretty(profile).unwrap_or_else(|_| profile.identifier().to_string());

    format!(
        "You are a witty comedian creating a playful roast of this LinkedIn profile.

Profile Data:
{profile_json}

Detected Persona: {persona} ({description})

Create a humorous but not mean-spirited roast that:
1. Playfully calls out their {persona} behavior patterns
2. Makes fun of typical LinkedIn stereotypes they exhibit
3. References specific details from their profile
4. Keeps it light and entertaining (not actually insulting)
5. Is 100-150 words, suitable for text-to-speech

Examples based on persona:
- NETWORKER: \"Oh look, another 'thought leader' who posts 3 times a day...\"
- GHOST: \"This person's LinkedIn is like a haunted house - beautiful on the outside, nobody home inside...\"
- HUSTLER: \"Every post screams 'BUY MY COURSE!' louder than a carnival barker...\"
- LURKER: \"The LinkedIn equivalent of that friend who reads all your messages but never replies...\"

Respond with only a JSON object with a single \"script\" field containing the roast text.",
        description = persona.description(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_persona_and_profile() {
        let mut profile = ProfileRecord::new("https://www.linkedin.com/in/grace");
        profile.display_name = Some("Grace Hopper".into());
        let prompt = build_prompt(Persona::Lurker, &profile);
        assert!(prompt.contains("Detected Persona: LURKER"));
        assert!(prompt.contains("Grace Hopper"));
        assert!(prompt.contains("\"script\""));
        assert!(prompt.contains("100-150 words"));
    }
}

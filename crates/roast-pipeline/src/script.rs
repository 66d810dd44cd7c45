//! Parsing of script-writer completions.

use roast_core::{ArtifactError, Persona, ScriptArtifact};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("completion is not a JSON object: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("completion has no non-empty string `script` field")]
    MissingScript,

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Extracts the `script` field from a completion and bounds it.
///
/// Completions wrapped in a markdown code fence are accepted.
///
/// # Errors
///
/// Returns [`ScriptError`] when the completion is not a JSON object or its
/// `script` field is absent, not a string, or blank.
pub fn parse_script(persona: Persona, completion: &str) -> Result<ScriptArtifact, ScriptError> {
    let value: Value = serde_json::from_str(strip_code_fences(completion))?;
    let text = value
        .as_object()
        .and_then(|obj| obj.get("script"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ScriptError::MissingScript)?;

    let script = ScriptArtifact::new(persona, text)?;
    if !script.within_target() {
        tracing::debug!(
            persona = %persona,
            words = script.word_count(),
            "script shorter than target length"
        );
    }
    Ok(script)
}

fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // skip the language tag line
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => return text,
    };
    match body.rfind("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

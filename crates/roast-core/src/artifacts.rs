//! Script and audio artifacts produced by the content stages.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use thiserror::Error;

use crate::persona::Persona;

pub const SCRIPT_MIN_WORDS: usize = 100;
pub const SCRIPT_MAX_WORDS: usize = 150;
pub const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("script text is empty")]
    EmptyScript,

    #[error("audio payload is empty")]
    EmptyAudio,

    #[error("audio payload is not valid base64: {0}")]
    InvalidBase64(String),
}

/// Narrative text for one persona, bounded to [`SCRIPT_MAX_WORDS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptArtifact {
    persona: Persona,
    text: String,
    word_count: usize,
}

impl ScriptArtifact {
    /// Builds a script, cutting over-long text back to the last sentence end
    /// that fits inside the word limit, or to exactly the limit when no
    /// sentence ends in range.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::EmptyScript`] when `text` has no words.
    pub fn new(persona: Persona, text: &str) -> Result<Self, ArtifactError> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Err(ArtifactError::EmptyScript);
        }

        let kept = if words.len() <= SCRIPT_MAX_WORDS {
            words
        } else {
            let window = &words[..SCRIPT_MAX_WORDS];
            let cut = window
                .iter()
                .rposition(|w| ends_sentence(w))
                .map_or(SCRIPT_MAX_WORDS, |i| i + 1);
            window[..cut].to_vec()
        };

        Ok(Self {
            persona,
            word_count: kept.len(),
            text: kept.join(" "),
        })
    }

    #[must_use]
    pub fn persona(&self) -> Persona {
        self.persona
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    #[must_use]
    pub fn within_target(&self) -> bool {
        (SCRIPT_MIN_WORDS..=SCRIPT_MAX_WORDS).contains(&self.word_count)
    }
}

fn ends_sentence(word: &str) -> bool {
    let trimmed = word.trim_end_matches(['"', '\'', ')', '\u{201d}']);
    trimmed.ends_with(['.', '!', '?'])
}

/// Synthesized speech payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    bytes: Vec<u8>,
    mime_type: String,
}

impl AudioArtifact {
    /// A blank MIME type is replaced with [`DEFAULT_AUDIO_MIME`].
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::EmptyAudio`] when `bytes` is empty.
    pub fn new(bytes: Vec<u8>, mime_type: Option<&str>) -> Result<Self, ArtifactError> {
        if bytes.is_empty() {
            return Err(ArtifactError::EmptyAudio);
        }
        let mime_type = mime_type
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_AUDIO_MIME)
            .to_string();
        Ok(Self { bytes, mime_type })
    }

    /// Decodes a base64 payload as sent by API clients.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::InvalidBase64`] on malformed input and
    /// [`ArtifactError::EmptyAudio`] when it decodes to nothing.
    pub fn from_base64(encoded: &str, mime_type: Option<&str>) -> Result<Self, ArtifactError> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| ArtifactError::InvalidBase64(e.to_string()))?;
        Self::new(bytes, mime_type)
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn empty_script_is_rejected() {
        assert_eq!(
            ScriptArtifact::new(Persona::Ghost, "  \n ").unwrap_err(),
            ArtifactError::EmptyScript
        );
    }

    #[test]
    fn short_script_is_kept_verbatim_but_flagged() {
        let s = ScriptArtifact::new(Persona::Ghost, "Hello there. General roast.").unwrap();
        assert_eq!(s.text(), "Hello there. General roast.");
        assert_eq!(s.word_count(), 4);
        assert!(!s.within_target());
    }

    #[test]
    fn long_script_is_cut_at_last_sentence_boundary() {
        let text = format!("{}. {} tail", words(120), words(60));
        let s = ScriptArtifact::new(Persona::Hustler, &text).unwrap();
        assert_eq!(s.word_count(), 120);
        assert!(s.text().ends_with("word."));
        assert!(s.within_target());
    }

    #[test]
    fn long_script_without_sentence_end_is_hard_cut() {
        let s = ScriptArtifact::new(Persona::Lurker, &words(200)).unwrap();
        assert_eq!(s.word_count(), SCRIPT_MAX_WORDS);
    }

    #[test]
    fn quoted_sentence_end_counts_as_boundary() {
        assert!(ends_sentence("done.\""));
        assert!(ends_sentence("really?)"));
        assert!(!ends_sentence("comma,"));
    }

    #[test]
    fn empty_audio_is_rejected() {
        assert_eq!(
            AudioArtifact::new(Vec::new(), Some("audio/mpeg")).unwrap_err(),
            ArtifactError::EmptyAudio
        );
    }

    #[test]
    fn blank_mime_defaults_to_mpeg() {
        let a = AudioArtifact::new(vec![1, 2, 3], Some("  ")).unwrap();
        assert_eq!(a.mime_type(), "audio/mpeg");
        let b = AudioArtifact::new(vec![1], None).unwrap();
        assert_eq!(b.mime_type(), "audio/mpeg");
    }

    #[test]
    fn base64_payload_decodes() {
        let a = AudioArtifact::from_base64("AQID", Some("audio/wav")).unwrap();
        assert_eq!(a.bytes(), &[1, 2, 3]);
        assert_eq!(a.to_base64(), "AQID");
        assert_eq!(a.mime_type(), "audio/wav");
    }

    #[test]
    fn malformed_base64_is_rejected() {
        assert!(matches!(
            AudioArtifact::from_base64("not base64!!", None),
            Err(ArtifactError::InvalidBase64(_))
        ));
    }
}

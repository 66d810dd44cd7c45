//! HTTP adapters for the script, speech, and video collaborators.

pub mod anthropic;
pub mod did;
pub mod elevenlabs;
pub mod error;
mod http;

pub use anthropic::{build_prompt, AnthropicScriptWriter};
pub use did::{DidVideoClient, TalkStatus};
pub use elevenlabs::ElevenLabsSpeech;
pub use error::MediaError;

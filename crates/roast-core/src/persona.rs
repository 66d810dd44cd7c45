use serde::{Deserialize, Serialize};

/// Label reported for items whose classification never ran.
pub const UNKNOWN_PERSONA_LABEL: &str = "Unknown";

/// Behavioral persona taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Persona {
    Networker,
    Ghost,
    Hustler,
    Lurker,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::Networker,
        Persona::Ghost,
        Persona::Hustler,
        Persona::Lurker,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Persona::Networker => "NETWORKER",
            Persona::Ghost => "GHOST",
            Persona::Hustler => "HUSTLER",
            Persona::Lurker => "LURKER",
        }
    }

    /// One-line characterization used in prompts and reasoning text.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Persona::Networker => {
                "posts constantly, comments on everything, treats every interaction as a networking opportunity"
            }
            Persona::Ghost => "rarely active, sparse profile, last post was years ago",
            Persona::Hustler => {
                "always selling something, side hustles galore, every post is a pitch"
            }
            Persona::Lurker => {
                "reads everything, engages with nothing, occasionally likes a post from 2019"
            }
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaResult {
    pub persona: Persona,
    /// Integer in `0..=100`.
    pub confidence: u8,
    pub reasoning: String,
    pub content_suggestions: Vec<String>,
}

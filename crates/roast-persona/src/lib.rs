//! Deterministic persona classification from profile signals.
//!
//! Rules are evaluated in a fixed order and the first match wins. Confidence
//! counts how many of the four independent signals (cadence, network size,
//! promotional keywords, post count) agree with the chosen persona.

mod lexicon;
pub mod rules;

use roast_core::{Persona, PersonaResult, ProfileRecord};

pub use rules::{RuleId, Signals};

pub const DEFAULT_HIGH_NETWORK_THRESHOLD: u32 = 1000;
pub const DEFAULT_MEDIUM_NETWORK_THRESHOLD: u32 = 500;

const SIGNAL_NAMES: [&str; 4] = ["cadence", "network size", "keywords", "post count"];

/// Classifier thresholds. Network sizes strictly above a threshold count as
/// above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    pub high_network_threshold: u32,
    pub medium_network_threshold: u32,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            high_network_threshold: DEFAULT_HIGH_NETWORK_THRESHOLD,
            medium_network_threshold: DEFAULT_MEDIUM_NETWORK_THRESHOLD,
        }
    }
}

impl Classifier {
    #[must_use]
    pub fn new(high_network_threshold: u32, medium_network_threshold: u32) -> Self {
        Self {
            high_network_threshold,
            medium_network_threshold,
        }
    }

    /// Classifies a profile. Never fails; sparse profiles yield low confidence.
    #[must_use]
    pub fn classify(&self, profile: &ProfileRecord) -> PersonaResult {
        let signals = Signals::from_profile(profile);
        let (rule, persona) = self.select(&signals);

        let agreeing = rules::agreement(persona, self, &signals);
        let agree_count = agreeing.iter().filter(|a| **a).count();
        let confidence = lexicon::CONFIDENCE_BY_AGREEMENT[agree_count.min(4)];

        tracing::debug!(
            profile = %profile.identifier(),
            rule = ?rule,
            persona = %persona,
            confidence,
            "classified profile"
        );

        PersonaResult {
            persona,
            confidence,
            reasoning: reasoning(rule, persona, &signals, agreeing),
            content_suggestions: lexicon::suggestions_for(persona)
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// First rule that fires, with the persona it assigns.
    #[must_use]
    pub fn select(&self, signals: &Signals) -> (RuleId, Persona) {
        RuleId::ORDER
            .iter()
            .find_map(|rule| rule.evaluate(self, signals).map(|p| (*rule, p)))
            .unwrap_or((RuleId::Fallback, Persona::Ghost))
    }
}

/// Classifies with default thresholds.
#[must_use]
pub fn classify(profile: &ProfileRecord) -> PersonaResult {
    Classifier::default().classify(profile)
}

fn reasoning(rule: RuleId, persona: Persona, signals: &Signals, agreeing: [bool; 4]) -> String {
    let details = [
        signals.cadence.map_or_else(
            || "cadence is unknown".to_string(),
            |c| format!("cadence is {c}"),
        ),
        signals.network_size.map_or_else(
            || "network size is unknown".to_string(),
            |n| format!("network size is {n}"),
        ),
        signals.promo_marker.map_or_else(
            || format!("no promotional language in {} recent posts", signals.posts_inspected),
            |m| format!("recent posts say \"{m}\""),
        ),
        format!("{} posts on record", signals.post_count),
    ];

    let supporting: Vec<String> = SIGNAL_NAMES
        .iter()
        .zip(details)
        .zip(agreeing)
        .filter(|(_, agrees)| *agrees)
        .map(|((name, detail), _)| format!("{name} ({detail})"))
        .collect();

    if supporting.is_empty() {
        format!(
            "Classified as {persona} because of {}; no signal strongly supports it.",
            rule.describe()
        )
    } else {
        format!(
            "Classified as {persona} because of {}. Supporting signals: {}.",
            rule.describe(),
            supporting.join(", ")
        )
    }
}

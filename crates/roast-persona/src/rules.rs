//! Ordered decision rules and the signals they read.

use roast_core::{Persona, PostingCadence, ProfileRecord};

use crate::lexicon::find_marker;
use crate::Classifier;

/// Number of most recent posts inspected for promotional markers.
pub const RECENT_POST_WINDOW: usize = 3;

/// Signals extracted from a profile, each evaluated independently.
///
/// A signal whose input the profile does not carry is `None` (or, for
/// keywords, has no inspected posts) and never counts as agreement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signals {
    /// Known only when reported by the provider or derived from actual posts.
    pub cadence: Option<PostingCadence>,
    /// Known only when connections or followers were reported.
    pub network_size: Option<u32>,
    /// First promotional marker found in the recent posts.
    pub promo_marker: Option<&'static str>,
    /// How many recent posts were scanned for markers.
    pub posts_inspected: usize,
    pub post_count: usize,
}

impl Signals {
    #[must_use]
    pub fn from_profile(profile: &ProfileRecord) -> Self {
        let recent = profile.recent_posts(RECENT_POST_WINDOW);
        let promo_marker = recent.iter().find_map(|post| find_marker(&post.text));

        let reported = profile
            .reported_cadence
            .is_some_and(|c| c != PostingCadence::Unknown);
        let derived_from_posts = profile.post_count() > 0;
        let cadence = Some(profile.posting_cadence())
            .filter(|c| *c != PostingCadence::Unknown && (reported || derived_from_posts));

        Self {
            cadence,
            network_size: profile
                .connections
                .or(profile.followers)
                .map(|_| profile.network_size()),
            promo_marker,
            posts_inspected: recent.len(),
            post_count: profile.post_count(),
        }
    }

    /// Network size for rule selection; unknown counts as empty.
    fn network_or_zero(&self) -> u32 {
        self.network_size.unwrap_or(0)
    }
}

/// Classification rules in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleId {
    /// Very active with a large network; markers decide Hustler vs Networker.
    ActiveLargeNetwork,
    /// Inactive cadence or at most one post.
    Dormant,
    /// Between two and ten posts.
    Occasional,
    /// More than ten posts; network size decides.
    Prolific,
    /// No posts at all. Always matches.
    Fallback,
}

impl RuleId {
    pub const ORDER: [RuleId; 5] = [
        RuleId::ActiveLargeNetwork,
        RuleId::Dormant,
        RuleId::Occasional,
        RuleId::Prolific,
        RuleId::Fallback,
    ];

    /// Returns the persona this rule assigns, or `None` when it does not fire.
    #[must_use]
    pub fn evaluate(self, classifier: &Classifier, signals: &Signals) -> Option<Persona> {
        match self {
            RuleId::ActiveLargeNetwork => {
                let fires = signals.cadence == Some(PostingCadence::VeryActive)
                    && signals.network_or_zero() > classifier.high_network_threshold;
                fires.then(|| {
                    if signals.promo_marker.is_some() {
                        Persona::Hustler
                    } else {
                        Persona::Networker
                    }
                })
            }
            RuleId::Dormant => (signals.cadence == Some(PostingCadence::Inactive)
                || signals.post_count <= 1)
                .then_some(Persona::Ghost),
            RuleId::Occasional => (2..=10)
                .contains(&signals.post_count)
                .then_some(Persona::Lurker),
            RuleId::Prolific => (signals.post_count > 10).then(|| {
                if signals.network_or_zero() <= classifier.medium_network_threshold {
                    Persona::Hustler
                } else {
                    Persona::Networker
                }
            }),
            RuleId::Fallback => Some(Persona::Ghost),
        }
    }

    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            RuleId::ActiveLargeNetwork => "very active poster with a large network",
            RuleId::Dormant => "inactive or nearly empty posting history",
            RuleId::Occasional => "a handful of posts",
            RuleId::Prolific => "a long posting history",
            RuleId::Fallback => "no posts to go on",
        }
    }
}

/// Whether each signal supports `persona`, in the order
/// cadence, network, keyword, post count. Unknown inputs never agree.
#[must_use]
pub fn agreement(persona: Persona, classifier: &Classifier, signals: &Signals) -> [bool; 4] {
    let high = classifier.high_network_threshold;
    let medium = classifier.medium_network_threshold;
    let cadence_is = |wanted: &[PostingCadence]| {
        signals.cadence.is_some_and(|c| wanted.contains(&c))
    };
    let network = signals.network_size;
    let inspected = signals.posts_inspected > 0;
    let marker = signals.promo_marker.is_some();
    let count = signals.post_count;

    match persona {
        Persona::Networker => [
            cadence_is(&[PostingCadence::VeryActive, PostingCadence::Active]),
            network.is_some_and(|n| n > medium),
            inspected && !marker,
            count > 10,
        ],
        Persona::Hustler => [
            cadence_is(&[PostingCadence::VeryActive]),
            network.is_some_and(|n| n > high),
            marker,
            count > 10,
        ],
        Persona::Ghost => [
            cadence_is(&[PostingCadence::Inactive]),
            network.is_some_and(|n| n <= medium),
            inspected && !marker,
            count <= 1,
        ],
        Persona::Lurker => [
            cadence_is(&[PostingCadence::Active]),
            network.is_some_and(|n| n <= high),
            inspected && !marker,
            (2..=10).contains(&count),
        ],
    }
}

//! Fixed phrase tables used by the classifier.

use roast_core::Persona;

/// Promotional-language markers, lowercase. Matched as substrings.
pub(crate) const PROMO_MARKERS: &[&str] = &[
    "dm me",
    "looking for",
    "opportunity",
    "partnership",
    "exclusive",
    "limited spots",
];

/// Confidence by number of agreeing signals (index = count).
pub(crate) const CONFIDENCE_BY_AGREEMENT: [u8; 5] = [20, 40, 60, 80, 95];

const NETWORKER_SUGGESTIONS: &[&str] = &[
    "A reminder that 500+ connections is not the same as 500 friends",
    "Ask which of those weekly 'thrilled to announce' posts anyone actually read",
    "Suggest one coffee chat that is not secretly a pitch",
    "Celebrate a week without the word 'synergy'",
];

const GHOST_SUGGESTIONS: &[&str] = &[
    "Check whether the profile photo predates the smartphone",
    "Point out that the last status update still says 'open to work' from 2017",
    "Invite them to post anything, even a single emoji",
    "Count how many former coworkers think they left the industry",
];

const HUSTLER_SUGGESTIONS: &[&str] = &[
    "Count the side hustles listed in the headline",
    "Ask what the 'exclusive opportunity' actually sells",
    "Estimate how many DMs open with 'quick question'",
    "Offer a limited-spots masterclass on not selling for one post",
];

const LURKER_SUGGESTIONS: &[&str] = &[
    "Thank them for the single like on a 2019 post",
    "Reveal how many profiles they viewed without saying hello",
    "Encourage a first comment longer than 'Congrats!'",
    "Nudge them to share one opinion they have been drafting for years",
];

/// Persona-specific content ideas, always four entries.
pub(crate) fn suggestions_for(persona: Persona) -> &'static [&'static str] {
    match persona {
        Persona::Networker => NETWORKER_SUGGESTIONS,
        Persona::Ghost => GHOST_SUGGESTIONS,
        Persona::Hustler => HUSTLER_SUGGESTIONS,
        Persona::Lurker => LURKER_SUGGESTIONS,
    }
}

/// First promotional marker found in `text`, case-insensitively.
pub(crate) fn find_marker(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    PROMO_MARKERS
        .iter()
        .copied()
        .find(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_match_case_insensitively() {
        assert_eq!(find_marker("DM ME for details"), Some("dm me"));
        assert_eq!(find_marker("An Exclusive offer"), Some("exclusive"));
    }

    #[test]
    fn plain_text_has_no_marker() {
        assert_eq!(find_marker("Shipped a new release today"), None);
        assert_eq!(find_marker(""), None);
    }

    #[test]
    fn every_persona_has_four_suggestions() {
        for persona in Persona::ALL {
            assert_eq!(suggestions_for(persona).len(), 4, "{persona}");
        }
    }

    #[test]
    fn confidence_table_is_increasing() {
        assert!(CONFIDENCE_BY_AGREEMENT.windows(2).all(|w| w[0] < w[1]));
    }
}

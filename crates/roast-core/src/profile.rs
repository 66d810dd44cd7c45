//! Normalized profile record produced by the acquisition collaborator.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Window in which three or more posts mark a profile as very active.
const VERY_ACTIVE_WINDOW_DAYS: i64 = 30;
/// A profile with no dated post inside this window is inactive.
const INACTIVE_WINDOW_DAYS: i64 = 90;
const VERY_ACTIVE_MIN_POSTS: usize = 3;

/// Qualitative posting cadence, either reported by the provider or derived
/// from post timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingCadence {
    VeryActive,
    Active,
    Inactive,
    Unknown,
}

impl std::fmt::Display for PostingCadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostingCadence::VeryActive => write!(f, "very active"),
            PostingCadence::Active => write!(f, "active"),
            PostingCadence::Inactive => write!(f, "inactive"),
            PostingCadence::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub text: String,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub shares: u32,
}

impl PostSummary {
    #[must_use]
    pub fn engagement(&self) -> u64 {
        u64::from(self.likes) + u64::from(self.comments) + u64::from(self.shares)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub title: String,
    pub organization: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub name: String,
    #[serde(default)]
    pub endorsements: u32,
}

/// A normalized professional profile.
///
/// The identifier is fixed at construction and keys every downstream artifact
/// for the item; it is readable through [`ProfileRecord::identifier`] but has
/// no setter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    identifier: String,
    pub display_name: Option<String>,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub profile_picture_url: Option<String>,
    pub connections: Option<u32>,
    pub followers: Option<u32>,
    /// Cadence as reported by the data provider, when it reports one.
    pub reported_cadence: Option<PostingCadence>,
    pub captured_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub posts: Vec<PostSummary>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
}

impl ProfileRecord {
    /// Creates an empty record for `identifier`.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: None,
            headline: None,
            bio: None,
            location: None,
            profile_picture_url: None,
            connections: None,
            followers: None,
            reported_cadence: None,
            captured_at: None,
            posts: Vec::new(),
            experience: Vec::new(),
            skills: Vec::new(),
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Larger of the connection and follower counts; `0` when neither is known.
    #[must_use]
    pub fn network_size(&self) -> u32 {
        self.connections
            .unwrap_or(0)
            .max(self.followers.unwrap_or(0))
    }

    #[must_use]
    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    /// Posts ordered newest first, truncated to `limit`.
    ///
    /// Undated posts sort after dated ones and keep their original relative
    /// order.
    #[must_use]
    pub fn recent_posts(&self, limit: usize) -> Vec<&PostSummary> {
        let mut posts: Vec<&PostSummary> = self.posts.iter().collect();
        posts.sort_by(|a, b| match (a.published_at, b.published_at) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        posts.truncate(limit);
        posts
    }

    /// Provider-reported cadence, or one derived from post timestamps.
    #[must_use]
    pub fn posting_cadence(&self) -> PostingCadence {
        match self.reported_cadence {
            Some(reported) if reported != PostingCadence::Unknown => reported,
            _ => derive_cadence(&self.posts, self.captured_at),
        }
    }

    /// Profile completeness in `0..=100`.
    ///
    /// Every populated optional field adds a fixed weight, so filling in a
    /// field never lowers the score.
    #[must_use]
    pub fn completeness_score(&self) -> u8 {
        let mut score: u32 = 0;

        if has_text(self.display_name.as_deref()) {
            score += 15;
        }
        if has_text(self.headline.as_deref()) {
            score += 15;
        }
        if has_text(self.location.as_deref()) {
            score += 10;
        }
        if has_text(self.profile_picture_url.as_deref()) {
            score += 10;
        }
        if has_text(self.bio.as_deref()) {
            score += 15;
        }
        if !self.experience.is_empty() {
            score += 15;
        }
        if self.followers.is_some_and(|n| n > 0) {
            score += 5;
        }
        if self.connections.is_some_and(|n| n > 0) {
            score += 5;
        }
        if !self.posts.is_empty() {
            score += 5;
        }
        if !self.skills.is_empty() {
            score += 5;
        }

        u8::try_from(score.min(100)).unwrap_or(100)
    }
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn derive_cadence(posts: &[PostSummary], captured_at: Option<DateTime<Utc>>) -> PostingCadence {
    if posts.is_empty() {
        return PostingCadence::Inactive;
    }

    let dated: Vec<DateTime<Utc>> = posts.iter().filter_map(|p| p.published_at).collect();
    let Some(newest) = dated.iter().max().copied() else {
        return PostingCadence::Unknown;
    };
    let reference = captured_at.unwrap_or(newest);

    let within = |days: i64| {
        dated
            .iter()
            .filter(|t| reference.signed_duration_since(**t) <= Duration::days(days))
            .count()
    };

    if within(VERY_ACTIVE_WINDOW_DAYS) >= VERY_ACTIVE_MIN_POSTS {
        PostingCadence::VeryActive
    } else if within(INACTIVE_WINDOW_DAYS) == 0 {
        PostingCadence::Inactive
    } else {
        PostingCadence::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(days_ago: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap() - Duration::days(days_ago)
    }

    fn post(text: &str, days_ago: Option<i64>) -> PostSummary {
        PostSummary {
            text: text.to_string(),
            published_at: days_ago.map(at),
            likes: 0,
            comments: 0,
            shares: 0,
        }
    }

    #[test]
    fn network_size_takes_larger_count() {
        let mut p = ProfileRecord::new("https://linkedin.com/in/a");
        assert_eq!(p.network_size(), 0);
        p.connections = Some(300);
        p.followers = Some(1200);
        assert_eq!(p.network_size(), 1200);
    }

    #[test]
    fn recent_posts_orders_newest_first_and_undated_last() {
        let mut p = ProfileRecord::new("id");
        p.posts = vec![
            post("undated", None),
            post("old", Some(40)),
            post("new", Some(1)),
            post("mid", Some(10)),
        ];
        let texts: Vec<&str> = p.recent_posts(3).iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["new", "mid", "old"]);
    }

    #[test]
    fn cadence_without_posts_is_inactive() {
        let p = ProfileRecord::new("id");
        assert_eq!(p.posting_cadence(), PostingCadence::Inactive);
    }

    #[test]
    fn cadence_with_three_recent_posts_is_very_active() {
        let mut p = ProfileRecord::new("id");
        p.captured_at = Some(at(0));
        p.posts = vec![post("a", Some(1)), post("b", Some(5)), post("c", Some(20))];
        assert_eq!(p.posting_cadence(), PostingCadence::VeryActive);
    }

    #[test]
    fn cadence_with_only_stale_posts_is_inactive() {
        let mut p = ProfileRecord::new("id");
        p.captured_at = Some(at(0));
        p.posts = vec![post("a", Some(200)), post("b", Some(365))];
        assert_eq!(p.posting_cadence(), PostingCadence::Inactive);
    }

    #[test]
    fn cadence_with_undated_posts_is_unknown() {
        let mut p = ProfileRecord::new("id");
        p.posts = vec![post("a", None), post("b", None)];
        assert_eq!(p.posting_cadence(), PostingCadence::Unknown);
    }

    #[test]
    fn reported_cadence_wins_over_derived() {
        let mut p = ProfileRecord::new("id");
        p.reported_cadence = Some(PostingCadence::VeryActive);
        assert_eq!(p.posting_cadence(), PostingCadence::VeryActive);
    }

    #[test]
    fn completeness_is_zero_for_empty_record() {
        assert_eq!(ProfileRecord::new("id").completeness_score(), 0);
    }

    #[test]
    fn completeness_never_decreases_when_fields_are_filled() {
        let mut p = ProfileRecord::new("id");
        let mut last = p.completeness_score();

        let steps: Vec<Box<dyn Fn(&mut ProfileRecord)>> = vec![
            Box::new(|p| p.display_name = Some("Ada".into())),
            Box::new(|p| p.headline = Some("Engineer".into())),
            Box::new(|p| p.location = Some("London".into())),
            Box::new(|p| p.profile_picture_url = Some("https://img".into())),
            Box::new(|p| p.bio = Some("About me".into())),
            Box::new(|p| {
                p.experience.push(ExperienceEntry {
                    title: "Engineer".into(),
                    organization: "Analytical Engines".into(),
                    start_date: None,
                    end_date: None,
                    current: true,
                });
            }),
            Box::new(|p| p.followers = Some(10)),
            Box::new(|p| p.connections = Some(10)),
            Box::new(|p| p.posts.push(post("hello", Some(1)))),
            Box::new(|p| {
                p.skills.push(SkillEntry {
                    name: "Rust".into(),
                    endorsements: 3,
                });
            }),
        ];

        for step in &steps {
            step(&mut p);
            let next = p.completeness_score();
            assert!(next > last, "score should grow: {last} -> {next}");
            last = next;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn blank_strings_do_not_count_toward_completeness() {
        let mut p = ProfileRecord::new("id");
        p.display_name = Some("   ".into());
        assert_eq!(p.completeness_score(), 0);
    }

    #[test]
    fn engagement_sums_interactions() {
        let mut p = post("x", None);
        p.likes = 10;
        p.comments = 2;
        p.shares = 1;
        assert_eq!(p.engagement(), 13);
    }
}

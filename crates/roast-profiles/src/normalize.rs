//! Conversion from provider payloads to [`roast_core::ProfileRecord`].

use chrono::{DateTime, NaiveDate, Utc};
use roast_core::{ExperienceEntry, PostSummary, ProfileRecord, SkillEntry};

use crate::types::{ProviderDate, RawExperience, RawPost, RawProfile};

/// Builds a profile record keyed by `identifier`, the URL the caller asked
/// for, rather than the canonical URL the provider echoes back.
#[must_use]
pub fn normalize_profile(
    identifier: &str,
    raw: RawProfile,
    captured_at: DateTime<Utc>,
) -> ProfileRecord {
    let mut record = ProfileRecord::new(identifier);

    record.display_name = display_name(&raw);
    record.headline = non_blank(raw.headline).or_else(|| non_blank(raw.occupation));
    record.bio = non_blank(raw.summary);
    record.location = location(raw.city, raw.state, raw.country_full_name);
    record.profile_picture_url = non_blank(raw.profile_pic_url);
    record.connections = raw.connections;
    record.followers = raw.follower_count;
    record.captured_at = Some(captured_at);

    record.experience = raw
        .experiences
        .into_iter()
        .enumerate()
        .map(|(idx, exp)| normalize_experience(idx, exp))
        .collect();

    // Languages stand in for skills when the provider returns none.
    record.skills = if raw.skills.is_empty() {
        raw.languages
            .into_iter()
            .filter_map(non_blank_str)
            .map(|name| SkillEntry {
                name,
                endorsements: 0,
            })
            .collect()
    } else {
        raw.skills
            .into_iter()
            .filter_map(|s| {
                non_blank(s.name).map(|name| SkillEntry {
                    name,
                    endorsements: s.endorsements.unwrap_or(0),
                })
            })
            .collect()
    };

    record
}

fn display_name(raw: &RawProfile) -> Option<String> {
    if let Some(full) = raw.full_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        return Some(full.to_string());
    }
    let joined = format!(
        "{} {}",
        raw.first_name.as_deref().unwrap_or(""),
        raw.last_name.as_deref().unwrap_or("")
    );
    non_blank_str(joined)
}

fn location(
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
) -> Option<String> {
    let parts: Vec<String> = [city, state, country]
        .into_iter()
        .filter_map(non_blank)
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn normalize_experience(idx: usize, exp: RawExperience) -> ExperienceEntry {
    ExperienceEntry {
        title: non_blank(exp.title).unwrap_or_else(|| format!("Experience {}", idx + 1)),
        organization: non_blank(exp.company).unwrap_or_else(|| "Unknown Company".to_string()),
        start_date: exp.starts_at.and_then(provider_date),
        end_date: exp.ends_at.and_then(provider_date),
        current: exp.ends_at.is_none(),
    }
}

/// Missing day or month default to the first; a missing year means no date.
pub(crate) fn provider_date(date: ProviderDate) -> Option<NaiveDate> {
    let year = date.year?;
    NaiveDate::from_ymd_opt(year, date.month.unwrap_or(1), date.day.unwrap_or(1))
}

/// Normalizes a dataset item, preferring the `*Count` names over the short ones.
#[must_use]
pub fn normalize_post(raw: RawPost) -> PostSummary {
    PostSummary {
        text: non_blank(raw.text)
            .or_else(|| non_blank(raw.content))
            .unwrap_or_default(),
        published_at: non_blank(raw.published_at)
            .or_else(|| non_blank(raw.date))
            .and_then(|s| parse_timestamp(&s)),
        likes: raw.likes_count.or(raw.likes).unwrap_or(0),
        comments: raw.comments_count.or(raw.comments).unwrap_or(0),
        shares: raw.shares_count.or(raw.shares).unwrap_or(0),
    }
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(non_blank_str)
}

fn non_blank_str(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

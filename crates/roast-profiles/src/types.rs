//! Raw response shapes from the profile and posts providers.

use serde::Deserialize;

/// A `{day, month, year}` date as returned by the profile API.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct ProviderDate {
    pub day: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExperience {
    pub starts_at: Option<ProviderDate>,
    pub ends_at: Option<ProviderDate>,
    pub company: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSkill {
    pub name: Option<String>,
    pub endorsements: Option<u32>,
}

/// Profile payload. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProfile {
    pub linkedin_profile_url: Option<String>,
    pub profile_pic_url: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub occupation: Option<String>,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub country_full_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(default)]
    pub experiences: Vec<RawExperience>,
    #[serde(default)]
    pub skills: Vec<RawSkill>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub connections: Option<u32>,
    pub follower_count: Option<u32>,
}

/// One item from the posts dataset. The actor emits either naming scheme
/// depending on its version, so both are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    pub text: Option<String>,
    pub content: Option<String>,
    pub published_at: Option<String>,
    pub date: Option<String>,
    pub likes_count: Option<u32>,
    pub likes: Option<u32>,
    pub comments_count: Option<u32>,
    pub comments: Option<u32>,
    pub shares_count: Option<u32>,
    pub shares: Option<u32>,
}

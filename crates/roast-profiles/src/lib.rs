pub mod client;
pub mod error;
pub mod normalize;
pub mod posts;
pub mod source;
pub mod types;

pub use client::{is_profile_url, ProfileClient};
pub use error::ProfileError;
pub use normalize::{normalize_post, normalize_profile};
pub use posts::PostsClient;
pub use source::LinkedInSource;
pub use types::{ProviderDate, RawExperience, RawPost, RawProfile, RawSkill};

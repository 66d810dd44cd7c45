//! [`ProfileSource`] backed by the profile API and, optionally, the posts actor.

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt, TryStreamExt};
use roast_core::{Acquired, CollaboratorError, ProfileRecord, ProfileSource};

use crate::client::ProfileClient;
use crate::normalize::{normalize_post, normalize_profile};
use crate::posts::PostsClient;

/// Fetches profiles concurrently, preserving input order.
///
/// A batch-fatal error from any profile request (bad key, no credits) fails
/// the whole acquisition. Everything else is reported per identifier. Post
/// retrieval is best-effort: a failure is logged and the profile continues
/// without posts.
pub struct LinkedInSource {
    profiles: ProfileClient,
    posts: Option<PostsClient>,
    max_concurrent: usize,
}

impl LinkedInSource {
    #[must_use]
    pub fn new(profiles: ProfileClient, posts: Option<PostsClient>, max_concurrent: usize) -> Self {
        Self {
            profiles,
            posts,
            max_concurrent: max_concurrent.max(1),
        }
    }

    async fn acquire_one(&self, identifier: &str) -> Result<Acquired, CollaboratorError> {
        let raw = match self.profiles.fetch_profile(identifier).await {
            Ok(raw) => raw,
            Err(e) => {
                let err = CollaboratorError::from(e);
                if err.is_batch_fatal() {
                    tracing::error!(
                        profile = %identifier,
                        error = %err,
                        "profile acquisition aborted"
                    );
                    return Err(err);
                }
                tracing::warn!(profile = %identifier, error = %err, "profile fetch failed");
                return Ok(Err(err));
            }
        };

        let mut record = normalize_profile(identifier, raw, Utc::now());
        self.attach_posts(&mut record).await;

        tracing::debug!(
            profile = %identifier,
            posts = record.post_count(),
            completeness = record.completeness_score(),
            "profile acquired"
        );
        Ok(Ok(record))
    }

    async fn attach_posts(&self, record: &mut ProfileRecord) {
        let Some(posts) = &self.posts else {
            return;
        };
        match posts.fetch_posts(record.identifier()).await {
            Ok(raw) => record.posts = raw.into_iter().map(normalize_post).collect(),
            Err(e) => tracing::warn!(
                profile = %record.identifier(),
                error = %e,
                "post fetch failed; continuing without posts"
            ),
        }
    }
}

#[async_trait]
impl ProfileSource for LinkedInSource {
    async fn acquire(&self, identifiers: &[String]) -> Result<Vec<Acquired>, CollaboratorError> {
        let pending: Vec<_> = identifiers.iter().map(|id| self.acquire_one(id)).collect();
        stream::iter(pending)
            .buffered(self.max_concurrent)
            .try_collect()
            .await
    }
}

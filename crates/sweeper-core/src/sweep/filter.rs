use chrono::{DateTime, Utc};

use crate::retention::RetentionPolicy;
use crate::timeline::Post;
use crate::Result;

/// Applies the retention policy to a page
pub struct FilterStage<'a> {
    policy: &'a RetentionPolicy,
}

impl<'a> FilterStage<'a> {
    pub fn new(policy: &'a RetentionPolicy) -> Self {
        Self { policy }
    }

    /// Posts to delete, in input order.
    /// A policy error discards the whole selection.
    pub fn filter(&self, posts: &[Post], now: DateTime<Utc>) -> Result<Vec<Post>> {
        let mut to_delete = Vec::new();

        for post in posts {
            let decision = self.policy.decide(post, now)?;
            if decision.delete {
                tracing::debug!("Candidate for deletion: id={} ({})", post.id, decision.reason);
                to_delete.push(post.clone());
            } else {
                tracing::trace!("Keeping id={} ({})", post.id, decision.reason);
            }
        }

        tracing::info!("Found {} candidates to delete out of {}", to_delete.len(), posts.len());
        Ok(to_delete)
    }
}

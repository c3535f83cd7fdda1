//! Retention rules: decide whether a post is kept or deleted
//!
//! Pure over the post and the supplied "now".

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::config::RetentionConfig;
use crate::timeline::Post;
use crate::Result;

/// Original posts at least `min_age_days` old need `min_engagement` to survive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub min_age_days: u32,
    pub min_engagement: u64,
}

/// Why a post was kept or deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    SelfFavorite,
    TooRecent,
    Engaged { engagement: u64, bar: u64 },
    LowEngagement { engagement: u64, bar: u64 },
    RecentReshare,
    StaleReshare,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::SelfFavorite => write!(f, "self-favorite"),
            Reason::TooRecent => write!(f, "too-recent"),
            Reason::Engaged { engagement, bar } => write!(f, "engagement ({} >= {})", engagement, bar),
            Reason::LowEngagement { engagement, bar } => {
                write!(f, "low-engagement ({} < {})", engagement, bar)
            }
            Reason::RecentReshare => write!(f, "recent-reshare"),
            Reason::StaleReshare => write!(f, "stale-reshare"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub delete: bool,
    pub reason: Reason,
}

impl Decision {
    fn keep(reason: Reason) -> Self {
        Self { delete: false, reason }
    }

    fn delete(reason: Reason) -> Self {
        Self { delete: true, reason }
    }
}

#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    /// Sorted by `min_age_days`, largest first
    tiers: Vec<Tier>,
    reshare_max_age: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::from_config(&RetentionConfig::default())
    }
}

impl RetentionPolicy {
    pub fn new(mut tiers: Vec<Tier>, reshare_max_age_days: u32) -> Self {
        tiers.sort_by(|a, b| b.min_age_days.cmp(&a.min_age_days));
        Self {
            tiers,
            reshare_max_age: Duration::days(i64::from(reshare_max_age_days)),
        }
    }

    pub fn from_config(config: &RetentionConfig) -> Self {
        let tiers = config
            .tiers
            .iter()
            .map(|t| Tier {
                min_age_days: t.min_age_days,
                min_engagement: t.min_engagement,
            })
            .collect();
        Self::new(tiers, config.reshare_max_age_days)
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Decide the fate of `post` as of `now`.
    /// Fails only when the post's timestamp cannot be parsed.
    pub fn decide(&self, post: &Post, now: DateTime<Utc>) -> Result<Decision> {
        let created = post.created_at_time()?;
        let age = now - created;

        if post.is_reshare() {
            return Ok(if age > self.reshare_max_age {
                Decision::delete(Reason::StaleReshare)
            } else {
                Decision::keep(Reason::RecentReshare)
            });
        }

        if post.favorited {
            return Ok(Decision::keep(Reason::SelfFavorite));
        }

        let engagement = post.engagement();
        let tier = self
            .tiers
            .iter()
            .find(|t| age >= Duration::days(i64::from(t.min_age_days)));

        Ok(match tier {
            Some(t) if engagement < t.min_engagement => Decision::delete(Reason::LowEngagement {
                engagement,
                bar: t.min_engagement,
            }),
            Some(t) => Decision::keep(Reason::Engaged {
                engagement,
                bar: t.min_engagement,
            }),
            None => Decision::keep(Reason::TooRecent),
        })
    }
}

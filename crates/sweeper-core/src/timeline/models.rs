use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Layout of `created_at` as returned by the v1.1 API
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Post identifier. Larger ids are newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PostId(pub u64);

impl PostId {
    pub fn parse(id: &str) -> Result<Self> {
        id.trim()
            .parse()
            .map(PostId)
            .map_err(|_| Error::InvalidId(id.to_string()))
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Paging position: fetch posts with id at or below the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCursor {
    /// Start of the walk, most recent posts
    Unbounded,
    AtOrBelow(PostId),
}

impl PageCursor {
    pub fn max_id(&self) -> Option<PostId> {
        match self {
            PageCursor::Unbounded => None,
            PageCursor::AtOrBelow(id) => Some(*id),
        }
    }

    /// Whether moving to `next` makes progress (strictly older)
    pub fn advances_to(&self, next: PostId) -> bool {
        match self {
            PageCursor::Unbounded => true,
            PageCursor::AtOrBelow(current) => next < *current,
        }
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageCursor::Unbounded => write!(f, "unbounded"),
            PageCursor::AtOrBelow(id) => write!(f, "<= {}", id),
        }
    }
}

/// A post on the timeline, as seen by the retention policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    /// Raw timestamp, parsed on demand
    pub created_at: String,
    pub author: String,
    #[serde(default)]
    pub text: String,
    pub favorite_count: u64,
    pub share_count: u64,
    pub quote_count: u64,
    pub reply_count: u64,
    /// The authenticated user favorited this post
    pub favorited: bool,
    /// Set when this post is a reshare of another post
    pub reshare_of: Option<PostId>,
}

impl Post {
    pub fn created_at_time(&self) -> Result<DateTime<Utc>> {
        DateTime::parse_from_str(&self.created_at, CREATED_AT_FORMAT)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| Error::Timestamp {
                id: self.id.0,
                value: self.created_at.clone(),
            })
    }

    pub fn is_reshare(&self) -> bool {
        self.reshare_of.is_some()
    }

    pub fn engagement(&self) -> u64 {
        self.favorite_count
            .saturating_add(self.share_count)
            .saturating_add(self.quote_count)
            .saturating_add(self.reply_count)
    }
}

/// Smallest id in a page, or None for an empty page
pub fn min_id(posts: &[Post]) -> Option<PostId> {
    posts.iter().map(|p| p.id).min()
}

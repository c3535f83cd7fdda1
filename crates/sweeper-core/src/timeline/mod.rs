//! Remote timeline capabilities
//!
//! The sweep loop only sees these traits. `TwitterClient` talks to the REST
//! API; `MemoryTimeline` backs tests.

mod client;
#[cfg(test)]
mod memory;
mod models;
pub mod oauth;
pub mod wire;

use std::sync::Arc;

pub use client::{TwitterClient, TwitterConnector};
#[cfg(test)]
pub use memory::{MemoryConnector, MemoryTimeline};
pub use models::{min_id, PageCursor, Post, PostId, CREATED_AT_FORMAT};

use crate::credentials::Credentials;
use crate::Result;

/// Outcome of a single delete call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The post no longer exists remotely
    AlreadyGone,
}

/// Paginated read of the authenticated user's timeline
#[async_trait::async_trait]
pub trait TimelineSource: Send + Sync {
    /// Up to `count` posts with id at or below the cursor, newest first
    async fn fetch_page(&self, count: u32, cursor: PageCursor) -> Result<Vec<Post>>;
}

/// Delete-by-id on the remote timeline
#[async_trait::async_trait]
pub trait PostDeleter: Send + Sync {
    async fn delete(&self, id: PostId) -> Result<DeleteOutcome>;
}

/// Both halves of the remote API
pub trait Timeline: TimelineSource + PostDeleter {}

impl<T: TimelineSource + PostDeleter> Timeline for T {}

/// Builds an authenticated timeline for one run
#[async_trait::async_trait]
pub trait TimelineConnector: Send + Sync {
    async fn connect(&self, credentials: Credentials) -> Result<Arc<dyn Timeline>>;
}

//! In-memory timeline for unit tests

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;

use super::{DeleteOutcome, PageCursor, Post, PostDeleter, PostId, Timeline, TimelineConnector, TimelineSource};
use crate::credentials::Credentials;
use crate::{Error, Result};

#[derive(Default)]
struct State {
    /// Newest first
    posts: Vec<Post>,
    fetch_calls: usize,
    delete_calls: Vec<PostId>,
    fail_fetch_on_call: Option<usize>,
    fail_delete: HashSet<PostId>,
    scripted_pages: Option<Vec<Vec<Post>>>,
}

/// Timeline held in memory, with failure injection
#[derive(Clone, Default)]
pub struct MemoryTimeline {
    state: Arc<Mutex<State>>,
}

impl MemoryTimeline {
    pub fn new(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        Self {
            state: Arc::new(Mutex::new(State {
                posts,
                ..State::default()
            })),
        }
    }

    /// Serve these pages verbatim, one per fetch, ignoring the cursor.
    /// Further fetches return an empty page.
    pub fn scripted(pages: Vec<Vec<Post>>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                scripted_pages: Some(pages),
                ..State::default()
            })),
        }
    }

    /// Make the n-th fetch (1-based) fail
    pub async fn fail_fetch_on_call(&self, call: usize) {
        self.state.lock().await.fail_fetch_on_call = Some(call);
    }

    /// Make deletes of this id fail
    pub async fn fail_delete_of(&self, id: PostId) {
        self.state.lock().await.fail_delete.insert(id);
    }

    pub async fn remaining(&self) -> Vec<PostId> {
        self.state.lock().await.posts.iter().map(|p| p.id).collect()
    }

    pub async fn fetch_calls(&self) -> usize {
        self.state.lock().await.fetch_calls
    }

    /// Ids passed to `delete`, in call order
    pub async fn delete_calls(&self) -> Vec<PostId> {
        self.state.lock().await.delete_calls.clone()
    }
}

#[async_trait::async_trait]
impl TimelineSource for MemoryTimeline {
    async fn fetch_page(&self, count: u32, cursor: PageCursor) -> Result<Vec<Post>> {
        let mut state = self.state.lock().await;
        state.fetch_calls += 1;

        if state.fail_fetch_on_call == Some(state.fetch_calls) {
            return Err(Error::Api {
                action: "UserTimeline".to_string(),
                status: 503,
                body: "injected failure".to_string(),
            });
        }

        let call = state.fetch_calls;
        if let Some(pages) = state.scripted_pages.as_ref() {
            return Ok(pages.get(call - 1).cloned().unwrap_or_default());
        }

        Ok(state
            .posts
            .iter()
            .filter(|p| cursor.max_id().map_or(true, |max| p.id <= max))
            .take(count as usize)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl PostDeleter for MemoryTimeline {
    async fn delete(&self, id: PostId) -> Result<DeleteOutcome> {
        let mut state = self.state.lock().await;
        state.delete_calls.push(id);

        if state.fail_delete.contains(&id) {
            return Err(Error::Api {
                action: "Destroy".to_string(),
                status: 500,
                body: format!("injected failure for {}", id),
            });
        }

        let before = state.posts.len();
        state.posts.retain(|p| p.id != id);
        if state.posts.len() < before {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::AlreadyGone)
        }
    }
}

/// Hands out timelines keyed by consumer key; unknown keys are rejected
#[derive(Clone, Default)]
pub struct MemoryConnector {
    timelines: HashMap<String, MemoryTimeline>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeline(mut self, consumer_key: impl Into<String>, timeline: MemoryTimeline) -> Self {
        self.timelines.insert(consumer_key.into(), timeline);
        self
    }
}

#[async_trait::async_trait]
impl TimelineConnector for MemoryConnector {
    async fn connect(&self, credentials: Credentials) -> Result<Arc<dyn Timeline>> {
        match self.timelines.get(&credentials.consumer_key) {
            Some(timeline) => Ok(Arc::new(timeline.clone())),
            None => Err(Error::Credentials("Unknown consumer key".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: u64) -> Post {
        Post {
            id: PostId(id),
            created_at: "Wed Oct 10 20:19:24 +0000 2018".to_string(),
            author: "me".to_string(),
            text: String::new(),
            favorite_count: 0,
            share_count: 0,
            quote_count: 0,
            reply_count: 0,
            favorited: false,
            reshare_of: None,
        }
    }

    #[tokio::test]
    async fn test_pages_are_inclusive_of_cursor() {
        let timeline = MemoryTimeline::new((1..=5).map(post).collect());

        let first = timeline.fetch_page(2, PageCursor::Unbounded).await.unwrap();
        assert_eq!(first.iter().map(|p| p.id.0).collect::<Vec<_>>(), vec![5, 4]);

        let second = timeline
            .fetch_page(2, PageCursor::AtOrBelow(PostId(4)))
            .await
            .unwrap();
        assert_eq!(second.iter().map(|p| p.id.0).collect::<Vec<_>>(), vec![4, 3]);
    }

    #[tokio::test]
    async fn test_delete_twice_is_already_gone() {
        let timeline = MemoryTimeline::new(vec![post(1)]);
        assert_eq!(timeline.delete(PostId(1)).await.unwrap(), DeleteOutcome::Deleted);
        assert_eq!(timeline.delete(PostId(1)).await.unwrap(), DeleteOutcome::AlreadyGone);
        assert!(timeline.remaining().await.is_empty());
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let timeline = MemoryTimeline::new(vec![post(1), post(2)]);
        timeline.fail_fetch_on_call(2).await;
        timeline.fail_delete_of(PostId(2)).await;

        assert!(timeline.fetch_page(10, PageCursor::Unbounded).await.is_ok());
        assert!(timeline.fetch_page(10, PageCursor::Unbounded).await.is_err());
        assert!(timeline.delete(PostId(2)).await.is_err());
        assert_eq!(timeline.remaining().await, vec![PostId(2), PostId(1)]);
    }

    #[tokio::test]
    async fn test_scripted_pages_ignore_cursor() {
        let timeline = MemoryTimeline::scripted(vec![vec![post(9)], vec![post(9)]]);
        let cursor = PageCursor::AtOrBelow(PostId(1));
        assert_eq!(timeline.fetch_page(10, cursor).await.unwrap().len(), 1);
        assert_eq!(timeline.fetch_page(10, cursor).await.unwrap().len(), 1);
        assert!(timeline.fetch_page(10, cursor).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connector_rejects_unknown_key() {
        let connector = MemoryConnector::new()
            .with_timeline("consumer-key", MemoryTimeline::new(vec![post(1)]));
        let creds = crate::credentials::test_credentials();
        assert!(connector.connect(creds.clone()).await.is_ok());

        let mut other = creds;
        other.consumer_key = "nope".to_string();
        assert!(connector.connect(other).await.is_err());
    }
}

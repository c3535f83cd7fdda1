use crate::timeline::{PageCursor, Post, TimelineSource};
use crate::Result;

pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// One page at a time from a `TimelineSource`; no retries
pub struct BatchFetcher<'a, S: TimelineSource + ?Sized> {
    source: &'a S,
    page_size: u32,
}

impl<'a, S: TimelineSource + ?Sized> BatchFetcher<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, DEFAULT_PAGE_SIZE);
        self
    }

    /// Posts with id at or below `cursor`, as returned by the source
    pub async fn fetch(&self, cursor: PageCursor) -> Result<Vec<Post>> {
        let posts = self.source.fetch_page(self.page_size, cursor).await?;
        tracing::debug!("Fetched {} posts (max_id {})", posts.len(), cursor);
        Ok(posts)
    }
}

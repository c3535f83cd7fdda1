use std::sync::Arc;

use serde::Deserialize;

use super::clock::{Clock, SystemClock};
use super::executor::DeleteExecutor;
use super::fetcher::{BatchFetcher, DEFAULT_PAGE_SIZE};
use super::filter::FilterStage;
use super::result::RunResult;
use crate::retention::RetentionPolicy;
use crate::timeline::{min_id, PageCursor, Timeline};

/// Per-run knobs, as sent by the trigger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SweepOptions {
    /// Select but do not delete
    #[serde(default)]
    pub dry_run: bool,
    /// Cap on pages fetched; 0 means no cap
    #[serde(default)]
    pub max_iterations: u32,
}

/// Drives one retention run over a timeline
pub struct Sweeper {
    timeline: Arc<dyn Timeline>,
    policy: Arc<RetentionPolicy>,
    clock: Arc<dyn Clock>,
    page_size: u32,
}

impl Sweeper {
    pub fn new(timeline: Arc<dyn Timeline>, policy: Arc<RetentionPolicy>) -> Self {
        Self {
            timeline,
            policy,
            clock: Arc::new(SystemClock),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Walk the timeline from newest to oldest, deleting what the policy
    /// rejects. Never fails as a whole: the result carries the counters
    /// reached so far and the first error, if any.
    pub async fn run(&self, options: SweepOptions) -> RunResult {
        let fetcher = BatchFetcher::new(self.timeline.as_ref()).with_page_size(self.page_size);
        let filter = FilterStage::new(&self.policy);
        let executor = DeleteExecutor::new(self.timeline.as_ref());

        let mut result = RunResult::new(options.dry_run);
        let mut cursor = PageCursor::Unbounded;
        let mut iteration: u32 = 0;

        tracing::info!(
            "Starting sweep (dry_run={}, max_iterations={})",
            options.dry_run,
            options.max_iterations
        );

        loop {
            if options.max_iterations != 0 {
                if iteration == options.max_iterations {
                    tracing::info!("Reached max_iterations={}", options.max_iterations);
                    break;
                }
                iteration += 1;
            }

            let posts = match fetcher.fetch(cursor).await {
                Ok(posts) => posts,
                Err(e) => {
                    tracing::error!("Fetch failed (max_id {}): {}", cursor, e);
                    result.record_error(e);
                    break;
                }
            };

            let Some(next) = min_id(&posts) else {
                tracing::info!("No posts retrieved (max_id {})", cursor);
                break;
            };

            if !cursor.advances_to(next) {
                tracing::warn!("Cursor did not advance (max_id {}, page min {})", cursor, next);
                break;
            }

            cursor = PageCursor::AtOrBelow(next);
            result.num_collected += posts.len();
            tracing::info!("New cursor: max_id {}", cursor);

            let to_delete = match filter.filter(&posts, self.clock.now()) {
                Ok(to_delete) => to_delete,
                Err(e) => {
                    tracing::error!("Filtering failed: {}", e);
                    result.record_error(e);
                    break;
                }
            };

            let outcome = executor.execute(&to_delete, options.dry_run).await;
            result.num_deleted += outcome.deleted;
            if let Some(e) = outcome.error {
                result.record_error(e);
                break;
            }
        }

        tracing::info!(
            "Sweep finished: collected={}, deleted={}, error={:?}",
            result.num_collected,
            result.num_deleted,
            result.error
        );

        result
    }
}

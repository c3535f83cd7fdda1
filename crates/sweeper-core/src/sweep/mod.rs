//! The fetch → filter → delete loop
//!
//! `Sweeper` walks the timeline backwards one page at a time. Each page is
//! fully processed before the next is requested.

mod clock;
mod executor;
mod fetcher;
mod filter;
mod orchestrator;
mod result;

pub use clock::{Clock, FixedClock, SystemClock};
pub use executor::{DeleteExecutor, ExecuteOutcome};
pub use fetcher::{BatchFetcher, DEFAULT_PAGE_SIZE};
pub use filter::FilterStage;
pub use orchestrator::{SweepOptions, Sweeper};
pub use result::RunResult;

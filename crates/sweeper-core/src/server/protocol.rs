//! Wire shapes of the HTTP trigger
//!
//! The request body is `SweepOptions` as-is; both fields default when absent.

use serde::{Deserialize, Serialize};

use crate::sweep::RunResult;

pub use crate::sweep::SweepOptions as SweepRequest;

/// Body of a `200` reply. `error` is empty when the run finished cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepResponse {
    pub dry_run: bool,
    pub num_deleted: usize,
    pub num_collected: usize,
    pub error: String,
}

impl From<RunResult> for SweepResponse {
    fn from(result: RunResult) -> Self {
        Self {
            dry_run: result.dry_run,
            num_deleted: result.num_deleted,
            num_collected: result.num_collected,
            error: result.error.unwrap_or_default(),
        }
    }
}

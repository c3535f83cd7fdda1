use serde::{Deserialize, Serialize};

/// Counters for one run plus the error that stopped it, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub dry_run: bool,
    pub num_collected: usize,
    /// Includes would-be deletions in a dry run
    pub num_deleted: usize,
    /// First error of the run; later errors never replace it
    pub error: Option<String>,
}

impl RunResult {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Record an error unless one is already recorded
    pub fn record_error(&mut self, error: impl ToString) {
        if self.error.is_none() {
            self.error = Some(error.to_string());
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

use crate::timeline::{DeleteOutcome, Post, PostDeleter};
use crate::Error;

/// Result of deleting one batch
#[derive(Debug)]
pub struct ExecuteOutcome {
    /// Posts processed, including the one whose delete failed
    pub deleted: usize,
    /// First hard failure; the rest of the batch was left untouched
    pub error: Option<Error>,
}

/// Deletes posts one at a time, stopping at the first hard failure
pub struct DeleteExecutor<'a, D: PostDeleter + ?Sized> {
    deleter: &'a D,
}

impl<'a, D: PostDeleter + ?Sized> DeleteExecutor<'a, D> {
    pub fn new(deleter: &'a D) -> Self {
        Self { deleter }
    }

    pub async fn execute(&self, to_delete: &[Post], dry_run: bool) -> ExecuteOutcome {
        if dry_run {
            tracing::info!("Dry run: would delete {} posts", to_delete.len());
            return ExecuteOutcome {
                deleted: to_delete.len(),
                error: None,
            };
        }

        let mut deleted = 0;
        for post in to_delete {
            tracing::info!("Destroying id={}: {}", post.id, post.text);
            deleted += 1;

            match self.deleter.delete(post.id).await {
                Ok(DeleteOutcome::Deleted) => {}
                Ok(DeleteOutcome::AlreadyGone) => {
                    tracing::debug!("id={} was already gone", post.id);
                }
                Err(e) => {
                    tracing::error!("Error destroying id={}: {}", post.id, e);
                    return ExecuteOutcome {
                        deleted,
                        error: Some(e),
                    };
                }
            }
        }

        ExecuteOutcome { deleted, error: None }
    }
}

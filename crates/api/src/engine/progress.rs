use std::sync::Arc;

use programking_db::models::progress::UserProgress;
use programking_db::repositories::ProgressRepo;
use programking_db::KvStore;

use super::locks::UserLocks;
use crate::error::AppResult;

/// Records program completions, the input to reward eligibility.
pub struct ProgressTracker {
    store: Arc<dyn KvStore>,
    locks: Arc<UserLocks>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn KvStore>, locks: Arc<UserLocks>) -> Self {
        Self { store, locks }
    }

    pub async fn get(&self, user_id: &str) -> AppResult<UserProgress> {
        Ok(ProgressRepo::get_or_default(self.store.as_ref(), user_id).await?)
    }

    /// Add `program_id` to the user's completed set.
    ///
    /// Completing the same program again leaves the record untouched and
    /// skips the write.
    pub async fn record_completion(
        &self,
        user_id: &str,
        program_id: &str,
    ) -> AppResult<UserProgress> {
        let _guard = self.locks.lock(user_id).await;

        let mut progress = ProgressRepo::get_or_default(self.store.as_ref(), user_id).await?;
        if progress.record_completion(program_id) {
            ProgressRepo::save(self.store.as_ref(), user_id, &progress).await?;
            tracing::info!(
                user_id,
                program_id,
                completed_programs = progress.completed_programs,
                "Program completion recorded",
            );
        } else {
            tracing::debug!(user_id, program_id, "Program already completed");
        }

        Ok(progress)
    }
}

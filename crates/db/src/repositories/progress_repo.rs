//! Repository for `progress:{user_id}` records.

use crate::error::StoreError;
use crate::keys;
use crate::kv::{get_json, set_json, KvStore};
use crate::models::progress::UserProgress;

/// Provides data access for program completion progress.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Load a user's progress, or `None` if they have never completed a program.
    pub async fn find(
        store: &dyn KvStore,
        user_id: &str,
    ) -> Result<Option<UserProgress>, StoreError> {
        get_json(store, &keys::progress(user_id)).await
    }

    /// Load a user's progress, defaulting to zero completed programs.
    pub async fn get_or_default(
        store: &dyn KvStore,
        user_id: &str,
    ) -> Result<UserProgress, StoreError> {
        Ok(Self::find(store, user_id).await?.unwrap_or_default())
    }

    pub async fn save(
        store: &dyn KvStore,
        user_id: &str,
        progress: &UserProgress,
    ) -> Result<(), StoreError> {
        set_json(store, &keys::progress(user_id), progress).await
    }
}

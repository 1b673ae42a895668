//! Repository for `rewards:{user_id}` records.

use crate::error::StoreError;
use crate::keys;
use crate::kv::{get_json, set_json, KvStore};
use crate::models::reward::RewardState;

/// Provides data access for per-user reward claim state.
pub struct RewardRepo;

impl RewardRepo {
    /// Load a user's reward map. Users without claims get an empty map.
    pub async fn get_state(store: &dyn KvStore, user_id: &str) -> Result<RewardState, StoreError> {
        Ok(get_json(store, &keys::rewards(user_id))
            .await?
            .unwrap_or_default())
    }

    /// Overwrite a user's reward map.
    pub async fn save_state(
        store: &dyn KvStore,
        user_id: &str,
        state: &RewardState,
    ) -> Result<(), StoreError> {
        set_json(store, &keys::rewards(user_id), state).await
    }
}

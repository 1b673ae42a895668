//! Repository for `profile:{user_id}` records.

use crate::error::StoreError;
use crate::keys;
use crate::kv::{get_json, set_json, KvStore};
use crate::models::profile::UserProfile;

/// Provides data access for user profiles (last write wins).
pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find(store: &dyn KvStore, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        get_json(store, &keys::profile(user_id)).await
    }

    /// Replace the stored profile wholesale.
    pub async fn save(
        store: &dyn KvStore,
        user_id: &str,
        profile: &UserProfile,
    ) -> Result<(), StoreError> {
        set_json(store, &keys::profile(user_id), profile).await
    }
}

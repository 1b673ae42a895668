//! Repository for opaque `program:{program_id}` documents.

use serde_json::Value;

use crate::error::StoreError;
use crate::keys;
use crate::kv::KvStore;

/// Provides CRUD over program documents.
pub struct ProgramRepo;

impl ProgramRepo {
    /// All program documents, ordered by id.
    pub async fn list(store: &dyn KvStore) -> Result<Vec<Value>, StoreError> {
        Ok(store
            .scan_prefix(keys::PROGRAM_PREFIX)
            .await?
            .into_iter()
            .map(|(_, value)| value)
            .collect())
    }

    pub async fn find(store: &dyn KvStore, program_id: &str) -> Result<Option<Value>, StoreError> {
        store.get(&keys::program(program_id)).await
    }

    /// Insert or replace a program document.
    pub async fn save(
        store: &dyn KvStore,
        program_id: &str,
        document: Value,
    ) -> Result<(), StoreError> {
        store.set(&keys::program(program_id), document).await
    }

    /// Delete a program. Returns `false` if it did not exist.
    pub async fn delete(store: &dyn KvStore, program_id: &str) -> Result<bool, StoreError> {
        let key = keys::program(program_id);
        if store.get(&key).await?.is_none() {
            return Ok(false);
        }
        store.delete(&key).await?;
        Ok(true)
    }
}

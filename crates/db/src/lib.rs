//! Persistence for ProgramKing.
//!
//! Every record lives as a JSON value under a string key in a key-value
//! store ([`KvStore`]). Production uses a single Postgres table
//! ([`PgKvStore`]); tests and local runs can use [`MemoryKvStore`].
//! Typed access goes through the repositories in [`repositories`].

pub mod error;
pub mod keys;
pub mod kv;
pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

pub use error::StoreError;
pub use kv::memory::MemoryKvStore;
pub use kv::postgres::PgKvStore;
pub use kv::KvStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Apply the embedded migrations (creates the `kv_store` table).
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

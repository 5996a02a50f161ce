//! Durable job storage.
//!
//! Two implementations share the `JobStore` trait:
//! - `PgJobStore`, used when `DATABASE_URL` is set, backed by Postgres via `sqlx`
//! - `InMemoryJobStore`, the fallback when no database is configured
//!
//! ## Modules
//! - `job_store` - the `JobStore` trait
//! - `memory` - `InMemoryJobStore`
//! - `pg` - `PgJobStore`
//! - `error` - store error types

pub mod error;
pub mod job_store;
pub mod memory;
pub mod pg;

pub use error::{StoreError, StoreResult};
pub use job_store::JobStore;
pub use memory::InMemoryJobStore;
pub use pg::PgJobStore;

use std::sync::Arc;

/// Construct the job store the process should use: `PgJobStore` when
/// `DATABASE_URL` is set, `InMemoryJobStore` otherwise.
pub async fn from_env() -> StoreResult<Arc<dyn JobStore>> {
    match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => {
            let store = PgJobStore::connect(&url).await?;
            Ok(Arc::new(store))
        }
        _ => Ok(Arc::new(InMemoryJobStore::new())),
    }
}

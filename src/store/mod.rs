//! Persistence layer
//!
//! The registry and checker depend only on the `UrlRepository` trait.
//! `SqliteStore` is the production implementation.

mod schema;
mod sqlite;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::model::{PageMetadata, Url, UrlCheck};

pub use sqlite::SqliteStore;

/// Storage operations for urls and their checks
pub trait UrlRepository: Send + Sync {
    /// Insert a new url. Fails with `StoreError::Duplicate` if the name is taken.
    fn create_url(&self, name: &str, created_at: DateTime<Utc>) -> Result<Url, StoreError>;

    fn find_url(&self, id: i64) -> Result<Option<Url>, StoreError>;

    /// First url (lowest id) whose name ends with `suffix`
    fn find_url_by_name_suffix(&self, suffix: &str) -> Result<Option<Url>, StoreError>;

    /// Urls ordered by ascending id
    fn list_urls(&self, offset: u64, limit: u64) -> Result<Vec<Url>, StoreError>;

    fn count_urls(&self) -> Result<u64, StoreError>;

    fn create_check(
        &self,
        url_id: i64,
        metadata: &PageMetadata,
        created_at: DateTime<Utc>,
    ) -> Result<UrlCheck, StoreError>;

    /// Checks of one url, newest first
    fn find_checks(&self, url_id: i64) -> Result<Vec<UrlCheck>, StoreError>;

    /// Most recent check of each given url; urls without checks are absent
    fn latest_checks(&self, url_ids: &[i64]) -> Result<HashMap<i64, UrlCheck>, StoreError>;
}

/// Run synchronous store work on tokio's blocking pool so that SQLite calls
/// never stall the async worker threads
pub async fn run_blocking<T, E, F>(work: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| E::from(StoreError::Join(e)))?
}

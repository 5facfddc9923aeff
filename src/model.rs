//! Domain records persisted by the store

use chrono::{DateTime, Utc};

/// A registered site, identified by its canonical `scheme://host[:port]` name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// One recorded fetch-and-parse result for a `Url`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCheck {
    pub id: i64,
    pub url_id: i64,
    pub status_code: u16,
    pub title: String,
    pub h1: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Metadata extracted from a fetched page, before it is stored
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub status_code: u16,
    pub title: String,
    pub h1: String,
    pub description: String,
}

/// A url with its full check history, newest check first
#[derive(Debug, Clone)]
pub struct UrlDetails {
    pub url: Url,
    pub checks: Vec<UrlCheck>,
}

/// A url with its most recent check, as shown in the listing
#[derive(Debug, Clone)]
pub struct UrlSummary {
    pub url: Url,
    pub last_check: Option<UrlCheck>,
}

/// One page of a paginated listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub entries: Vec<T>,
    pub total_pages: u64,
    pub current_page: u64,
}

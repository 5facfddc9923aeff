// SQLite-backed repository
// One connection guarded by a mutex; every operation is a single statement

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row};

use super::schema;
use super::UrlRepository;
use crate::error::StoreError;
use crate::model::{PageMetadata, Url, UrlCheck};

const CHECK_COLUMNS: &str = "id, url_id, status_code, title, h1, description, created_at";

/// SQLite implementation of `UrlRepository`
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`. `:memory:` opens a private in-memory database.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Connection::open(path)?
        };
        conn.execute_batch(schema::PRAGMAS_SQL)?;
        conn.execute_batch(schema::SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store for tests
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn url_from_row(row: &Row<'_>) -> rusqlite::Result<Url> {
    Ok(Url {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

fn check_from_row(row: &Row<'_>) -> rusqlite::Result<UrlCheck> {
    Ok(UrlCheck {
        id: row.get(0)?,
        url_id: row.get(1)?,
        status_code: row.get(2)?,
        title: row.get(3)?,
        h1: row.get(4)?,
        description: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl UrlRepository for SqliteStore {
    fn create_url(&self, name: &str, created_at: DateTime<Utc>) -> Result<Url, StoreError> {
        let conn = self.lock()?;
        match conn.execute(
            "INSERT INTO urls (name, created_at) VALUES (?1, ?2)",
            params![name, created_at],
        ) {
            Ok(_) => Ok(Url {
                id: conn.last_insert_rowid(),
                name: name.to_string(),
                created_at,
            }),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Duplicate(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    fn find_url(&self, id: i64) -> Result<Option<Url>, StoreError> {
        let conn = self.lock()?;
        let url = conn
            .query_row(
                "SELECT id, name, created_at FROM urls WHERE id = ?1",
                params![id],
                url_from_row,
            )
            .optional()?;
        Ok(url)
    }

    fn find_url_by_name_suffix(&self, suffix: &str) -> Result<Option<Url>, StoreError> {
        // substr() instead of LIKE: no wildcard escaping, case-sensitive
        let conn = self.lock()?;
        let url = conn
            .query_row(
                "SELECT id, name, created_at FROM urls
                 WHERE length(name) >= length(?1) AND substr(name, -length(?1)) = ?1
                 ORDER BY id ASC LIMIT 1",
                params![suffix],
                url_from_row,
            )
            .optional()?;
        Ok(url)
    }

    fn list_urls(&self, offset: u64, limit: u64) -> Result<Vec<Url>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at FROM urls ORDER BY id ASC LIMIT ?1 OFFSET ?2",
        )?;
        let urls = stmt
            .query_map(params![to_sql_int(limit), to_sql_int(offset)], url_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(urls)
    }

    fn count_urls(&self) -> Result<u64, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM urls", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn create_check(
        &self,
        url_id: i64,
        metadata: &PageMetadata,
        created_at: DateTime<Utc>,
    ) -> Result<UrlCheck, StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO url_checks (url_id, status_code, title, h1, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                url_id,
                metadata.status_code,
                metadata.title,
                metadata.h1,
                metadata.description,
                created_at
            ],
        )?;
        Ok(UrlCheck {
            id: conn.last_insert_rowid(),
            url_id,
            status_code: metadata.status_code,
            title: metadata.title.clone(),
            h1: metadata.h1.clone(),
            description: metadata.description.clone(),
            created_at,
        })
    }

    fn find_checks(&self, url_id: i64) -> Result<Vec<UrlCheck>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CHECK_COLUMNS} FROM url_checks WHERE url_id = ?1 ORDER BY id DESC"
        ))?;
        let checks = stmt
            .query_map(params![url_id], check_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(checks)
    }

    fn latest_checks(&self, url_ids: &[i64]) -> Result<HashMap<i64, UrlCheck>, StoreError> {
        if url_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; url_ids.len()].join(", ");
        let sql = format!(
            "SELECT {CHECK_COLUMNS} FROM url_checks WHERE id IN (
                 SELECT MAX(id) FROM url_checks WHERE url_id IN ({placeholders}) GROUP BY url_id
             )"
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let checks = stmt
            .query_map(params_from_iter(url_ids.iter()), check_from_row)?
            .map(|r| r.map(|check| (check.url_id, check)))
            .collect::<rusqlite::Result<HashMap<_, _>>>()?;
        Ok(checks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(status_code: u16, title: &str) -> PageMetadata {
        PageMetadata {
            status_code,
            title: title.to_string(),
            h1: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_create_and_find_url() {
        let store = SqliteStore::in_memory().unwrap();
        let now = Utc::now();
        let url = store.create_url("https://example.com", now).unwrap();

        let found = store.find_url(url.id).unwrap().unwrap();
        assert_eq!(found.name, "https://example.com");
        assert_eq!(found.created_at, now);
        assert!(store.find_url(url.id + 1).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let store = SqliteStore::in_memory().unwrap();
        store.create_url("https://example.com", Utc::now()).unwrap();

        let err = store
            .create_url("https://example.com", Utc::now())
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.count_urls().unwrap(), 1);
    }

    #[test]
    fn test_find_by_name_suffix() {
        let store = SqliteStore::in_memory().unwrap();
        store.create_url("https://github.com:8081", Utc::now()).unwrap();
        store.create_url("http://hexlet.io", Utc::now()).unwrap();

        let found = store.find_url_by_name_suffix("://hexlet.io").unwrap();
        assert_eq!(found.unwrap().name, "http://hexlet.io");

        assert!(store.find_url_by_name_suffix("://github.com").unwrap().is_none());
        assert!(store
            .find_url_by_name_suffix("://github.com:8081")
            .unwrap()
            .is_some());
        // Longer than any stored name
        assert!(store
            .find_url_by_name_suffix("https://www.hexlet.io.example")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_suffix_is_literal() {
        let store = SqliteStore::in_memory().unwrap();
        store.create_url("https://a_b.com", Utc::now()).unwrap();

        assert!(store.find_url_by_name_suffix("://a%b.com").unwrap().is_none());
        assert!(store.find_url_by_name_suffix("://AXB.com").unwrap().is_none());
    }

    #[test]
    fn test_list_urls_ordered_by_id() {
        let store = SqliteStore::in_memory().unwrap();
        for i in 0..5 {
            store
                .create_url(&format!("https://site{i}.com"), Utc::now())
                .unwrap();
        }

        let page = store.list_urls(2, 2).unwrap();
        let names: Vec<_> = page.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["https://site2.com", "https://site3.com"]);
        assert!(page[0].id < page[1].id);
        assert_eq!(store.count_urls().unwrap(), 5);
        assert!(store.list_urls(10, 2).unwrap().is_empty());
    }

    #[test]
    fn test_checks_newest_first() {
        let store = SqliteStore::in_memory().unwrap();
        let url = store.create_url("https://example.com", Utc::now()).unwrap();

        store.create_check(url.id, &metadata(200, "first"), Utc::now()).unwrap();
        store.create_check(url.id, &metadata(500, "second"), Utc::now()).unwrap();

        let checks = store.find_checks(url.id).unwrap();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].title, "second");
        assert_eq!(checks[0].status_code, 500);
        assert_eq!(checks[1].title, "first");
    }

    #[test]
    fn test_check_requires_existing_url() {
        let store = SqliteStore::in_memory().unwrap();
        let result = store.create_check(42, &metadata(200, "orphan"), Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn test_latest_checks() {
        let store = SqliteStore::in_memory().unwrap();
        let a = store.create_url("https://a.com", Utc::now()).unwrap();
        let b = store.create_url("https://b.com", Utc::now()).unwrap();
        let c = store.create_url("https://c.com", Utc::now()).unwrap();

        store.create_check(a.id, &metadata(200, "a1"), Utc::now()).unwrap();
        store.create_check(a.id, &metadata(404, "a2"), Utc::now()).unwrap();
        store.create_check(b.id, &metadata(301, "b1"), Utc::now()).unwrap();

        let latest = store.latest_checks(&[a.id, b.id, c.id]).unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[&a.id].title, "a2");
        assert_eq!(latest[&b.id].status_code, 301);
        assert!(!latest.contains_key(&c.id));

        assert!(store.latest_checks(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_checks_cascade_with_url() {
        let store = SqliteStore::in_memory().unwrap();
        let url = store.create_url("https://example.com", Utc::now()).unwrap();
        store.create_check(url.id, &metadata(200, "t"), Utc::now()).unwrap();

        store
            .lock()
            .unwrap()
            .execute("DELETE FROM urls WHERE id = ?1", params![url.id])
            .unwrap();

        assert!(store.find_checks(url.id).unwrap().is_empty());
    }
}

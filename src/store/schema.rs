// SQLite schema, applied idempotently on open

pub const PRAGMAS_SQL: &str = "PRAGMA foreign_keys = ON;";

pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS urls (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS url_checks (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    url_id       INTEGER NOT NULL REFERENCES urls(id) ON DELETE CASCADE,
    status_code  INTEGER NOT NULL,
    title        TEXT NOT NULL,
    h1           TEXT NOT NULL,
    description  TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_url_checks_url_id ON url_checks(url_id, id);
";

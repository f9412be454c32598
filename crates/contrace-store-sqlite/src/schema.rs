//! SQL schema for the contrace SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS people (
    person_id   TEXT PRIMARY KEY,   -- 'P…'
    name        TEXT NOT NULL,
    phone       TEXT,
    email       TEXT,
    address     TEXT,
    quarantined TEXT NOT NULL DEFAULT '{\"kind\":\"no\"}',  -- JSON-encoded Flag
    infected    TEXT NOT NULL DEFAULT '{\"kind\":\"no\"}'   -- JSON-encoded Flag
);

CREATE TABLE IF NOT EXISTS places (
    place_id TEXT PRIMARY KEY,      -- 'L…'
    name     TEXT NOT NULL,
    address  TEXT
);

-- A visit is identified by its whole (person, place, date) triple.
-- Removing a person or place removes their visits with them.
CREATE TABLE IF NOT EXISTS visits (
    person_id  TEXT NOT NULL REFERENCES people(person_id) ON DELETE CASCADE,
    place_id   TEXT NOT NULL REFERENCES places(place_id)  ON DELETE CASCADE,
    visit_date TEXT NOT NULL,       -- YYYY-MM-DD
    PRIMARY KEY (person_id, place_id, visit_date)
);

CREATE INDEX IF NOT EXISTS visits_place_date_idx ON visits(place_id, visit_date);
CREATE INDEX IF NOT EXISTS visits_date_idx       ON visits(visit_date);

PRAGMA user_version = 1;
";

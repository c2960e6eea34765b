//! SQL schema for the Rollcall SQLite store.
//!
//! Executed once when a store is opened. There are no migrations; the
//! `user_version` pragma records the layout for whoever adds the first one.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps store-assigned ids monotonic and never reused, even
-- after an explicit id larger than any assigned so far.
CREATE TABLE IF NOT EXISTS person (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL CHECK (length(trim(name)) > 0),
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC, millisecond precision
    last_login  TEXT,            -- NULL until the first login
    last_logout TEXT             -- NULL while online or before first logout
);

CREATE INDEX IF NOT EXISTS person_online_idx
    ON person(id)
    WHERE last_login IS NOT NULL AND last_logout IS NULL;

PRAGMA user_version = 1;
";

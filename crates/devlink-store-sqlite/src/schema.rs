//! SQL schema for the devlink SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS identities (
    identity_id   TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    avatar        TEXT NOT NULL,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL    -- ISO 8601 UTC
);

-- Profiles and posts are whole JSON documents. `version` is the
-- compare-and-swap stamp checked by every replace.
CREATE TABLE IF NOT EXISTS profiles (
    profile_id  TEXT PRIMARY KEY,
    identity_id TEXT NOT NULL UNIQUE REFERENCES identities(identity_id),
    version     INTEGER NOT NULL DEFAULT 0,
    body        TEXT NOT NULL
);

-- No foreign key on identity_id: posts outlive their author.
CREATE TABLE IF NOT EXISTS posts (
    post_id     TEXT PRIMARY KEY,
    identity_id TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    version     INTEGER NOT NULL DEFAULT 0,
    body        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS posts_created_idx ON posts(created_at);

PRAGMA user_version = 1;
";

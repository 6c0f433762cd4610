//! SQL schema for the devconnect SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision for future migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    avatar      TEXT,
    created_at  TEXT NOT NULL
);

-- One profile per user.
CREATE TABLE IF NOT EXISTS profiles (
    profile_id      TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL UNIQUE REFERENCES users(user_id) ON DELETE CASCADE,
    company         TEXT,
    website         TEXT,
    location        TEXT,
    bio             TEXT,
    status          TEXT NOT NULL,
    githubusername  TEXT,
    skills          TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    youtube         TEXT,
    twitter         TEXT,
    facebook        TEXT,
    linkedin        TEXT,
    instagram       TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

-- Rows are listed by descending seq, so the newest entry comes first.
CREATE TABLE IF NOT EXISTS experiences (
    experience_id  TEXT PRIMARY KEY,
    profile_id     TEXT NOT NULL REFERENCES profiles(profile_id) ON DELETE CASCADE,
    seq            INTEGER NOT NULL,
    title          TEXT NOT NULL,
    company        TEXT NOT NULL,
    location       TEXT,
    from_date      TEXT NOT NULL,   -- YYYY-MM-DD
    to_date        TEXT,
    current        INTEGER NOT NULL DEFAULT 0,
    description    TEXT,
    UNIQUE (profile_id, seq)
);

CREATE INDEX IF NOT EXISTS experiences_profile_idx ON experiences(profile_id);

PRAGMA user_version = 1;
";

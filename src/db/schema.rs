//! SQL DDL for initializing the application store.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `user.id` as the external subject id or a locally generated UUID
/// - `user.email` UNIQUE (natural lookup key for the credential form)
/// - `user.password` NULL for externally-authenticated accounts
/// - `meme.date_of_creation` stored as RFC3339 text
/// - `"like"` deduplicated per (user, meme) pair
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS user (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    profile_pic TEXT NOT NULL,
    password TEXT NULL
);

CREATE TABLE IF NOT EXISTS meme (
    meme_id INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL REFERENCES user(id),
    url TEXT NOT NULL,
    date_of_creation TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_meme_owner ON meme(id);

CREATE TABLE IF NOT EXISTS "like" (
    id TEXT NOT NULL REFERENCES user(id),
    meme_id INTEGER NOT NULL REFERENCES meme(meme_id),
    UNIQUE(id, meme_id)
);
"#;

//! SQL DDL for the credential and profile tables.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `login`: one row per account, `email` UNIQUE, bcrypt `hash`
/// - `users`: profile rows keyed by `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `users.email` UNIQUE and REFERENCES `login(email)`
/// - `entries` INTEGER NOT NULL DEFAULT 0, guarded non-negative
/// - `joined` TEXT (RFC3339, written by sqlx's chrono codec)
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS login (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hash TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE REFERENCES login(email),
    entries INTEGER NOT NULL DEFAULT 0 CHECK (entries >= 0),
    joined TEXT NOT NULL
);
"#;

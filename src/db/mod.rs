//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: `UserStore`, the only owner of the connection pool

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{Credential, Profile};
pub use sqlite::{SqlitePool, UserStore};

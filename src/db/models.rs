use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of `users`: the public face of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub entries: i64,
    pub joined: DateTime<Utc>,
}

/// A row of `login`. Never serialized back to clients.
#[derive(Debug, Clone, FromRow)]
pub struct Credential {
    pub email: String,
    pub hash: String,
}

use crate::db::models::{Credential, Profile};
use crate::db::schema::SQLITE_INIT;
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

pub type SqlitePool = Pool<Sqlite>;

const PROFILE_COLUMNS: &str = "id, name, email, entries, joined";

/// Credential and profile storage over one connection pool.
///
/// Built once at startup and cloned into request handlers; `close` drains the
/// pool on shutdown.
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database at `database_url`, creating the file if needed, and
    /// apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self, ApiError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        info!(database_url, "user store ready");
        Ok(store)
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), ApiError> {
        // sqlx::query runs a single statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn find_credential(&self, email: &str) -> Result<Option<Credential>, ApiError> {
        let row = sqlx::query_as::<_, Credential>("SELECT email, hash FROM login WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, ApiError> {
        let row = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_profile(&self, id: i64) -> Result<Profile, ApiError> {
        sqlx::query_as::<_, Profile>(&format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ApiError::NotFound("profile"))
    }

    /// Insert the credential row and then the profile row in one transaction.
    ///
    /// Any failure drops the transaction uncommitted, so a credential never
    /// outlives a failed profile insert.
    pub async fn create_account(
        &self,
        name: &str,
        email: &str,
        hash: &str,
        joined: DateTime<Utc>,
    ) -> Result<Profile, ApiError> {
        let mut tx = self.pool.begin().await.map_err(registration_error)?;

        let login_email: String =
            sqlx::query_scalar("INSERT INTO login (hash, email) VALUES (?, ?) RETURNING email")
                .bind(hash)
                .bind(email)
                .fetch_one(&mut *tx)
                .await
                .map_err(registration_error)?;

        let profile = sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO users (name, email, joined) VALUES (?, ?, ?) RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(name)
        .bind(&login_email)
        .bind(joined)
        .fetch_one(&mut *tx)
        .await
        .map_err(registration_error)?;

        tx.commit().await.map_err(registration_error)?;
        debug!(id = profile.id, "account created");
        Ok(profile)
    }

    /// Add one to `entries` in a single statement and return the new value.
    pub async fn increment_entries(&self, id: i64) -> Result<i64, ApiError> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE users SET entries = entries + 1 WHERE id = ? RETURNING entries",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound("profile"))
    }

    /// Number of profile rows. Used by tests to check that failed
    /// registrations leave nothing behind.
    pub async fn count_profiles(&self) -> Result<i64, ApiError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn registration_error(e: sqlx::Error) -> ApiError {
    let duplicate = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if duplicate {
        ApiError::Registration("email already registered".to_string())
    } else {
        ApiError::Registration(e.to_string())
    }
}

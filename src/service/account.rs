use crate::db::{Profile, UserStore};
use crate::error::ApiError;
use crate::types::account::{RegisterRequest, SignInRequest};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Sign-in, registration and profile access on top of `UserStore`.
#[derive(Clone)]
pub struct AccountService {
    store: UserStore,
    cost: u32,
    // verified against when an email is unknown, so both failures cost a bcrypt round
    dummy_hash: Arc<str>,
}

impl AccountService {
    /// `cost` is the bcrypt work factor used for new hashes.
    pub fn new(store: UserStore, cost: u32) -> Result<Self, ApiError> {
        let dummy_hash = bcrypt::hash("smart-brain-absent-account", cost)?;
        Ok(Self {
            store,
            cost,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    pub async fn sign_in(&self, req: &SignInRequest) -> Result<Profile, ApiError> {
        let (email, password) = req.validate()?;

        let credential = self.store.find_credential(email).await?;
        let hash = match &credential {
            Some(c) => c.hash.clone(),
            None => self.dummy_hash.to_string(),
        };
        let valid = verify_password(password.to_owned(), hash).await?;
        if credential.is_none() || !valid {
            debug!(email, "sign-in rejected");
            return Err(ApiError::Auth);
        }

        self.store
            .find_profile_by_email(email)
            .await?
            .ok_or(ApiError::NotFound("user"))
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<Profile, ApiError> {
        let (name, email, password) = req.validate()?;

        let hash = hash_password(password.to_owned(), self.cost).await?;
        let profile = self
            .store
            .create_account(name, email, &hash, Utc::now())
            .await?;
        info!(id = profile.id, "registered new account");
        Ok(profile)
    }

    pub async fn profile(&self, id: i64) -> Result<Profile, ApiError> {
        self.store.get_profile(id).await
    }

    pub async fn increment_entries(&self, id: i64) -> Result<i64, ApiError> {
        self.store.increment_entries(id).await
    }
}

async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqlitePool;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    async fn service() -> AccountService {
        service_with_pool().await.0
    }

    async fn service_with_pool() -> (AccountService, SqlitePool) {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .unwrap();
        let store = UserStore::new(pool.clone());
        store.init_schema().await.unwrap();
        (AccountService::new(store, 4).unwrap(), pool)
    }

    fn register_req(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn sign_in_req(email: &str, password: &str) -> SignInRequest {
        SignInRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn register_then_sign_in() {
        let svc = service().await;
        let created = svc
            .register(&register_req("Alice", "alice@x.com", "pw123"))
            .await
            .unwrap();
        assert_eq!(created.entries, 0);

        let signed_in = svc.sign_in(&sign_in_req("alice@x.com", "pw123")).await.unwrap();
        assert_eq!(signed_in, created);
    }

    #[tokio::test]
    async fn stored_hash_is_not_the_password() {
        let svc = service().await;
        svc.register(&register_req("Alice", "alice@x.com", "pw123"))
            .await
            .unwrap();
        let cred = svc
            .store()
            .find_credential("alice@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(cred.hash, "pw123");
        assert!(cred.hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_alike() {
        let svc = service().await;
        svc.register(&register_req("Alice", "alice@x.com", "pw123"))
            .await
            .unwrap();

        let wrong = svc
            .sign_in(&sign_in_req("alice@x.com", "nope"))
            .await
            .unwrap_err();
        let unknown = svc
            .sign_in(&sign_in_req("bob@x.com", "pw123"))
            .await
            .unwrap_err();
        assert!(matches!(wrong, ApiError::Auth));
        assert!(matches!(unknown, ApiError::Auth));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn missing_fields_fail_before_touching_the_store() {
        let svc = service().await;
        let err = svc
            .register(&RegisterRequest {
                name: None,
                email: Some("a@x.com".into()),
                password: Some("pw".into()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation));
        assert_eq!(svc.store().count_profiles().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn credential_without_profile_is_not_found() {
        let (svc, pool) = service_with_pool().await;
        let hash = bcrypt::hash("pw123", 4).unwrap();
        sqlx::query("INSERT INTO login (hash, email) VALUES (?, ?)")
            .bind(&hash)
            .bind("ghost@x.com")
            .execute(&pool)
            .await
            .unwrap();

        let err = svc
            .sign_in(&sign_in_req("ghost@x.com", "pw123"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound("user")));

        // a wrong password still reads as bad credentials
        let err = svc
            .sign_in(&sign_in_req("ghost@x.com", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Auth));
    }
}

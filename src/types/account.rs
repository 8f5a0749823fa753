use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// Body of `POST /signin`.
#[derive(Debug, Default, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of `POST /register`.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of `PUT /image`. Clients send the id either as a number or a string.
#[derive(Debug, Default, Deserialize)]
pub struct EntryRequest {
    #[serde(default)]
    pub id: Option<Value>,
}

/// Body of `POST /imageurl`.
#[derive(Debug, Default, Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub input: Option<Value>,
}

/// Treat missing and empty strings alike.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl SignInRequest {
    /// Returns `(email, password)`.
    pub fn validate(&self) -> Result<(&str, &str), ApiError> {
        match (present(&self.email), present(&self.password)) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(ApiError::Validation),
        }
    }
}

impl RegisterRequest {
    /// Returns `(name, email, password)`.
    pub fn validate(&self) -> Result<(&str, &str, &str), ApiError> {
        match (
            present(&self.name),
            present(&self.email),
            present(&self.password),
        ) {
            (Some(name), Some(email), Some(password)) => Ok((name, email, password)),
            _ => Err(ApiError::Validation),
        }
    }
}

/// Parse a profile id from a path segment.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

impl EntryRequest {
    pub fn id(&self) -> Option<i64> {
        match self.id.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => parse_id(s),
            _ => None,
        }
    }
}

use axum::{Json, http::StatusCode, response::IntoResponse};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::{error, warn};

#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error("missing required field")]
    Validation,

    #[error("credentials did not match")]
    Auth,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("registration failed: {0}")]
    Registration(String),

    #[error("face detection service error: {0}")]
    ExternalService(String),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// The string a client sees when a handler does not override it.
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::Validation => "incorrect form submission",
            ApiError::Auth => "wrong credentials",
            ApiError::NotFound(_) => "Not found",
            ApiError::Registration(_) => "unable to register",
            ApiError::ExternalService(_) | ApiError::Reqwest(_) => "unable to work with API",
            ApiError::Database(_) | ApiError::PasswordHash(_) | ApiError::Join(_) => {
                "internal error"
            }
        }
    }

    fn is_client_error(&self) -> bool {
        matches!(
            self,
            ApiError::Validation | ApiError::Auth | ApiError::NotFound(_)
        )
    }
}

/// An error paired with the message the endpoint reports for it.
///
/// Every failure is answered with `400` and a bare JSON string body, which is
/// the contract existing front ends parse.
#[derive(Debug)]
pub struct ErrorReply {
    pub error: ApiError,
    pub message: &'static str,
}

impl ErrorReply {
    pub fn new(error: ApiError, message: &'static str) -> Self {
        Self { error, message }
    }
}

impl From<ApiError> for ErrorReply {
    fn from(error: ApiError) -> Self {
        let message = error.public_message();
        Self { error, message }
    }
}

/// Attach an endpoint-specific failure message to a fallible result.
pub trait ReplyAs<T> {
    fn reply_as(self, message: &'static str) -> Result<T, ErrorReply>;
}

impl<T> ReplyAs<T> for Result<T, ApiError> {
    fn reply_as(self, message: &'static str) -> Result<T, ErrorReply> {
        self.map_err(|e| ErrorReply::new(e, message))
    }
}

impl IntoResponse for ErrorReply {
    fn into_response(self) -> axum::response::Response {
        if self.error.is_client_error() {
            warn!(error = %self.error, reply = self.message, "request rejected");
        } else {
            error!(error = %self.error, reply = self.message, "request failed");
        }
        (StatusCode::BAD_REQUEST, Json(self.message)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        ErrorReply::from(self).into_response()
    }
}

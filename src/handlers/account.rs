use axum::{
    Json,
    extract::{Path, State},
};

use crate::db::Profile;
use crate::error::{ApiError, ErrorReply, ReplyAs};
use crate::middleware::JsonBody;
use crate::router::AppState;
use crate::types::account::{RegisterRequest, SignInRequest, parse_id};

/// POST /signin -> profile of the account whose credentials match.
pub async fn sign_in_handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SignInRequest>,
) -> Result<Json<Profile>, ErrorReply> {
    let profile = state.accounts.sign_in(&body).await.map_err(|e| {
        let message = match &e {
            ApiError::Validation => "incorrect form submission",
            ApiError::NotFound(_) => "unable to get user",
            // store failures look the same as a bad password from the outside
            _ => "wrong credentials",
        };
        ErrorReply::new(e, message)
    })?;
    Ok(Json(profile))
}

/// POST /register -> the freshly created profile.
pub async fn register_handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<Json<Profile>, ErrorReply> {
    let profile = state.accounts.register(&body).await.map_err(|e| {
        let message = match &e {
            ApiError::Validation => "incorrect form submission",
            _ => "unable to register",
        };
        ErrorReply::new(e, message)
    })?;
    Ok(Json(profile))
}

/// GET /profile/{id}
pub async fn profile_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Profile>, ErrorReply> {
    let id = parse_id(&id).ok_or(ApiError::NotFound("profile"))?;
    let profile = state.accounts.profile(id).await.reply_as("Not found")?;
    Ok(Json(profile))
}

use axum::{Json, extract::State};
use serde_json::Value;

use crate::error::{ApiError, ErrorReply, ReplyAs};
use crate::middleware::JsonBody;
use crate::router::AppState;
use crate::types::account::{DetectRequest, EntryRequest};

/// PUT /image -> the profile's new entry count.
pub async fn entries_handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<EntryRequest>,
) -> Result<Json<i64>, ErrorReply> {
    let entries = match body.id() {
        Some(id) => state.accounts.increment_entries(id).await,
        None => Err(ApiError::NotFound("profile")),
    }
    .reply_as("unable to get entries")?;
    Ok(Json(entries))
}

/// POST /imageurl -> Clarifai's face-detection output, verbatim.
pub async fn detect_handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<DetectRequest>,
) -> Result<Json<Value>, ErrorReply> {
    let input = body.input.unwrap_or(Value::Null);
    let result = state
        .detector
        .predict(&input)
        .await
        .reply_as("unable to work with API")?;
    Ok(Json(result))
}

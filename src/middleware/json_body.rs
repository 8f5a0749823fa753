use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// JSON body extractor that never rejects.
///
/// A missing content type, malformed JSON or a body of the wrong shape all
/// yield `T::default()`, so the handler's own field validation decides which
/// failure the client sees.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = std::convert::Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => Ok(JsonBody(body)),
            Err(rejection) => {
                debug!(reason = %rejection.body_text(), "unreadable JSON body; using empty form");
                Ok(JsonBody(T::default()))
            }
        }
    }
}

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;

use crate::api::clarifai_api::ClarifaiApi;
use crate::handlers::{
    account::{profile_handler, register_handler, sign_in_handler},
    image::{detect_handler, entries_handler},
    root_handler,
};
use crate::service::account::AccountService;

/// Shared handler state. Cheap to clone: every field is a handle.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub detector: ClarifaiApi,
}

impl AppState {
    pub fn new(accounts: AccountService, detector: ClarifaiApi) -> Self {
        Self { accounts, detector }
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/imageurl", post(detect_handler))
        .route("/signin", post(sign_in_handler))
        .route("/register", post(register_handler))
        .route("/profile/{id}", get(profile_handler))
        .route("/image", put(entries_handler))
        // the browser front end is served from another origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

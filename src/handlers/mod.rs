pub mod account;
pub mod image;

/// GET / -> liveness text.
pub async fn root_handler() -> &'static str {
    "it is working"
}

use crate::{AppState, handlers::auth::sign_in};
use axum::{
    Router,
    routing::{get, post},
};

/// GET /health
///
/// Unauthenticated liveness probe for load balancers. Mounted outside `/v1`.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(|| async { "ok" }))
}

/// POST /signin
///
/// Exchanges credentials for a bearer token. On the public allow-list.
pub fn signin_routes() -> Router<AppState> {
    Router::new().route("/signin", post(sign_in))
}

use axum::{Router, routing::get};

use crate::state::AppState;

pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
pub fn routes(state: &AppState) -> Router {
    Router::new().nest(
        "/users",
        domain_similarity::handlers::router(state.service.clone()),
    )
}

/// Creates a router with the /ready endpoint that checks both upstreams.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

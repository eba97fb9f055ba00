//! Readiness check against the vector store and the embedding service.

use crate::state::AppState;
use axum::{extract::State, response::Response};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use domain_similarity::{EmbeddingProvider, UserStore};

pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let service = &state.service;

    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "vector_store",
            Box::pin(async {
                service
                    .repository()
                    .health_check()
                    .await
                    .map_err(|e| format!("Vector store check failed: {}", e))
            }),
        ),
        (
            "embedding",
            Box::pin(async {
                service
                    .embedder()
                    .health_check()
                    .await
                    .map_err(|e| format!("Embedding service check failed: {}", e))
            }),
        ),
    ];

    run_health_checks(checks).await
}

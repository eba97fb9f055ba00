use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use core_config::AppInfo;
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::future::Future;
use std::pin::Pin;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// A boxed dependency check; `Err` carries a human-readable reason.
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

/// Run dependency checks concurrently and aggregate them into a readiness body.
///
/// Returns 200 with `"status": "ready"` when every check passes, otherwise 503
/// with `"status": "not ready"`. Each check name maps to `"connected"` or
/// `"disconnected"`.
///
/// ```ignore
/// run_health_checks(vec![
///     ("vector_store", Box::pin(async { store.health_check().await.map_err(|e| e.to_string()) })),
///     ("embedding", Box::pin(async { embedder.health_check().await.map_err(|e| e.to_string()) })),
/// ]).await
/// ```
pub async fn run_health_checks(checks: Vec<(&str, HealthCheckFuture<'_>)>) -> Response {
    let (names, futures): (Vec<_>, Vec<_>) = checks.into_iter().unzip();
    let results = join_all(futures).await;

    let mut body = Map::new();
    let mut all_healthy = true;

    for (name, result) in names.into_iter().zip(results) {
        let state = match result {
            Ok(()) => "connected",
            Err(e) => {
                tracing::error!(check = name, error = %e, "Readiness check failed");
                all_healthy = false;
                "disconnected"
            }
        };
        body.insert(name.to_string(), json!(state));
    }

    body.insert(
        "status".to_string(),
        json!(if all_healthy { "ready" } else { "not ready" }),
    );

    let status = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(Value::Object(body))).into_response()
}

/// Liveness handler: 200 whenever the process is serving.
pub async fn health_handler(State(app): State<AppInfo>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        name: app.name,
        version: app.version,
    })
}

/// Router exposing `GET /health`.
pub fn health_router(app_info: AppInfo) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_check() -> HealthCheckFuture<'static> {
        Box::pin(async { Ok::<(), String>(()) })
    }

    fn failing_check(reason: &'static str) -> HealthCheckFuture<'static> {
        Box::pin(async move { Err::<(), String>(reason.to_string()) })
    }

    #[tokio::test]
    async fn test_all_checks_pass() {
        let response =
            run_health_checks(vec![("vector_store", ok_check()), ("embedding", ok_check())]).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_one_failing_check_is_not_ready() {
        let response = run_health_checks(vec![
            ("vector_store", ok_check()),
            ("embedding", failing_check("connection refused")),
        ])
        .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}

//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Basic health check with version information.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness probe: the process is up.
pub async fn live() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: the database answers.
pub async fn ready(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_reports_version() {
        let response = health_check().await;
        assert_eq!(response.0.status, "ok");
        assert!(!response.0.version.is_empty());
    }

    #[tokio::test]
    async fn test_live_is_ok() {
        assert_eq!(live().await, StatusCode::OK);
    }
}

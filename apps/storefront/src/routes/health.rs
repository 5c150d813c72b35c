//! Health checks for load balancers and monitoring.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub server_time: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrations_applied: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrations_total: Option<usize>,
}

/// Liveness. Does not check dependencies.
pub async fn live() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        server_time: Utc::now().to_rfc3339(),
    })
}

/// Readiness. 503 when the database is unreachable.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let db = state.db();

    if !db.health_check().await {
        warn!("Readiness check failed: database unreachable");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "unavailable",
                database: "unreachable",
                migrations_applied: None,
                migrations_total: None,
            }),
        );
    }

    match db.migration_status().await {
        Ok((applied, total)) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: if applied == total { "ready" } else { "degraded" },
                database: "ok",
                migrations_applied: Some(applied),
                migrations_total: Some(total),
            }),
        ),
        Err(e) => {
            warn!(error = %e, "Readiness check could not read migration status");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "unavailable",
                    database: "ok",
                    migrations_applied: None,
                    migrations_total: None,
                }),
            )
        }
    }
}

//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/health/detailed
pub async fn detailed_health(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DetailedHealthResponse>>, ApiError> {
    let database = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db_pool)
        .await
    {
        Ok(_) => "ok".to_string(),
        Err(e) => format!("error: {e}"),
    };

    let status = if database == "ok" { "ok" } else { "degraded" };

    Ok(Json(ApiResponse::ok(DetailedHealthResponse {
        status: status.to_string(),
        database,
        ws_connections: state.realtime.registry.connection_count(),
        online_users: state.realtime.registry.user_count(),
    })))
}

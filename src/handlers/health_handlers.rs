use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::{database, error::ApiError, AppState};

/// Health check endpoint with database connectivity check
pub async fn health_check(State(app_state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let db_healthy = match database::health_check(&app_state.db_pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Database health check failed: {}", e);
            false
        }
    };

    let status = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "database": { "healthy": db_healthy }
        }
    });

    if !db_healthy {
        return Err(ApiError::internal("Service is unhealthy"));
    }

    Ok(Json(status))
}

/// Simple health check endpoint for load balancers
pub async fn health_check_simple() -> Result<&'static str, StatusCode> {
    Ok("OK")
}

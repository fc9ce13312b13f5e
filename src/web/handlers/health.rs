//! # Health Check Handlers

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::web::response_types::{ApiError, ApiResult};
use crate::web::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Basic health check endpoint: GET /health
///
/// Returns OK whenever the process is serving requests.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}

/// Readiness probe: GET /health/ready
///
/// Ready only when the checklist store answers.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    match state.service().health_check().await {
        Ok(true) => Ok(Json(HealthResponse {
            status: "ready".to_string(),
            timestamp: Utc::now(),
        })),
        Ok(false) => {
            warn!("Store health check returned unhealthy");
            Err(ApiError::ServiceUnavailable)
        }
        Err(error) => {
            warn!(error = %error, "Store health check failed");
            Err(ApiError::ServiceUnavailable)
        }
    }
}

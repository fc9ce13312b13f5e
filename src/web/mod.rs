//! # Checklist Web API
//!
//! REST endpoints for checklists and their items, plus health probes.
//! Errors are rendered as `{"error": {"code": ..., "message": ...}}`.

use axum::http::StatusCode;
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

pub mod handlers;
pub mod response_types;
pub mod routes;
pub mod state;

pub use response_types::{ApiError, ApiResult, SuccessResponse};
pub use state::AppState;

/// Create the web application with all routes and middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    let common_middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.request_timeout(),
        ));

    let mut app = Router::new()
        .merge(routes::health_routes())
        .merge(routes::checklist_routes())
        .merge(routes::item_routes())
        .layer(common_middleware);

    if state.config.cors_enabled {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    info!(
        cors_enabled = state.config.cors_enabled,
        "Checklist web application created"
    );
    app.with_state(state)
}

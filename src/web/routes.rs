//! Route definitions for the checklist API organized by resource.

use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::web::{handlers, state::AppState};

/// Health check routes for monitoring and readiness probes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness_check))
}

pub fn checklist_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/checklists", post(handlers::checklists::create_checklist))
        .route(
            "/checklists/{hash}",
            get(handlers::checklists::get_checklist).patch(handlers::checklists::update_title),
        )
}

/// Item routes; `reorder` is a static segment and wins over `{id}`
pub fn item_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/checklists/{hash}/items",
            get(handlers::items::list_items).post(handlers::items::add_item),
        )
        .route(
            "/checklists/{hash}/items/reorder",
            post(handlers::items::reorder_items),
        )
        .route(
            "/checklists/{hash}/items/{id}",
            patch(handlers::items::update_item).delete(handlers::items::delete_item),
        )
}

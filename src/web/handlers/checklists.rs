//! # Checklist Handlers

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{Checklist, ChecklistSummary, ChecklistWithItems};
use crate::web::response_types::{ApiError, ApiResult};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateChecklistRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTitleRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// Create a checklist: POST /checklists
///
/// The body is optional; without one the checklist gets the default title.
pub async fn create_checklist(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ChecklistSummary>)> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        CreateChecklistRequest::default()
    } else {
        serde_json::from_slice::<CreateChecklistRequest>(&body)
            .map_err(|err| ApiError::bad_request(err.to_string()))?
    };

    let checklist = state
        .service()
        .create_checklist(request.title.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(ChecklistSummary::from(&checklist))))
}

/// Fetch a checklist with its ordered items: GET /checklists/{hash}
pub async fn get_checklist(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
) -> ApiResult<Json<ChecklistWithItems>> {
    Ok(Json(state.service().get_checklist(&hash).await?))
}

/// Rename a checklist: PATCH /checklists/{hash}
pub async fn update_title(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
    payload: Result<Json<UpdateTitleRequest>, JsonRejection>,
) -> ApiResult<Json<Checklist>> {
    let Json(request) = payload.map_err(ApiError::from)?;
    let checklist = state
        .service()
        .update_title(&hash, request.title.as_deref())
        .await?;
    Ok(Json(checklist))
}

//! # Checklist Item Handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{ChecklistItem, ItemPatch, PositionUpdate};
use crate::web::response_types::{ApiError, ApiResult, SuccessResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    #[serde(default)]
    pub items: Option<Vec<ReorderEntry>>,
}

/// One `{id, position}` pair; the id stays raw until it is resolved
#[derive(Debug, Deserialize)]
pub struct ReorderEntry {
    pub id: String,
    pub position: i32,
}

/// Ids that are not UUIDs cannot name an item
fn parse_item_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Item not found"))
}

/// List items ordered by position: GET /checklists/{hash}/items
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
) -> ApiResult<Json<Vec<ChecklistItem>>> {
    Ok(Json(state.service().list_items(&hash).await?))
}

/// Append an item: POST /checklists/{hash}/items
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ChecklistItem>)> {
    let Json(request) = payload.map_err(ApiError::from)?;
    let item = state
        .service()
        .add_item(&hash, request.text.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Edit text and/or checked flag: PATCH /checklists/{hash}/items/{id}
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path((hash, item_id)): Path<(String, String)>,
    payload: Result<Json<ItemPatch>, JsonRejection>,
) -> ApiResult<Json<ChecklistItem>> {
    let item_id = parse_item_id(&item_id)?;
    let Json(patch) = payload.map_err(ApiError::from)?;
    let item = state.service().update_item(&hash, item_id, &patch).await?;
    Ok(Json(item))
}

/// Delete an item and close the gap: DELETE /checklists/{hash}/items/{id}
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path((hash, item_id)): Path<(String, String)>,
) -> ApiResult<Json<SuccessResponse>> {
    let item_id = parse_item_id(&item_id)?;
    state.service().delete_item(&hash, item_id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Apply a batch of new positions: POST /checklists/{hash}/items/reorder
pub async fn reorder_items(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse>> {
    let Json(request) = payload.map_err(ApiError::from)?;
    let updates = request
        .items
        .ok_or_else(|| ApiError::bad_request("items must be an array of {id, position}"))?
        .iter()
        .map(|entry| Ok(PositionUpdate::new(parse_item_id(&entry.id)?, entry.position)))
        .collect::<ApiResult<Vec<_>>>()?;
    state.service().reorder_items(&hash, &updates).await?;
    Ok(Json(SuccessResponse::ok()))
}

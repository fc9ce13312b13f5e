//! HTTP API tests against the in-memory store.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use futures::future::join_all;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tower::ServiceExt;

use checklist_core::web::{create_app, AppState};
use common::{memory_service, service_with, test_web_config, UnavailableStore};

fn app() -> Router {
    create_app(AppState::new(memory_service(), test_web_config()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create_checklist(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/checklists", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["hash"].as_str().unwrap().to_string()
}

async fn add_item(app: &Router, hash: &str, text: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        &format!("/checklists/{hash}/items"),
        Some(json!({ "text": text })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn item_positions(app: &Router, hash: &str) -> Vec<(String, i64)> {
    let (status, body) = send(app, Method::GET, &format!("/checklists/{hash}/items"), None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array()
        .unwrap()
        .iter()
        .map(|item| {
            (
                item["text"].as_str().unwrap().to_string(),
                item["position"].as_i64().unwrap(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_create_checklist_without_body_uses_default_title() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/checklists", None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Untitled Checklist");
    assert_eq!(body["hash"].as_str().unwrap().len(), 8);
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_hashes() {
    let app = app();
    let hashes = join_all((0..25).map(|_| create_checklist(&app))).await;

    let unique: HashSet<&String> = hashes.iter().collect();
    assert_eq!(unique.len(), hashes.len());
}

#[tokio::test]
async fn test_create_checklist_with_title() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/checklists",
        Some(json!({ "title": "Groceries" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Groceries");

    let hash = body["hash"].as_str().unwrap();
    let (status, fetched) = send(&app, Method::GET, &format!("/checklists/{hash}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Groceries");
    assert_eq!(fetched["items"], json!([]));
    assert!(fetched["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_checklist_rejects_malformed_json() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/checklists")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_checklist_is_not_found() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/checklists/00000000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_update_title_validation() {
    let app = app();
    let hash = create_checklist(&app).await;
    let uri = format!("/checklists/{hash}");

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "title": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "title": "Packing" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Packing");

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/checklists/ffffffff",
        Some(json!({ "title": "Nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_items_append_at_next_position() {
    let app = app();
    let hash = create_checklist(&app).await;

    let first = add_item(&app, &hash, "Milk").await;
    assert_eq!(first["position"], 0);
    assert_eq!(first["isChecked"], false);
    add_item(&app, &hash, "Bread").await;
    add_item(&app, &hash, "Eggs").await;
    let fourth = add_item(&app, &hash, "Butter").await;
    assert_eq!(fourth["position"], 3);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/checklists/{hash}/items"),
        Some(json!({ "text": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/checklists/{hash}/items"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_closes_the_gap() {
    let app = app();
    let hash = create_checklist(&app).await;
    add_item(&app, &hash, "a").await;
    let b = add_item(&app, &hash, "b").await;
    add_item(&app, &hash, "c").await;
    add_item(&app, &hash, "d").await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/checklists/{hash}/items/{}", b["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    assert_eq!(
        item_positions(&app, &hash).await,
        vec![
            ("a".to_string(), 0),
            ("c".to_string(), 1),
            ("d".to_string(), 2)
        ]
    );
}

#[tokio::test]
async fn test_item_from_another_checklist_cannot_be_touched() {
    let app = app();
    let first = create_checklist(&app).await;
    let second = create_checklist(&app).await;
    let item = add_item(&app, &first, "mine").await;
    let item_id = item["id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/checklists/{second}/items/{item_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/checklists/{second}/items/{item_id}"),
        Some(json!({ "isChecked": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, items) = send(&app, Method::GET, &format!("/checklists/{first}/items"), None).await;
    assert_eq!(items[0]["id"], item["id"]);
    assert_eq!(items[0]["isChecked"], false);
}

#[tokio::test]
async fn test_non_uuid_item_id_is_not_found() {
    let app = app();
    let hash = create_checklist(&app).await;
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/checklists/{hash}/items/not-a-uuid"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_item_ignores_position() {
    let app = app();
    let hash = create_checklist(&app).await;
    let item = add_item(&app, &hash, "Milk").await;
    add_item(&app, &hash, "Bread").await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/checklists/{hash}/items/{}", item["id"].as_str().unwrap()),
        Some(json!({ "isChecked": true, "text": "Oat milk", "position": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isChecked"], true);
    assert_eq!(body["text"], "Oat milk");
    assert_eq!(body["position"], 0);
}

#[tokio::test]
async fn test_reorder_applies_permutation() {
    let app = app();
    let hash = create_checklist(&app).await;
    let a = add_item(&app, &hash, "a").await;
    let b = add_item(&app, &hash, "b").await;
    let c = add_item(&app, &hash, "c").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/checklists/{hash}/items/reorder"),
        Some(json!({ "items": [
            { "id": c["id"], "position": 0 },
            { "id": a["id"], "position": 1 },
            { "id": b["id"], "position": 2 },
        ] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    assert_eq!(
        item_positions(&app, &hash).await,
        vec![
            ("c".to_string(), 0),
            ("a".to_string(), 1),
            ("b".to_string(), 2)
        ]
    );
}

#[tokio::test]
async fn test_reorder_with_unknown_item_changes_nothing() {
    let app = app();
    let hash = create_checklist(&app).await;
    let a = add_item(&app, &hash, "a").await;
    add_item(&app, &hash, "b").await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/checklists/{hash}/items/reorder"),
        Some(json!({ "items": [
            { "id": a["id"], "position": 1 },
            { "id": uuid::Uuid::new_v4(), "position": 0 },
        ] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(
        item_positions(&app, &hash).await,
        vec![("a".to_string(), 0), ("b".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_reorder_with_malformed_item_id_is_not_found() {
    let app = app();
    let hash = create_checklist(&app).await;
    let a = add_item(&app, &hash, "a").await;
    add_item(&app, &hash, "b").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/checklists/{hash}/items/reorder"),
        Some(json!({ "items": [
            { "id": a["id"], "position": 1 },
            { "id": "abc", "position": 0 },
        ] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "Item not found");

    assert_eq!(
        item_positions(&app, &hash).await,
        vec![("a".to_string(), 0), ("b".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_reorder_rejects_bad_batches() {
    let app = app();
    let hash = create_checklist(&app).await;
    let a = add_item(&app, &hash, "a").await;
    add_item(&app, &hash, "b").await;
    let uri = format!("/checklists/{hash}/items/reorder");

    let (status, _) = send(&app, Method::POST, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, &uri, Some(json!({ "items": "nope" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "items": [{ "id": a["id"], "position": 5 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(
        item_positions(&app, &hash).await,
        vec![("a".to_string(), 0), ("b".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_store_outage() {
    let app = create_app(AppState::new(
        service_with(Arc::new(UnavailableStore)),
        test_web_config(),
    ));

    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");

    let (status, body) = send(&app, Method::POST, "/checklists", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "Internal server error");
}

//! # Checklist API Client
//!
//! HTTP client for the checklist web API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::api::ChecklistApi;
use crate::error::{ChecklistError, Result};
use crate::models::{
    Checklist, ChecklistItem, ChecklistSummary, ChecklistWithItems, ItemPatch, PositionUpdate,
};
use crate::web::SuccessResponse;

/// Configuration for the checklist API client
#[derive(Debug, Clone)]
pub struct ChecklistApiConfig {
    /// Base URL of the checklist server (e.g., "<http://localhost:3000>")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ChecklistApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_ms: 30000,
        }
    }
}

/// HTTP client for checklist API operations
#[derive(Debug, Clone)]
pub struct ChecklistApiClient {
    client: Client,
    base_url: Url,
}

impl ChecklistApiClient {
    pub fn new(config: ChecklistApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ChecklistError::Configuration(format!(
                "Invalid base URL '{}': {}",
                config.base_url, e
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(format!("checklist-client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ChecklistError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "Created ChecklistApiClient for base_url: {}, timeout: {}ms",
            base_url, config.timeout_ms
        );

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ChecklistError::Transport(format!("Invalid URL: {}", e)))
    }

    /// Send a request and decode a 2xx JSON body, mapping anything else to
    /// `ChecklistError::Api`
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ChecklistError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                ChecklistError::Transport(format!("Failed to parse response: {}", e))
            });
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = error_message(&error_text);

        error!("Checklist API request failed: {} - {}", status, message);
        Err(ChecklistError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl ChecklistApi for ChecklistApiClient {
    async fn create_checklist(&self, title: Option<&str>) -> Result<ChecklistSummary> {
        let url = self.url("/checklists")?;
        debug!("Creating checklist at: {}", url);
        let body = match title {
            Some(title) => json!({ "title": title }),
            None => json!({}),
        };
        self.send(self.client.post(url).json(&body)).await
    }

    async fn get_checklist(&self, hash: &str) -> Result<ChecklistWithItems> {
        let url = self.url(&format!("/checklists/{}", hash))?;
        self.send(self.client.get(url)).await
    }

    async fn update_title(&self, hash: &str, title: &str) -> Result<Checklist> {
        let url = self.url(&format!("/checklists/{}", hash))?;
        self.send(self.client.patch(url).json(&json!({ "title": title })))
            .await
    }

    async fn list_items(&self, hash: &str) -> Result<Vec<ChecklistItem>> {
        let url = self.url(&format!("/checklists/{}/items", hash))?;
        self.send(self.client.get(url)).await
    }

    async fn add_item(&self, hash: &str, text: &str) -> Result<ChecklistItem> {
        let url = self.url(&format!("/checklists/{}/items", hash))?;
        self.send(self.client.post(url).json(&json!({ "text": text })))
            .await
    }

    async fn update_item(
        &self,
        hash: &str,
        item_id: Uuid,
        patch: &ItemPatch,
    ) -> Result<ChecklistItem> {
        let url = self.url(&format!("/checklists/{}/items/{}", hash, item_id))?;
        self.send(self.client.patch(url).json(patch)).await
    }

    async fn delete_item(&self, hash: &str, item_id: Uuid) -> Result<()> {
        let url = self.url(&format!("/checklists/{}/items/{}", hash, item_id))?;
        let _: SuccessResponse = self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn reorder_items(&self, hash: &str, updates: &[PositionUpdate]) -> Result<()> {
        let url = self.url(&format!("/checklists/{}/items/reorder", hash))?;
        let _: SuccessResponse = self
            .send(self.client.post(url).json(&json!({ "items": updates })))
            .await?;
        Ok(())
    }
}

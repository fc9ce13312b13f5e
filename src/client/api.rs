use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Checklist, ChecklistItem, ChecklistSummary, ChecklistWithItems, ItemPatch, PositionUpdate,
};

/// Remote checklist operations, one method per HTTP endpoint
#[async_trait]
pub trait ChecklistApi: Send + Sync {
    async fn create_checklist(&self, title: Option<&str>) -> Result<ChecklistSummary>;

    async fn get_checklist(&self, hash: &str) -> Result<ChecklistWithItems>;

    async fn update_title(&self, hash: &str, title: &str) -> Result<Checklist>;

    async fn list_items(&self, hash: &str) -> Result<Vec<ChecklistItem>>;

    async fn add_item(&self, hash: &str, text: &str) -> Result<ChecklistItem>;

    async fn update_item(
        &self,
        hash: &str,
        item_id: Uuid,
        patch: &ItemPatch,
    ) -> Result<ChecklistItem>;

    async fn delete_item(&self, hash: &str, item_id: Uuid) -> Result<()>;

    async fn reorder_items(&self, hash: &str, updates: &[PositionUpdate]) -> Result<()>;
}

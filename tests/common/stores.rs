use async_trait::async_trait;
use uuid::Uuid;

use checklist_core::error::{ChecklistError, Result};
use checklist_core::models::{Checklist, ChecklistItem, ItemPatch, PositionUpdate};
use checklist_core::store::ChecklistStore;

/// Store whose backend is unreachable
#[derive(Debug, Default)]
pub struct UnavailableStore;

fn down<T>() -> Result<T> {
    Err(ChecklistError::Transport("store unavailable".to_string()))
}

#[async_trait]
impl ChecklistStore for UnavailableStore {
    async fn create_checklist(&self, _hash: &str, _title: &str) -> Result<Checklist> {
        down()
    }

    async fn hash_exists(&self, _hash: &str) -> Result<bool> {
        down()
    }

    async fn find_checklist_by_hash(&self, _hash: &str) -> Result<Option<Checklist>> {
        down()
    }

    async fn update_checklist_title(&self, _checklist_id: Uuid, _title: &str) -> Result<Checklist> {
        down()
    }

    async fn list_items(&self, _checklist_id: Uuid) -> Result<Vec<ChecklistItem>> {
        down()
    }

    async fn create_item(&self, _checklist_id: Uuid, _text: &str) -> Result<ChecklistItem> {
        down()
    }

    async fn update_item(
        &self,
        _checklist_id: Uuid,
        _item_id: Uuid,
        _patch: &ItemPatch,
    ) -> Result<ChecklistItem> {
        down()
    }

    async fn delete_item(&self, _checklist_id: Uuid, _item_id: Uuid) -> Result<()> {
        down()
    }

    async fn batch_update_positions(
        &self,
        _checklist_id: Uuid,
        _updates: &[PositionUpdate],
    ) -> Result<()> {
        down()
    }

    async fn touch_checklist_updated_at(&self, _checklist_id: Uuid) -> Result<()> {
        down()
    }

    async fn health_check(&self) -> Result<bool> {
        down()
    }
}

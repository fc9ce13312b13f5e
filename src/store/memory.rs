//! In-memory [`ChecklistStore`].
//!
//! All state sits behind one `parking_lot::Mutex` that is never held across
//! an `.await`, so each operation is atomic with respect to every other.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

use super::ChecklistStore;
use crate::error::{ChecklistError, Result};
use crate::models::{Checklist, ChecklistItem, ItemPatch, PositionUpdate};
use crate::sequencer;

#[derive(Debug, Default)]
struct MemoryState {
    checklists: HashMap<Uuid, Checklist>,
    hashes: HashMap<String, Uuid>,
    items: HashMap<Uuid, Vec<ChecklistItem>>,
}

impl MemoryState {
    fn checklist_mut(&mut self, checklist_id: Uuid) -> Result<&mut Checklist> {
        self.checklists
            .get_mut(&checklist_id)
            .ok_or_else(|| ChecklistError::checklist_not_found(checklist_id.to_string()))
    }

    fn items_mut(&mut self, checklist_id: Uuid) -> Result<&mut Vec<ChecklistItem>> {
        if !self.checklists.contains_key(&checklist_id) {
            return Err(ChecklistError::checklist_not_found(checklist_id.to_string()));
        }
        Ok(self.items.entry(checklist_id).or_default())
    }
}

#[derive(Debug, Default)]
pub struct MemoryChecklistStore {
    state: Mutex<MemoryState>,
}

impl MemoryChecklistStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChecklistStore for MemoryChecklistStore {
    async fn create_checklist(&self, hash: &str, title: &str) -> Result<Checklist> {
        let mut state = self.state.lock();
        if state.hashes.contains_key(hash) {
            return Err(ChecklistError::HashCollision {
                hash: hash.to_string(),
            });
        }

        let checklist = Checklist::new(hash, title);
        state.hashes.insert(hash.to_string(), checklist.id);
        state.items.insert(checklist.id, Vec::new());
        state.checklists.insert(checklist.id, checklist.clone());
        Ok(checklist)
    }

    async fn hash_exists(&self, hash: &str) -> Result<bool> {
        Ok(self.state.lock().hashes.contains_key(hash))
    }

    async fn find_checklist_by_hash(&self, hash: &str) -> Result<Option<Checklist>> {
        let state = self.state.lock();
        Ok(state
            .hashes
            .get(hash)
            .and_then(|id| state.checklists.get(id))
            .cloned())
    }

    async fn update_checklist_title(&self, checklist_id: Uuid, title: &str) -> Result<Checklist> {
        let mut state = self.state.lock();
        let checklist = state.checklist_mut(checklist_id)?;
        checklist.title = title.to_string();
        checklist.updated_at = Utc::now();
        Ok(checklist.clone())
    }

    async fn list_items(&self, checklist_id: Uuid) -> Result<Vec<ChecklistItem>> {
        let mut state = self.state.lock();
        let mut items = state.items_mut(checklist_id)?.clone();
        items.sort_by_key(|item| item.position);
        Ok(items)
    }

    async fn create_item(&self, checklist_id: Uuid, text: &str) -> Result<ChecklistItem> {
        let mut state = self.state.lock();
        let items = state.items_mut(checklist_id)?;
        let position = sequencer::next_position(&sequencer::slots(items));
        let item = ChecklistItem::new(checklist_id, text, position);
        items.push(item.clone());
        Ok(item)
    }

    async fn update_item(
        &self,
        checklist_id: Uuid,
        item_id: Uuid,
        patch: &ItemPatch,
    ) -> Result<ChecklistItem> {
        let mut state = self.state.lock();
        let item = state
            .items_mut(checklist_id)?
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| ChecklistError::item_not_found(item_id))?;
        patch.apply_to(item);
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn delete_item(&self, checklist_id: Uuid, item_id: Uuid) -> Result<()> {
        let mut state = self.state.lock();
        let items = state.items_mut(checklist_id)?;
        let plan = sequencer::plan_delete(&sequencer::slots(items), item_id)?;

        items.retain(|item| item.id != item_id);
        apply_positions(items, &plan.shifts);
        Ok(())
    }

    async fn batch_update_positions(
        &self,
        checklist_id: Uuid,
        updates: &[PositionUpdate],
    ) -> Result<()> {
        let mut state = self.state.lock();
        let items = state.items_mut(checklist_id)?;
        let plan = sequencer::plan_reorder(&sequencer::slots(items), updates)?;
        apply_positions(items, &plan);
        Ok(())
    }

    async fn touch_checklist_updated_at(&self, checklist_id: Uuid) -> Result<()> {
        let mut state = self.state.lock();
        state.checklist_mut(checklist_id)?.updated_at = Utc::now();
        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

fn apply_positions(items: &mut [ChecklistItem], updates: &[PositionUpdate]) {
    let now = Utc::now();
    for update in updates {
        if let Some(item) = items.iter_mut().find(|item| item.id == update.id) {
            item.position = update.position;
            item.updated_at = now;
        }
    }
}

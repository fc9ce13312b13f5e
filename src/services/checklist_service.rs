use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::config::ChecklistSettings;
use crate::constants::operations;
use crate::error::{ChecklistError, Result};
use crate::hash::{generate_unique_hash, is_well_formed};
use crate::logging::{log_checklist_operation, log_item_operation};
use crate::models::{Checklist, ChecklistItem, ChecklistWithItems, ItemPatch, PositionUpdate};
use crate::store::ChecklistStore;

/// Checklist operations addressed by public hash
///
/// Resolves hashes to checklists, applies input rules, and keeps the parent
/// checklist's `updated_at` current on every item mutation. All persistence
/// goes through the injected [`ChecklistStore`].
#[derive(Clone)]
pub struct ChecklistService {
    store: Arc<dyn ChecklistStore>,
    settings: ChecklistSettings,
}

impl std::fmt::Debug for ChecklistService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChecklistService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ChecklistService {
    pub fn new(store: Arc<dyn ChecklistStore>, settings: ChecklistSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &Arc<dyn ChecklistStore> {
        &self.store
    }

    pub fn settings(&self) -> &ChecklistSettings {
        &self.settings
    }

    /// Create a checklist under a freshly generated hash
    ///
    /// A missing or blank title falls back to the configured default. Hashes
    /// already taken, whether seen up front or reported by the insert, are
    /// regenerated up to `max_hash_attempts` times.
    pub async fn create_checklist(&self, title: Option<&str>) -> Result<Checklist> {
        let title = match title.map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => self.settings.default_title.clone(),
        };

        for attempt in 1..=self.settings.max_hash_attempts {
            let hash = generate_unique_hash(self.settings.hash_length);
            if self.store.hash_exists(&hash).await? {
                debug!(attempt, "Generated hash already in use");
                continue;
            }

            match self.store.create_checklist(&hash, &title).await {
                Ok(checklist) => {
                    log_checklist_operation(
                        operations::CREATE_CHECKLIST,
                        Some(&checklist.hash),
                        "created",
                        None,
                    );
                    return Ok(checklist);
                }
                Err(ChecklistError::HashCollision { .. }) => {
                    debug!(attempt, "Hash taken concurrently");
                }
                Err(error) => return Err(error),
            }
        }

        Err(ChecklistError::HashSpaceExhausted {
            attempts: self.settings.max_hash_attempts,
        })
    }

    pub async fn get_checklist(&self, hash: &str) -> Result<ChecklistWithItems> {
        let checklist = self.resolve(hash).await?;
        let items = self.store.list_items(checklist.id).await?;
        Ok(ChecklistWithItems { checklist, items })
    }

    pub async fn update_title(&self, hash: &str, title: Option<&str>) -> Result<Checklist> {
        let title = match title.map(str::trim) {
            Some(title) if !title.is_empty() => title,
            _ => return Err(ChecklistError::validation("Title is required")),
        };

        let checklist = self.resolve(hash).await?;
        let updated = self.store.update_checklist_title(checklist.id, title).await?;
        log_checklist_operation(operations::UPDATE_TITLE, Some(hash), "updated", None);
        Ok(updated)
    }

    pub async fn list_items(&self, hash: &str) -> Result<Vec<ChecklistItem>> {
        let checklist = self.resolve(hash).await?;
        self.store.list_items(checklist.id).await
    }

    pub async fn add_item(&self, hash: &str, text: Option<&str>) -> Result<ChecklistItem> {
        let text = match text {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(ChecklistError::validation("Text is required")),
        };

        let checklist = self.resolve(hash).await?;
        let item = self.store.create_item(checklist.id, text).await?;
        self.store.touch_checklist_updated_at(checklist.id).await?;

        log_item_operation(
            operations::ADD_ITEM,
            hash,
            Some(&item.id.to_string()),
            Some(item.position),
            "created",
            None,
        );
        Ok(item)
    }

    pub async fn update_item(
        &self,
        hash: &str,
        item_id: Uuid,
        patch: &ItemPatch,
    ) -> Result<ChecklistItem> {
        let checklist = self.resolve(hash).await?;
        let item = self.store.update_item(checklist.id, item_id, patch).await?;
        self.store.touch_checklist_updated_at(checklist.id).await?;

        log_item_operation(
            operations::UPDATE_ITEM,
            hash,
            Some(&item_id.to_string()),
            Some(item.position),
            "updated",
            None,
        );
        Ok(item)
    }

    pub async fn delete_item(&self, hash: &str, item_id: Uuid) -> Result<()> {
        let checklist = self.resolve(hash).await?;
        self.store.delete_item(checklist.id, item_id).await?;
        self.store.touch_checklist_updated_at(checklist.id).await?;

        log_item_operation(
            operations::DELETE_ITEM,
            hash,
            Some(&item_id.to_string()),
            None,
            "deleted",
            None,
        );
        Ok(())
    }

    pub async fn reorder_items(&self, hash: &str, updates: &[PositionUpdate]) -> Result<()> {
        let checklist = self.resolve(hash).await?;
        self.store
            .batch_update_positions(checklist.id, updates)
            .await?;
        self.store.touch_checklist_updated_at(checklist.id).await?;

        let details = format!("{} position updates", updates.len());
        log_item_operation(
            operations::REORDER_ITEMS,
            hash,
            None,
            None,
            "reordered",
            Some(&details),
        );
        Ok(())
    }

    pub async fn health_check(&self) -> Result<bool> {
        self.store.health_check().await
    }

    async fn resolve(&self, hash: &str) -> Result<Checklist> {
        if !is_well_formed(hash) {
            return Err(ChecklistError::checklist_not_found(hash));
        }
        self.store
            .find_checklist_by_hash(hash)
            .await?
            .ok_or_else(|| ChecklistError::checklist_not_found(hash))
    }
}

//! # Checklist Store Access
//!
//! The persistence contract used by the service layer. Two implementations
//! ship with the crate:
//!
//! - [`PgChecklistStore`] - PostgreSQL through SQLx, position-affecting
//!   operations serialized by a row lock on the owning checklist
//! - [`MemoryChecklistStore`] - process-local, one mutex around all state;
//!   used for development and tests
//!
//! Every operation scoped to a checklist verifies that the item belongs to
//! it. An item id from another checklist is reported as
//! [`ChecklistError::ItemNotFound`](crate::error::ChecklistError::ItemNotFound)
//! and nothing is mutated.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Checklist, ChecklistItem, ItemPatch, PositionUpdate};

pub use memory::MemoryChecklistStore;
pub use postgres::PgChecklistStore;

#[async_trait]
pub trait ChecklistStore: Send + Sync {
    /// Insert a checklist; a taken hash yields `HashCollision`
    async fn create_checklist(&self, hash: &str, title: &str) -> Result<Checklist>;

    async fn hash_exists(&self, hash: &str) -> Result<bool>;

    async fn find_checklist_by_hash(&self, hash: &str) -> Result<Option<Checklist>>;

    async fn update_checklist_title(&self, checklist_id: Uuid, title: &str) -> Result<Checklist>;

    /// Items ordered by position ascending
    async fn list_items(&self, checklist_id: Uuid) -> Result<Vec<ChecklistItem>>;

    /// Append an item at the next free position
    async fn create_item(&self, checklist_id: Uuid, text: &str) -> Result<ChecklistItem>;

    async fn update_item(
        &self,
        checklist_id: Uuid,
        item_id: Uuid,
        patch: &ItemPatch,
    ) -> Result<ChecklistItem>;

    /// Delete an item and close the gap it leaves, atomically
    async fn delete_item(&self, checklist_id: Uuid, item_id: Uuid) -> Result<()>;

    /// Apply a reorder batch, all or nothing
    async fn batch_update_positions(
        &self,
        checklist_id: Uuid,
        updates: &[PositionUpdate],
    ) -> Result<()>;

    async fn touch_checklist_updated_at(&self, checklist_id: Uuid) -> Result<()>;

    async fn health_check(&self) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // The service holds the store as a trait object
    fn _assert_object_safe(_: &dyn ChecklistStore) {}
}

//! PostgreSQL [`ChecklistStore`].
//!
//! Position-affecting operations run in a transaction that first takes
//! `SELECT ... FOR UPDATE` on the checklist row. The unique constraint on
//! `(checklist_id, position)` is deferred to commit, so intermediate
//! duplicates while shifting rows are allowed.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::ChecklistStore;
use crate::error::{ChecklistError, Result};
use crate::models::{Checklist, ChecklistItem, ItemPatch, PositionUpdate};
use crate::sequencer;

const HASH_UNIQUE_CONSTRAINT: &str = "checklists_hash_key";

#[derive(Debug, Clone)]
pub struct PgChecklistStore {
    pool: PgPool,
}

impl PgChecklistStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn lock_checklist(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        checklist_id: Uuid,
    ) -> Result<()> {
        if Checklist::lock_for_update(&mut **tx, checklist_id).await? {
            Ok(())
        } else {
            Err(ChecklistError::checklist_not_found(checklist_id.to_string()))
        }
    }
}

fn is_hash_collision(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => {
            db_error.is_unique_violation()
                && db_error
                    .constraint()
                    .is_none_or(|constraint| constraint == HASH_UNIQUE_CONSTRAINT)
        }
        _ => false,
    }
}

#[async_trait]
impl ChecklistStore for PgChecklistStore {
    async fn create_checklist(&self, hash: &str, title: &str) -> Result<Checklist> {
        Checklist::insert(&self.pool, hash, title)
            .await
            .map_err(|error| {
                if is_hash_collision(&error) {
                    ChecklistError::HashCollision {
                        hash: hash.to_string(),
                    }
                } else {
                    error.into()
                }
            })
    }

    async fn hash_exists(&self, hash: &str) -> Result<bool> {
        Ok(Checklist::hash_exists(&self.pool, hash).await?)
    }

    async fn find_checklist_by_hash(&self, hash: &str) -> Result<Option<Checklist>> {
        Ok(Checklist::find_by_hash(&self.pool, hash).await?)
    }

    async fn update_checklist_title(&self, checklist_id: Uuid, title: &str) -> Result<Checklist> {
        Checklist::update_title(&self.pool, checklist_id, title)
            .await?
            .ok_or_else(|| ChecklistError::checklist_not_found(checklist_id.to_string()))
    }

    async fn list_items(&self, checklist_id: Uuid) -> Result<Vec<ChecklistItem>> {
        Ok(ChecklistItem::list_for_checklist(&self.pool, checklist_id).await?)
    }

    #[instrument(skip(self, text))]
    async fn create_item(&self, checklist_id: Uuid, text: &str) -> Result<ChecklistItem> {
        let mut tx = self.pool.begin().await?;
        Self::lock_checklist(&mut tx, checklist_id).await?;

        let existing = ChecklistItem::list_for_checklist(&mut *tx, checklist_id).await?;
        let position = sequencer::next_position(&sequencer::slots(&existing));
        let item = ChecklistItem::insert(&mut *tx, checklist_id, text, position).await?;

        tx.commit().await?;
        debug!(item_id = %item.id, position, "Appended checklist item");
        Ok(item)
    }

    async fn update_item(
        &self,
        checklist_id: Uuid,
        item_id: Uuid,
        patch: &ItemPatch,
    ) -> Result<ChecklistItem> {
        ChecklistItem::update_fields(&self.pool, checklist_id, item_id, patch)
            .await?
            .ok_or_else(|| ChecklistError::item_not_found(item_id))
    }

    #[instrument(skip(self))]
    async fn delete_item(&self, checklist_id: Uuid, item_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::lock_checklist(&mut tx, checklist_id).await?;

        let existing = ChecklistItem::list_for_checklist(&mut *tx, checklist_id).await?;
        let plan = sequencer::plan_delete(&sequencer::slots(&existing), item_id)?;

        ChecklistItem::delete(&mut *tx, checklist_id, item_id).await?;
        for shift in &plan.shifts {
            ChecklistItem::set_position(&mut *tx, checklist_id, shift.id, shift.position).await?;
        }

        tx.commit().await?;
        debug!(
            deleted_position = plan.deleted_position,
            shifted = plan.shifts.len(),
            "Deleted checklist item"
        );
        Ok(())
    }

    #[instrument(skip(self, updates), fields(batch_size = updates.len()))]
    async fn batch_update_positions(
        &self,
        checklist_id: Uuid,
        updates: &[PositionUpdate],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        Self::lock_checklist(&mut tx, checklist_id).await?;

        let existing = ChecklistItem::list_for_checklist(&mut *tx, checklist_id).await?;
        let plan = sequencer::plan_reorder(&sequencer::slots(&existing), updates)?;

        for update in &plan {
            ChecklistItem::set_position(&mut *tx, checklist_id, update.id, update.position).await?;
        }

        tx.commit().await?;
        debug!(moved = plan.len(), "Applied reorder batch");
        Ok(())
    }

    async fn touch_checklist_updated_at(&self, checklist_id: Uuid) -> Result<()> {
        if Checklist::touch(&self.pool, checklist_id).await? {
            Ok(())
        } else {
            Err(ChecklistError::checklist_not_found(checklist_id.to_string()))
        }
    }

    async fn health_check(&self) -> Result<bool> {
        let result: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(result == 1)
    }
}

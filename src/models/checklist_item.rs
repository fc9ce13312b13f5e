use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// ChecklistItem is one ordered entry of a checklist
/// Maps to `checklist_items` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: Uuid,
    pub text: String,
    pub is_checked: bool,
    pub position: i32,
    pub checklist_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of the user-editable item fields.
///
/// Positions are absent; they only change through reorder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_checked: Option<bool>,
}

impl ItemPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            is_checked: None,
        }
    }

    pub fn checked(is_checked: bool) -> Self {
        Self {
            text: None,
            is_checked: Some(is_checked),
        }
    }

    /// Apply the patch to an in-memory item
    pub fn apply_to(&self, item: &mut ChecklistItem) {
        if let Some(text) = &self.text {
            item.text = text.clone();
        }
        if let Some(is_checked) = self.is_checked {
            item.is_checked = is_checked;
        }
    }
}

/// Requested position for one item in a reorder batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: Uuid,
    pub position: i32,
}

impl PositionUpdate {
    pub fn new(id: Uuid, position: i32) -> Self {
        Self { id, position }
    }
}

impl ChecklistItem {
    /// Build an unchecked item record with fresh identifiers and timestamps
    pub fn new(checklist_id: Uuid, text: impl Into<String>, position: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_checked: false,
            position,
            checklist_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// List items of a checklist ordered by position
    pub async fn list_for_checklist<'e, E: PgExecutor<'e>>(
        executor: E,
        checklist_id: Uuid,
    ) -> Result<Vec<ChecklistItem>, sqlx::Error> {
        sqlx::query_as::<_, ChecklistItem>(
            r#"
            SELECT id, text, is_checked, position, checklist_id, created_at, updated_at
            FROM checklist_items
            WHERE checklist_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(checklist_id)
        .fetch_all(executor)
        .await
    }

    /// Insert an item at the given position
    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        checklist_id: Uuid,
        text: &str,
        position: i32,
    ) -> Result<ChecklistItem, sqlx::Error> {
        sqlx::query_as::<_, ChecklistItem>(
            r#"
            INSERT INTO checklist_items (id, text, position, checklist_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, text, is_checked, position, checklist_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(text)
        .bind(position)
        .bind(checklist_id)
        .fetch_one(executor)
        .await
    }

    /// Update text and/or checked flag of an item owned by `checklist_id`
    pub async fn update_fields<'e, E: PgExecutor<'e>>(
        executor: E,
        checklist_id: Uuid,
        item_id: Uuid,
        patch: &ItemPatch,
    ) -> Result<Option<ChecklistItem>, sqlx::Error> {
        sqlx::query_as::<_, ChecklistItem>(
            r#"
            UPDATE checklist_items
            SET
                text = COALESCE($3, text),
                is_checked = COALESCE($4, is_checked),
                updated_at = NOW()
            WHERE id = $1 AND checklist_id = $2
            RETURNING id, text, is_checked, position, checklist_id, created_at, updated_at
            "#,
        )
        .bind(item_id)
        .bind(checklist_id)
        .bind(patch.text.as_deref())
        .bind(patch.is_checked)
        .fetch_optional(executor)
        .await
    }

    /// Delete an item owned by `checklist_id`
    pub async fn delete<'e, E: PgExecutor<'e>>(
        executor: E,
        checklist_id: Uuid,
        item_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM checklist_items WHERE id = $1 AND checklist_id = $2")
            .bind(item_id)
            .bind(checklist_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move an item owned by `checklist_id` to a new position
    pub async fn set_position<'e, E: PgExecutor<'e>>(
        executor: E,
        checklist_id: Uuid,
        item_id: Uuid,
        position: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE checklist_items
            SET position = $3, updated_at = NOW()
            WHERE id = $1 AND checklist_id = $2
            "#,
        )
        .bind(item_id)
        .bind(checklist_id)
        .bind(position)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

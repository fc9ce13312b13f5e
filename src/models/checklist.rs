use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

use super::checklist_item::ChecklistItem;

/// Checklist represents a shareable list addressed publicly by `hash`
/// Maps to `checklists` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: Uuid,
    pub hash: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Checklist together with its items ordered by position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistWithItems {
    #[serde(flatten)]
    pub checklist: Checklist,
    pub items: Vec<ChecklistItem>,
}

/// Body returned when a checklist is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistSummary {
    pub id: Uuid,
    pub hash: String,
    pub title: String,
}

impl From<&Checklist> for ChecklistSummary {
    fn from(checklist: &Checklist) -> Self {
        Self {
            id: checklist.id,
            hash: checklist.hash.clone(),
            title: checklist.title.clone(),
        }
    }
}

impl Checklist {
    /// Build a checklist record with fresh identifiers and timestamps
    pub fn new(hash: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            hash: hash.into(),
            title: title.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Insert a new checklist
    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        hash: &str,
        title: &str,
    ) -> Result<Checklist, sqlx::Error> {
        sqlx::query_as::<_, Checklist>(
            r#"
            INSERT INTO checklists (id, hash, title)
            VALUES ($1, $2, $3)
            RETURNING id, hash, title, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(hash)
        .bind(title)
        .fetch_one(executor)
        .await
    }

    /// Find a checklist by its public hash
    pub async fn find_by_hash<'e, E: PgExecutor<'e>>(
        executor: E,
        hash: &str,
    ) -> Result<Option<Checklist>, sqlx::Error> {
        sqlx::query_as::<_, Checklist>(
            r#"
            SELECT id, hash, title, created_at, updated_at
            FROM checklists
            WHERE hash = $1
            "#,
        )
        .bind(hash)
        .fetch_optional(executor)
        .await
    }

    /// Check whether a hash is already taken
    pub async fn hash_exists<'e, E: PgExecutor<'e>>(
        executor: E,
        hash: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM checklists WHERE hash = $1)")
            .bind(hash)
            .fetch_one(executor)
            .await
    }

    /// Lock the checklist row for the rest of the transaction.
    ///
    /// Every position-affecting operation takes this lock first, so two
    /// renumberings of the same checklist never interleave.
    pub async fn lock_for_update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM checklists WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(locked.is_some())
    }

    /// Update the title
    pub async fn update_title<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
        title: &str,
    ) -> Result<Option<Checklist>, sqlx::Error> {
        sqlx::query_as::<_, Checklist>(
            r#"
            UPDATE checklists
            SET title = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, hash, title, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .fetch_optional(executor)
        .await
    }

    /// Bump `updated_at`
    pub async fn touch<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE checklists SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checklist_serializes_camel_case() {
        let checklist = Checklist::new("abcd1234", "Groceries");
        let json = serde_json::to_value(&checklist).unwrap();
        assert_eq!(json["hash"], "abcd1234");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_with_items_flattens_checklist_fields() {
        let checklist = Checklist::new("abcd1234", "Groceries");
        let item = ChecklistItem::new(checklist.id, "Milk", 0);
        let full = ChecklistWithItems {
            checklist: checklist.clone(),
            items: vec![item],
        };
        let json = serde_json::to_value(&full).unwrap();
        assert_eq!(json["title"], "Groceries");
        assert_eq!(json["id"], checklist.id.to_string());
        assert_eq!(json["items"][0]["text"], "Milk");
        assert_eq!(json["items"][0]["isChecked"], false);
    }
}

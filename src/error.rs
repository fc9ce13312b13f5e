use thiserror::Error;
use uuid::Uuid;

/// Domain errors shared by the store, service and client layers
#[derive(Debug, Error)]
pub enum ChecklistError {
    #[error("Checklist not found: {hash}")]
    ChecklistNotFound { hash: String },

    #[error("Item not found in this checklist: {item_id}")]
    ItemNotFound { item_id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Hash already in use: {hash}")]
    HashCollision { hash: String },

    #[error("Could not generate a unique hash after {attempts} attempts")]
    HashSpaceExhausted { attempts: u32 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },
}

impl ChecklistError {
    pub fn checklist_not_found(hash: impl Into<String>) -> Self {
        Self::ChecklistNotFound { hash: hash.into() }
    }

    pub fn item_not_found(item_id: Uuid) -> Self {
        Self::ItemNotFound {
            item_id: item_id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Absent checklist or item, including items owned by another checklist
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ChecklistNotFound { .. } | Self::ItemNotFound { .. } => true,
            Self::Api { status, .. } => *status == 404,
            _ => false,
        }
    }

    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Api { status, .. } => *status == 400,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChecklistError>;

//! # System Constants
//!
//! Defaults and operational boundaries shared by the server, the store
//! implementations and the client.

/// Title assigned to checklists created without one
pub const DEFAULT_CHECKLIST_TITLE: &str = "Untitled Checklist";

/// Length of the public checklist hash
pub const DEFAULT_HASH_LENGTH: usize = 8;

/// Upper bound on hash generation attempts before giving up
pub const DEFAULT_MAX_HASH_ATTEMPTS: u32 = 16;

/// Auto-save delays used by the client field editors
pub mod autosave {
    use std::time::Duration;

    /// Default trailing-edge debounce delay
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

    /// Delay before a failed save is retried
    pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

    /// Title and item text editors
    pub const TEXT_DELAY: Duration = Duration::from_millis(1000);

    /// Checkbox toggles are committed immediately
    pub const CHECKBOX_DELAY: Duration = Duration::from_millis(0);

    /// Background refresh of the whole item list
    pub const BULK_REFRESH_DELAY: Duration = Duration::from_millis(5000);

    /// Minimum spacing between two item list refreshes
    pub const REFRESH_RATE_LIMIT: Duration = Duration::from_millis(2000);
}

/// Structured log operation names
pub mod operations {
    pub const CREATE_CHECKLIST: &str = "create_checklist";
    pub const UPDATE_TITLE: &str = "update_title";
    pub const ADD_ITEM: &str = "add_item";
    pub const UPDATE_ITEM: &str = "update_item";
    pub const DELETE_ITEM: &str = "delete_item";
    pub const REORDER_ITEMS: &str = "reorder_items";
}

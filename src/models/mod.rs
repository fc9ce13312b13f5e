pub mod checklist;
pub mod checklist_item;

// Re-export core models for easy access
pub use checklist::{Checklist, ChecklistSummary, ChecklistWithItems};
pub use checklist_item::{ChecklistItem, ItemPatch, PositionUpdate};

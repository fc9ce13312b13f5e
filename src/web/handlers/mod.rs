pub mod checklists;
pub mod health;
pub mod items;

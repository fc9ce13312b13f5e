#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Checklist Core
//!
//! Shared checklists addressed by an unguessable public hash, with items kept
//! in a dense order and edits persisted through debounced auto-save.
//!
//! ## Overview
//!
//! Anyone holding a checklist's hash can read and edit it. The server keeps
//! item positions dense and zero-based through every append, delete and
//! reorder; the client mirrors a checklist locally and turns keystrokes and
//! checkbox toggles into a small number of serialized saves.
//!
//! ## Module Organization
//!
//! - [`sequencer`] - Dense position planning for append, delete and reorder
//! - [`autosave`] - Debounced, serialized save coordinator
//! - [`store`] - Persistence contract with PostgreSQL and in-memory backends
//! - [`services`] - Hash-addressed checklist operations
//! - [`web`] - Axum HTTP surface
//! - [`client`] - HTTP client, checklist session and field editors
//! - [`models`] - Checklist and item records
//! - [`database`] - Connection management and migrations
//! - [`config`] - Layered configuration
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use checklist_core::config::ChecklistSettings;
//! use checklist_core::services::ChecklistService;
//! use checklist_core::store::MemoryChecklistStore;
//!
//! # tokio_test::block_on(async {
//! let service = ChecklistService::new(
//!     Arc::new(MemoryChecklistStore::new()),
//!     ChecklistSettings::default(),
//! );
//!
//! let checklist = service.create_checklist(Some("Groceries")).await?;
//! service.add_item(&checklist.hash, Some("Milk")).await?;
//! service.add_item(&checklist.hash, Some("Bread")).await?;
//!
//! let full = service.get_checklist(&checklist.hash).await?;
//! assert_eq!(full.items[1].position, 1);
//! # Ok::<(), checklist_core::ChecklistError>(())
//! # }).unwrap();
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # Unit and integration tests (PostgreSQL tests are ignored)
//! DATABASE_URL=postgresql://localhost/checklist_test cargo test -- --ignored
//! ```

pub mod autosave;
pub mod client;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod hash;
pub mod logging;
pub mod models;
pub mod sequencer;
pub mod services;
pub mod store;
pub mod web;

pub use autosave::{save_fn, AutoSave, AutoSaveOptions, AutoSaveState, AutoSaveStatus, SaveHandler};
pub use config::{ChecklistConfig, ChecklistSettings, ConfigManager};
pub use error::{ChecklistError, Result};
pub use models::{Checklist, ChecklistItem, ChecklistWithItems, ItemPatch, PositionUpdate};
pub use services::ChecklistService;
pub use store::{ChecklistStore, MemoryChecklistStore, PgChecklistStore};

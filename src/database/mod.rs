//! # Database Operations
//!
//! PostgreSQL connection management and schema migrations.
//!
//! - [`connection`] - pool construction with connect retry and health checks
//! - [`migrations`] - embedded SQLx migrations
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use checklist_core::config::DatabaseConfig;
//! use checklist_core::database::{DatabaseConnection, DatabaseMigrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = DatabaseConnection::connect_with_retry(&DatabaseConfig::default()).await?;
//! DatabaseMigrations::run_all(db.pool()).await?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod migrations;

pub use connection::DatabaseConnection;
pub use migrations::DatabaseMigrations;

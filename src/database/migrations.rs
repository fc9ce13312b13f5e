//! # Database Migrations
//!
//! Schema migrations are embedded at compile time from the `migrations/`
//! directory and applied through SQLx's migrator, which records applied
//! versions in `_sqlx_migrations`. Files follow the
//! `YYYYMMDDHHMMSS_description.sql` naming convention.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies the embedded schema migrations.
pub struct DatabaseMigrations;

impl DatabaseMigrations {
    /// Run all outstanding migrations in order
    pub async fn run_all(pool: &PgPool) -> Result<(), MigrateError> {
        info!(
            available = MIGRATOR.iter().count(),
            "Running database migrations"
        );
        MIGRATOR.run(pool).await?;
        info!("Database migrations complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_embedded() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|migration| migration.version).collect();
        assert!(!versions.is_empty());
        assert!(versions.windows(2).all(|pair| pair[0] < pair[1]));
    }
}

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Connect using the pool settings in `config`, retrying with exponential
    /// backoff before giving up
    pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let attempts = config.connect_retries.max(1);
        let mut delay = config.connect_retry_delay();
        let mut attempt = 1;

        loop {
            match Self::connect_once(config).await {
                Ok(pool) => {
                    info!(attempt, max_connections = config.max_connections, "Connected to database");
                    return Ok(Self { pool });
                }
                Err(error) if attempt < attempts => {
                    warn!(
                        attempt,
                        retry_in_ms = delay.as_millis() as u64,
                        error = %error,
                        "Database connection failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = next_delay(delay);
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn connect_once(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&config.url)
            .await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(pool)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<bool, sqlx::Error> {
        let health: i32 = sqlx::query_scalar("SELECT 1 as health")
            .fetch_one(&self.pool)
            .await?;
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn next_delay(delay: Duration) -> Duration {
    delay.saturating_mul(2)
}

//! # Structured Logging Module
//!
//! Environment-aware structured logging. Development and test runs get
//! human-readable console output at debug level; production gets JSON lines
//! at info level. `RUST_LOG` overrides the level in every environment.

use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));

        let console_layer = if environment == "production" {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // try_init: a test harness or embedding application may own the global subscriber
        if tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %environment,
            "STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("CHECKLIST_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "test" => "debug".to_string(),
        "development" => "debug".to_string(),
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for checklist-level operations
pub fn log_checklist_operation(operation: &str, hash: Option<&str>, status: &str, details: Option<&str>) {
    tracing::info!(
        operation = %operation,
        hash = hash,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "CHECKLIST_OPERATION"
    );
}

/// Log structured data for item operations
pub fn log_item_operation(
    operation: &str,
    hash: &str,
    item_id: Option<&str>,
    position: Option<i32>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        hash = %hash,
        item_id = item_id,
        position = position,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "ITEM_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}

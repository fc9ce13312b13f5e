//! # Auto-Save Coordinator
//!
//! Turns a rapidly changing value into infrequent, serialized save calls
//! without ever losing the latest value.
//!
//! A coordinator watches a [`tokio::sync::watch`] value source. Each change
//! re-arms a trailing-edge debounce timer; when the timer fires the current
//! value is handed to a [`SaveHandler`]. At most one save is in flight at a
//! time, and a change that lands during a save results in exactly one more
//! save carrying the newest value once the first completes.
//!
//! ## State Machine
//!
//! ```text
//! Idle ──change──▶ PendingSave ──timer──▶ Saving ──ok──▶ Idle
//!                       ▲                   │
//!                       └──change/failure───┘
//! any ──teardown──▶ Closed
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use checklist_core::autosave::{save_fn, AutoSave, AutoSaveOptions};
//! use tokio::sync::watch;
//!
//! # async fn example() {
//! let (title, source) = watch::channel(String::from("Groceries"));
//! let autosave = AutoSave::spawn(
//!     source,
//!     save_fn(|title: String| async move {
//!         println!("saving {title}");
//!         Ok::<(), anyhow::Error>(())
//!     }),
//!     AutoSaveOptions::default(),
//! );
//!
//! title.send_replace(String::from("Groceries for Sunday"));
//! autosave.shutdown().await;
//! # }
//! ```

pub mod coordinator;
pub mod machine;

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::constants::autosave::{DEFAULT_DELAY, DEFAULT_RETRY_DELAY};

pub use coordinator::AutoSave;
pub use machine::{AutoSaveMachine, AutoSaveState, AutoSaveStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoSaveOptions {
    /// Quiet period after the last change before a save is issued
    pub delay: Duration,
    /// Issue one final save of unsaved changes on teardown
    pub flush_on_teardown: bool,
    /// Wait before retrying a failed save
    pub retry_delay: Duration,
}

impl Default for AutoSaveOptions {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            flush_on_teardown: true,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl AutoSaveOptions {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }
}

/// Persists one value; errors are logged by the coordinator and retried
#[async_trait]
pub trait SaveHandler<T: Send + 'static>: Send + Sync {
    async fn save(&self, value: T) -> anyhow::Result<()>;
}

/// [`SaveHandler`] backed by an async closure, built with [`save_fn`]
pub struct FnSaveHandler<F> {
    f: F,
}

#[async_trait]
impl<T, F, Fut> SaveHandler<T> for FnSaveHandler<F>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn save(&self, value: T) -> anyhow::Result<()> {
        (self.f)(value).await
    }
}

pub fn save_fn<F>(f: F) -> FnSaveHandler<F> {
    FnSaveHandler { f }
}

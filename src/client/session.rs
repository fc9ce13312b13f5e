//! Local mirror of one checklist.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{notify, ChecklistApi, Notice, NoticeSender};
use crate::autosave::{save_fn, AutoSave, AutoSaveOptions};
use crate::constants::autosave::{BULK_REFRESH_DELAY, REFRESH_RATE_LIMIT};
use crate::error::{ChecklistError, Result};
use crate::models::{Checklist, ChecklistItem};
use crate::sequencer;

/// Completion summary of a checklist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent; 0 for an empty checklist
    pub percent: u8,
}

impl Progress {
    pub fn of(items: &[ChecklistItem]) -> Self {
        let total = items.len();
        let completed = items.iter().filter(|item| item.is_checked).count();
        let percent = if total == 0 {
            0
        } else {
            ((completed * 100 + total / 2) / total) as u8
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

#[derive(Debug)]
struct SessionState {
    checklist: Checklist,
    items: Vec<ChecklistItem>,
    last_refresh: Option<Instant>,
    /// Bumped by every local list change; a fetch started before a bump is stale
    local_edits: u64,
}

/// Everything a refresh needs, shareable with the background refresher
#[derive(Clone)]
struct Refresher {
    api: Arc<dyn ChecklistApi>,
    hash: String,
    state: Arc<Mutex<SessionState>>,
    min_interval: Duration,
}

impl Refresher {
    async fn refresh(&self) -> Result<bool> {
        let edits_at_start = {
            let mut state = self.state.lock();
            let now = Instant::now();
            if state
                .last_refresh
                .is_some_and(|last| now.duration_since(last) < self.min_interval)
            {
                debug!(hash = %self.hash, "Skipping rate-limited refresh");
                return Ok(false);
            }
            // Claim the slot before fetching so concurrent refreshes back off
            state.last_refresh = Some(now);
            state.local_edits
        };

        let items = self.api.list_items(&self.hash).await?;
        let mut state = self.state.lock();
        if state.local_edits != edits_at_start {
            debug!(hash = %self.hash, "Discarding refresh overtaken by a local change");
            return Ok(false);
        }
        state.items = items;
        Ok(true)
    }
}

/// One open checklist: title, ordered items, and the operations a user
/// performs on them
pub struct ChecklistSession {
    refresher: Refresher,
    notices: NoticeSender,
    revision: watch::Sender<u64>,
}

impl std::fmt::Debug for ChecklistSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChecklistSession")
            .field("hash", &self.refresher.hash)
            .field("items", &self.refresher.state.lock().items.len())
            .finish_non_exhaustive()
    }
}

impl ChecklistSession {
    pub async fn open(
        api: Arc<dyn ChecklistApi>,
        hash: impl Into<String>,
        notices: NoticeSender,
    ) -> Result<Self> {
        let hash = hash.into();
        let loaded = api.get_checklist(&hash).await?;
        let state = SessionState {
            checklist: loaded.checklist,
            items: loaded.items,
            last_refresh: Some(Instant::now()),
            local_edits: 0,
        };

        Ok(Self {
            refresher: Refresher {
                api,
                hash,
                state: Arc::new(Mutex::new(state)),
                min_interval: REFRESH_RATE_LIMIT,
            },
            notices,
            revision: watch::channel(0).0,
        })
    }

    pub fn hash(&self) -> &str {
        &self.refresher.hash
    }

    pub fn checklist(&self) -> Checklist {
        self.refresher.state.lock().checklist.clone()
    }

    pub fn title(&self) -> String {
        self.refresher.state.lock().checklist.title.clone()
    }

    pub fn items(&self) -> Vec<ChecklistItem> {
        self.refresher.state.lock().items.clone()
    }

    pub fn progress(&self) -> Progress {
        Progress::of(&self.refresher.state.lock().items)
    }

    /// Reload the item list.
    ///
    /// Returns false when skipped by the rate limit, or when a local change
    /// landed while the list was in flight and the fetched copy was dropped.
    pub async fn refresh(&self) -> Result<bool> {
        self.refresher.refresh().await
    }

    /// Refresh the item list once local list changes have settled
    pub fn start_background_refresh(&self) -> AutoSave {
        let refresher = self.refresher.clone();
        AutoSave::spawn(
            self.revision.subscribe(),
            save_fn(move |_revision: u64| {
                let refresher = refresher.clone();
                async move {
                    refresher.refresh().await?;
                    Ok::<(), anyhow::Error>(())
                }
            }),
            AutoSaveOptions::with_delay(BULK_REFRESH_DELAY),
        )
    }

    /// Append an item; blank text is ignored and yields `None`
    pub async fn add_item(&self, text: &str) -> Result<Option<ChecklistItem>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        match self.refresher.api.add_item(self.hash(), text).await {
            Ok(item) => {
                {
                    let mut state = self.refresher.state.lock();
                    state.items.push(item.clone());
                    state.local_edits += 1;
                }
                self.bump_revision();
                Ok(Some(item))
            }
            Err(error) => {
                self.report("add item", &error);
                Err(error)
            }
        }
    }

    /// Delete on the server, then locally
    pub async fn delete_item(&self, item_id: Uuid) -> Result<()> {
        if let Err(error) = self.refresher.api.delete_item(self.hash(), item_id).await {
            self.report("delete item", &error);
            return Err(error);
        }

        {
            let mut state = self.refresher.state.lock();
            state.items.retain(|item| item.id != item_id);
            sequencer::renumber(&mut state.items);
            state.local_edits += 1;
        }
        self.bump_revision();
        Ok(())
    }

    /// Move the item at index `from` to index `to`.
    ///
    /// The local order changes immediately and stays changed even if the
    /// server rejects the new order; the failure is reported as a notice.
    pub async fn move_item(&self, from: usize, to: usize) -> Result<()> {
        let permutation = {
            let mut state = self.refresher.state.lock();
            let len = state.items.len();
            if from >= len || to >= len {
                return Err(ChecklistError::validation(format!(
                    "Cannot move item {from} to {to} in a list of {len}"
                )));
            }
            if from == to {
                return Ok(());
            }
            let item = state.items.remove(from);
            state.items.insert(to, item);
            sequencer::renumber(&mut state.items);
            state.local_edits += 1;
            sequencer::permutation_of(&state.items)
        };
        self.bump_revision();

        if let Err(error) = self
            .refresher
            .api
            .reorder_items(self.hash(), &permutation)
            .await
        {
            self.report("reorder items", &error);
            return Err(error);
        }
        Ok(())
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    fn report(&self, action: &str, error: &ChecklistError) {
        warn!(hash = %self.hash(), action, error = %error, "Checklist operation failed");
        notify(&self.notices, Notice::Error(format!("Failed to {action}")));
    }
}

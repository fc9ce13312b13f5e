//! Field editors backed by auto-save.
//!
//! Each editor owns the `watch` sender for its field. UI code writes through
//! the setters; the coordinator decides when a PATCH goes out.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::{notify, ChecklistApi, Notice, NoticeSender};
use crate::autosave::{AutoSave, AutoSaveOptions, AutoSaveStatus, SaveHandler};
use crate::constants::autosave::{CHECKBOX_DELAY, TEXT_DELAY};
use crate::models::{ChecklistItem, ItemPatch};

struct TitleSaver {
    api: Arc<dyn ChecklistApi>,
    hash: String,
    saved: Arc<Mutex<String>>,
    field: Arc<watch::Sender<String>>,
    notices: NoticeSender,
}

#[async_trait]
impl SaveHandler<String> for TitleSaver {
    async fn save(&self, title: String) -> anyhow::Result<()> {
        let saved = self.saved.lock().clone();
        if title.trim().is_empty() {
            debug!(hash = %self.hash, "Reverting blank title");
            self.field.send_replace(saved);
            return Ok(());
        }
        if title == saved {
            return Ok(());
        }

        match self.api.update_title(&self.hash, &title).await {
            Ok(checklist) => {
                *self.saved.lock() = checklist.title;
                notify(&self.notices, Notice::Success("Title saved".to_string()));
                Ok(())
            }
            Err(error) => {
                notify(&self.notices, Notice::Error("Failed to save title".to_string()));
                Err(error.into())
            }
        }
    }
}

/// Debounced checklist title editing
#[derive(Debug)]
pub struct TitleEditor {
    field: Arc<watch::Sender<String>>,
    saved: Arc<Mutex<String>>,
    autosave: AutoSave,
}

impl TitleEditor {
    pub fn spawn(
        api: Arc<dyn ChecklistApi>,
        hash: impl Into<String>,
        saved_title: impl Into<String>,
        notices: NoticeSender,
    ) -> Self {
        let saved_title = saved_title.into();
        let (sender, source) = watch::channel(saved_title.clone());
        let field = Arc::new(sender);
        let saved = Arc::new(Mutex::new(saved_title));

        let saver = TitleSaver {
            api,
            hash: hash.into(),
            saved: Arc::clone(&saved),
            field: Arc::clone(&field),
            notices,
        };
        let autosave = AutoSave::spawn(source, saver, AutoSaveOptions::with_delay(TEXT_DELAY));

        Self {
            field,
            saved,
            autosave,
        }
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.field.send_replace(title.into());
    }

    pub fn title(&self) -> String {
        self.field.borrow().clone()
    }

    /// Title as last confirmed by the server
    pub fn saved_title(&self) -> String {
        self.saved.lock().clone()
    }

    pub fn status(&self) -> AutoSaveStatus {
        self.autosave.status()
    }

    pub fn save_now(&self) {
        self.autosave.save_now();
    }

    pub async fn close(self) {
        self.autosave.shutdown().await;
    }
}

/// Saves one field of an item, reverting it when the server refuses
struct ItemFieldSaver<T> {
    api: Arc<dyn ChecklistApi>,
    hash: String,
    server: Arc<Mutex<ChecklistItem>>,
    field: Arc<watch::Sender<T>>,
    notices: NoticeSender,
    label: &'static str,
    read: fn(&ChecklistItem) -> T,
    patch: fn(T) -> ItemPatch,
}

#[async_trait]
impl<T> SaveHandler<T> for ItemFieldSaver<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    async fn save(&self, value: T) -> anyhow::Result<()> {
        let (item_id, server_value) = {
            let server = self.server.lock();
            (server.id, (self.read)(&*server))
        };
        if value == server_value {
            return Ok(());
        }

        match self
            .api
            .update_item(&self.hash, item_id, &(self.patch)(value))
            .await
        {
            Ok(updated) => {
                *self.server.lock() = updated;
                notify(
                    &self.notices,
                    Notice::Success(format!("Item {} saved", self.label)),
                );
                Ok(())
            }
            Err(error) => {
                warn!(%item_id, field = self.label, error = %error, "Reverting item field");
                notify(
                    &self.notices,
                    Notice::Error(format!("Failed to save item {}", self.label)),
                );
                self.field.send_replace(server_value);
                Err(error.into())
            }
        }
    }
}

/// Text and checkbox editing for one item
///
/// Text changes are debounced; checkbox changes are committed immediately.
#[derive(Debug)]
pub struct ItemEditor {
    text: Arc<watch::Sender<String>>,
    checked: Arc<watch::Sender<bool>>,
    server: Arc<Mutex<ChecklistItem>>,
    text_autosave: AutoSave,
    checked_autosave: AutoSave,
}

impl ItemEditor {
    pub fn spawn(
        api: Arc<dyn ChecklistApi>,
        hash: impl Into<String>,
        item: ChecklistItem,
        notices: NoticeSender,
    ) -> Self {
        let hash = hash.into();
        let (text_sender, text_source) = watch::channel(item.text.clone());
        let (checked_sender, checked_source) = watch::channel(item.is_checked);
        let text = Arc::new(text_sender);
        let checked = Arc::new(checked_sender);
        let server = Arc::new(Mutex::new(item));

        let text_saver = ItemFieldSaver {
            api: Arc::clone(&api),
            hash: hash.clone(),
            server: Arc::clone(&server),
            field: Arc::clone(&text),
            notices: notices.clone(),
            label: "text",
            read: |item: &ChecklistItem| item.text.clone(),
            patch: |text: String| ItemPatch::text(text),
        };
        let checked_saver = ItemFieldSaver {
            api,
            hash,
            server: Arc::clone(&server),
            field: Arc::clone(&checked),
            notices,
            label: "checkbox",
            read: |item: &ChecklistItem| item.is_checked,
            patch: ItemPatch::checked,
        };

        Self {
            text_autosave: AutoSave::spawn(
                text_source,
                text_saver,
                AutoSaveOptions::with_delay(TEXT_DELAY),
            ),
            checked_autosave: AutoSave::spawn(
                checked_source,
                checked_saver,
                AutoSaveOptions::with_delay(CHECKBOX_DELAY),
            ),
            text,
            checked,
            server,
        }
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.text.send_replace(text.into());
    }

    pub fn set_checked(&self, is_checked: bool) {
        self.checked.send_replace(is_checked);
    }

    pub fn toggle(&self) {
        self.checked.send_modify(|is_checked| *is_checked = !*is_checked);
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn is_checked(&self) -> bool {
        *self.checked.borrow()
    }

    /// Item as last returned by the server
    pub fn server_item(&self) -> ChecklistItem {
        self.server.lock().clone()
    }

    pub fn text_status(&self) -> AutoSaveStatus {
        self.text_autosave.status()
    }

    pub fn checked_status(&self) -> AutoSaveStatus {
        self.checked_autosave.status()
    }

    pub async fn close(self) {
        self.text_autosave.shutdown().await;
        self.checked_autosave.shutdown().await;
    }
}

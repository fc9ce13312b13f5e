use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

use checklist_core::client::ChecklistApi;
use checklist_core::error::{ChecklistError, Result};
use checklist_core::models::{
    Checklist, ChecklistItem, ChecklistSummary, ChecklistWithItems, ItemPatch, PositionUpdate,
};
use checklist_core::services::ChecklistService;

/// `ChecklistApi` served in-process by a service over the memory store,
/// with call counters and switchable failures
#[derive(Debug)]
pub struct InProcessApi {
    pub service: ChecklistService,
    pub fail_item_updates: AtomicBool,
    pub fail_reorders: AtomicBool,
    /// Delay between reading the item list and returning it
    pub list_latency_ms: AtomicU64,
    pub title_updates: AtomicUsize,
    pub item_updates: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub add_calls: AtomicUsize,
}

impl InProcessApi {
    pub fn new(service: ChecklistService) -> Self {
        Self {
            service,
            fail_item_updates: AtomicBool::new(false),
            fail_reorders: AtomicBool::new(false),
            list_latency_ms: AtomicU64::new(0),
            title_updates: AtomicUsize::new(0),
            item_updates: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            add_calls: AtomicUsize::new(0),
        }
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

fn injected() -> ChecklistError {
    ChecklistError::Api {
        status: 500,
        message: "Internal server error".to_string(),
    }
}

#[async_trait]
impl ChecklistApi for InProcessApi {
    async fn create_checklist(&self, title: Option<&str>) -> Result<ChecklistSummary> {
        let checklist = self.service.create_checklist(title).await?;
        Ok(ChecklistSummary::from(&checklist))
    }

    async fn get_checklist(&self, hash: &str) -> Result<ChecklistWithItems> {
        self.service.get_checklist(hash).await
    }

    async fn update_title(&self, hash: &str, title: &str) -> Result<Checklist> {
        self.title_updates.fetch_add(1, Ordering::SeqCst);
        self.service.update_title(hash, Some(title)).await
    }

    async fn list_items(&self, hash: &str) -> Result<Vec<ChecklistItem>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let items = self.service.list_items(hash).await?;
        let latency = self.list_latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        Ok(items)
    }

    async fn add_item(&self, hash: &str, text: &str) -> Result<ChecklistItem> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.service.add_item(hash, Some(text)).await
    }

    async fn update_item(
        &self,
        hash: &str,
        item_id: Uuid,
        patch: &ItemPatch,
    ) -> Result<ChecklistItem> {
        self.item_updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_item_updates.load(Ordering::SeqCst) {
            return Err(injected());
        }
        self.service.update_item(hash, item_id, patch).await
    }

    async fn delete_item(&self, hash: &str, item_id: Uuid) -> Result<()> {
        self.service.delete_item(hash, item_id).await
    }

    async fn reorder_items(&self, hash: &str, updates: &[PositionUpdate]) -> Result<()> {
        if self.fail_reorders.load(Ordering::SeqCst) {
            return Err(injected());
        }
        self.service.reorder_items(hash, updates).await
    }
}

#![allow(dead_code)]

pub mod fake_api;
pub mod strategies;
pub mod stores;

pub use fake_api::*;
pub use stores::*;

use std::sync::Arc;

use checklist_core::config::{ChecklistSettings, WebConfig};
use checklist_core::services::ChecklistService;
use checklist_core::store::{ChecklistStore, MemoryChecklistStore};

pub fn memory_service() -> ChecklistService {
    service_with(Arc::new(MemoryChecklistStore::new()))
}

pub fn service_with(store: Arc<dyn ChecklistStore>) -> ChecklistService {
    ChecklistService::new(store, ChecklistSettings::default())
}

pub fn test_web_config() -> WebConfig {
    WebConfig {
        bind_address: "127.0.0.1:0".to_string(),
        ..WebConfig::default()
    }
}

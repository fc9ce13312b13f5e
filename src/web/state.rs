//! # Web API Application State

use std::sync::Arc;

use crate::config::WebConfig;
use crate::services::ChecklistService;

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: ChecklistService,
    pub config: WebConfig,
}

impl AppState {
    pub fn new(service: ChecklistService, config: WebConfig) -> Arc<Self> {
        Arc::new(Self { service, config })
    }

    pub fn service(&self) -> &ChecklistService {
        &self.service
    }
}

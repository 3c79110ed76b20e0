use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::PortalStore;
use crate::services::PortalService;

/// Shared handler state; cloning only bumps reference counts
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service: Arc<PortalService>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn PortalStore>) -> Self {
        let service = PortalService::new(store, &config);
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }
}

use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::ContactStore;

/// Shared by every handler; read-only after startup apart from the pool
/// behind `store`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ContactStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ContactStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

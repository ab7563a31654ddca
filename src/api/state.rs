use std::sync::Arc;
use std::time::Instant;

use crate::bridge::ToolDispatcher;
use crate::config::Config;

/// Shared application state
pub struct AppState {
    pub dispatcher: Arc<ToolDispatcher>,
    pub config: Config,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(dispatcher: Arc<ToolDispatcher>, config: Config) -> Self {
        Self {
            dispatcher,
            config,
            started_at: Instant::now(),
        }
    }
}

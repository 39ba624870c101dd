//! Application state

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use crate::config::RelayConfig;

/// Shared server state
///
/// The reqwest client is the only shared resource; every relay invocation
/// opens its own upstream connection from its pool.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub http_client: reqwest::Client,
    /// Request count - AtomicU64 for lock-free access
    pub request_count: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config: Arc::new(config),
            http_client: reqwest::Client::new(),
            request_count: Arc::new(AtomicU64::new(0)),
        }
    }
}

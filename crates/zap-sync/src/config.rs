use std::time::Duration;

/// Polling cadence for the two refresh loops. The defaults are the product
/// behavior; tests shrink them.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub contact_interval: Duration,
    pub message_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            contact_interval: Duration::from_secs(10),
            message_interval: Duration::from_secs(3),
        }
    }
}

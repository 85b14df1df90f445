use std::sync::Arc;
use tokio::sync::Mutex;

use crate::webhook::{SyncAuditEvent, SyncAuditLogger};

/// Audit logger that keeps every event for later assertions.
///
/// Clones share the same event list.
#[derive(Debug, Clone, Default)]
pub struct RecordingAuditLogger {
    events: Arc<Mutex<Vec<SyncAuditEvent>>>,
}

impl RecordingAuditLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events logged so far, oldest first.
    pub async fn events(&self) -> Vec<SyncAuditEvent> {
        self.events.lock().await.clone()
    }
}

impl SyncAuditLogger for RecordingAuditLogger {
    async fn log(&self, event: SyncAuditEvent) {
        self.events.lock().await.push(event);
    }
}

//! Fire-and-forget reporting of domain actions to the external history
//! service.
//!
//! Every mutating and query operation emits one [`ActionRecord`]. Delivery
//! is advisory: the HTTP client posts from a detached task with a hard
//! 5-second timeout and no retries, and failures are logged and dropped.
//! A record can never fail or delay the operation that produced it.

use core_config::history::HistoryConfig;
use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;
use strum::Display;
use tracing::{debug, warn};

/// Hard cap on a single history request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Domain actions reported to the history service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    CreateProduct,
    CreateStore,
    CreateStock,
    IncreaseStock,
    DecreaseStock,
    DeleteProduct,
    GetStocksByFilters,
    GetProductsByFilters,
}

/// One action record, serialized as the history service's request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRecord {
    pub store_id: Option<i32>,
    pub plu: Option<String>,
    pub action: Action,
    pub description: String,
}

impl ActionRecord {
    pub fn new(
        store_id: Option<i32>,
        plu: Option<String>,
        action: Action,
        description: impl Into<String>,
    ) -> Self {
        Self {
            store_id,
            plu,
            action,
            description: description.into(),
        }
    }
}

/// Sink for action records.
///
/// `record` must return immediately and must never surface a failure to
/// the caller; delivery is best-effort by contract.
pub trait ActionHistory: Send + Sync {
    fn record(&self, record: ActionRecord);
}

/// HTTP client reporting actions to the configured history endpoint
#[derive(Clone)]
pub struct HistoryClient {
    client: reqwest::Client,
    url: String,
}

impl HistoryClient {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.clone(),
        }
    }

    async fn send(&self, record: &ActionRecord) -> Result<(), reqwest::Error> {
        self.client
            .post(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .json(record)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

impl ActionHistory for HistoryClient {
    fn record(&self, record: ActionRecord) {
        let client = self.clone();
        tokio::spawn(async move {
            match client.send(&record).await {
                Ok(()) => debug!(action = %record.action, "Reported action to history service"),
                Err(e) => warn!(
                    action = %record.action,
                    "Failed to report action to history service: {}", e
                ),
            }
        });
    }
}

/// In-process sink that keeps records in memory (for development/testing)
#[derive(Debug, Default)]
pub struct RecordingHistory {
    records: Mutex<Vec<ActionRecord>>,
}

impl RecordingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn records(&self) -> Vec<ActionRecord> {
        self.records.lock().expect("history lock poisoned").clone()
    }
}

impl ActionHistory for RecordingHistory {
    fn record(&self, record: ActionRecord) {
        self.records.lock().expect("history lock poisoned").push(record);
    }
}

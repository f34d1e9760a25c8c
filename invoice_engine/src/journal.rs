//! File-backed order journal.
//!
//! Two newline-delimited JSON logs under one directory: `orders.jsonl` (one [`OrderRecord`] per line)
//! and `verifications.jsonl` (one [`VerificationEvent`] per line). The order index is a materialized
//! view over the first log: it lives in memory, keyed by order id, and is rebuilt once at startup by
//! replaying the log line by line. The index and the log writes are owned by the same struct so the
//! two cannot diverge.
//!
//! Appends rely on the filesystem's atomic append of a single write call producing one line; there is
//! no explicit file locking. Malformed lines are skipped on load rather than aborting startup.

use std::{collections::HashMap, path::Path, sync::Arc};

use log::{debug, info, warn};
use tokio::{
    fs::OpenOptions,
    io::AsyncWriteExt,
    sync::RwLock,
};

use crate::{
    journal_types::{OrderId, OrderRecord, VerificationEvent},
    traits::{JournalError, OrderJournal},
};

const ORDERS_LOG: &str = "orders.jsonl";
const VERIFICATIONS_LOG: &str = "verifications.jsonl";

#[derive(Clone)]
pub struct JsonlJournal {
    orders_path: Arc<std::path::PathBuf>,
    events_path: Arc<std::path::PathBuf>,
    index: Arc<RwLock<HashMap<String, OrderRecord>>>,
}

impl JsonlJournal {
    /// Open (or create) the journal directory and rebuild the in-memory index from the order log.
    pub async fn open<P: AsRef<Path>>(dir: P) -> Result<Self, JournalError> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await.map_err(|e| JournalError::OpenError(e.to_string()))?;
        let orders_path = dir.join(ORDERS_LOG);
        let events_path = dir.join(VERIFICATIONS_LOG);
        let index = rebuild_index(&orders_path).await?;
        info!("📒️ Order journal open at {}. {} orders indexed.", dir.display(), index.len());
        Ok(Self {
            orders_path: Arc::new(orders_path),
            events_path: Arc::new(events_path),
            index: Arc::new(RwLock::new(index)),
        })
    }

    pub async fn order_count(&self) -> usize {
        self.index.read().await.len()
    }

    async fn append_line(path: &Path, line: &str) -> Result<(), JournalError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| JournalError::WriteError(e.to_string()))?;
        // One write call, one line. The trailing newline terminates the record.
        file.write_all(format!("{line}\n").as_bytes()).await.map_err(|e| JournalError::WriteError(e.to_string()))?;
        file.flush().await.map_err(|e| JournalError::WriteError(e.to_string()))
    }
}

async fn rebuild_index(orders_path: &Path) -> Result<HashMap<String, OrderRecord>, JournalError> {
    let mut index = HashMap::new();
    let contents = match tokio::fs::read_to_string(orders_path).await {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("📒️ No existing order log at {}. Starting with an empty index.", orders_path.display());
            return Ok(index);
        },
        Err(e) => return Err(JournalError::OpenError(e.to_string())),
    };
    for (line_no, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<OrderRecord>(line) {
            Ok(record) => {
                index.insert(record.order_id.to_string(), record);
            },
            Err(e) => {
                warn!("📒️ Skipping malformed order log line {}. {e}", line_no + 1);
            },
        }
    }
    Ok(index)
}

impl OrderJournal for JsonlJournal {
    async fn append(&self, record: OrderRecord) -> Result<(), JournalError> {
        let line = serde_json::to_string(&record).map_err(|e| JournalError::SerializationError(e.to_string()))?;
        // Durable line first, index second: a restart never reveals an order the log doesn't hold.
        Self::append_line(&self.orders_path, &line).await?;
        self.index.write().await.insert(record.order_id.to_string(), record);
        Ok(())
    }

    async fn lookup(&self, order_id: &OrderId) -> Option<OrderRecord> {
        self.index.read().await.get(order_id.as_str()).cloned()
    }

    async fn record_verification(&self, event: VerificationEvent) -> Result<(), JournalError> {
        let line = serde_json::to_string(&event).map_err(|e| JournalError::SerializationError(e.to_string()))?;
        Self::append_line(&self.events_path, &line).await
    }
}

use thiserror::Error;

use crate::journal_types::{OrderId, OrderRecord, VerificationEvent};

#[derive(Debug, Clone, Error)]
pub enum JournalError {
    #[error("Could not open the journal. {0}")]
    OpenError(String),
    #[error("Could not write to the journal. {0}")]
    WriteError(String),
    #[error("Could not serialize a journal record. {0}")]
    SerializationError(String),
}

/// The durable append-only record of orders and verification events, plus a derived in-memory index.
///
/// Both logs are strictly append-only. Records are immutable once written; appending the same
/// `order_id` twice is not expected in normal operation and resolves as last-writer-wins in the
/// index.
#[allow(async_fn_in_trait)]
pub trait OrderJournal {
    /// Write one order record to durable storage and update the in-memory index. A `WriteError`
    /// must not abort order creation: the gateway order already exists regardless, so callers log
    /// the error and move on.
    async fn append(&self, record: OrderRecord) -> Result<(), JournalError>;

    /// O(1) lookup against the in-memory index.
    async fn lookup(&self, order_id: &OrderId) -> Option<OrderRecord>;

    /// Append a verification event to the ledger. Failures are non-fatal; the caller logs them.
    async fn record_verification(&self, event: VerificationEvent) -> Result<(), JournalError>;
}

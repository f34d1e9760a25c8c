//! Invoice Fulfillment Engine
//!
//! The engine holds the core logic for turning a verified payment into a delivered invoice. It is
//! transport-agnostic: everything that talks to the outside world sits behind a trait.
//!
//! The library is divided into three main sections:
//! 1. The journal ([`mod@journal`]). An append-only newline-delimited JSON log of orders and verification
//!    events, with an in-memory index that is rebuilt by replaying the log at startup. You should never
//!    need to touch the log files directly; use the [`traits::OrderJournal`] interface instead.
//! 2. The collaborator seams ([`mod@traits`]). The invoice renderer, archival sink, notification sink and
//!    payment gateway are defined as traits so that concrete transports (REST APIs, SMTP, object stores)
//!    can be swapped out, and so that the orchestration logic can be tested against stubs.
//! 3. The fulfillment API ([`mod@fulfillment_api`]). The orchestrator that verifies a payment claim,
//!    resolves billing facts, renders the invoice and fans out to the configured sinks with
//!    partial-failure isolation.

pub mod fulfillment_api;
pub mod helpers;
pub mod journal;
pub mod journal_types;
pub mod traits;

pub use fulfillment_api::{FulfillmentApi, FulfillmentError, FulfillmentReceipt, PaymentClaim};
pub use journal::JsonlJournal;

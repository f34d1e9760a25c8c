//! # Collaborator seams
//!
//! This module defines the interface contracts between the fulfillment core and everything it talks
//! to. Concrete transports live in the server crate; the engine only sees these traits.
//!
//! * [`OrderJournal`] is the durable record of orders and verification events plus its in-memory
//!   derived index. The engine both reads (billing-fact resolution) and writes (order registration,
//!   verification ledger) through it.
//! * [`InvoiceRenderer`] turns billing facts into PDF bytes. It is the one collaborator whose failure
//!   is fatal to a verification request; without an artifact there is nothing to fan out.
//! * [`ArchivalSink`] and [`NotificationSink`] are the best-effort fan-out targets. Their errors must
//!   be contained at the invocation boundary and never alter the verification outcome.
//! * [`PaymentGateway`] is the order-creation proxy to the external payment processor.

mod gateway;
mod journal;
mod renderer;
mod sinks;

pub use gateway::{GatewayError, PaymentGateway};
pub use journal::{JournalError, OrderJournal};
pub use renderer::{InvoiceRenderer, RenderError};
pub use sinks::{ArchivalSink, NotificationSink, SinkError};

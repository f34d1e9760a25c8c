//! # Invoice fulfillment server
//! This crate hosts the HTTP surface of the invoice fulfillment gateway. It is responsible for:
//! Creating payment-gateway orders and journalling their billing facts.
//! Receiving payment-verification claims (client-submitted or gateway webhooks) and handing them to
//! the fulfillment engine.
//! Wiring the concrete integrations (payment gateway, invoice PDF renderer, archival upload,
//! transactional email) into the engine's trait seams.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/` and `/health`: liveness checks returning a 200 OK response.
//! * `/create-order`: create a gateway order and journal its billing facts.
//! * `/verify`: verify a payment claim and drive invoice fulfillment.
//! * `/webhook`: raw-body HMAC-checked gateway webhook events.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;

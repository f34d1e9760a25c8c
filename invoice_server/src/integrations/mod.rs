//! Concrete transports behind the engine's collaborator seams.
//!
//! Each integration owns its own `reqwest` client (built with a hard timeout) and maps transport
//! and remote failures into the engine's error types. The two best-effort sinks route their calls
//! through [`send_with_retry`], which retries transient failures a bounded number of times.

pub mod email;
pub mod github_archive;
pub mod pdf;
pub mod razorpay;

use std::time::Duration;

use invoice_engine::traits::SinkError;
use log::warn;
use reqwest::{RequestBuilder, Response};

/// Hard ceiling on any single outbound sink/gateway call.
pub(crate) const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_SEND_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF_MS: u64 = 500;

/// Send a request, retrying transport failures and 5xx responses with a short linear backoff.
/// 4xx responses are returned immediately; retrying a rejected request changes nothing.
pub(crate) async fn send_with_retry(request: RequestBuilder, what: &str) -> Result<Response, SinkError> {
    for attempt in 1..MAX_SEND_ATTEMPTS {
        // A non-cloneable (streaming) body gets a single attempt below.
        let Some(this_try) = request.try_clone() else { break };
        match this_try.send().await {
            Ok(response) if response.status().is_server_error() => {
                warn!("📤️ {what}: attempt {attempt}/{MAX_SEND_ATTEMPTS} returned {}.", response.status());
            },
            Ok(response) => return Ok(response),
            Err(e) => {
                warn!("📤️ {what}: attempt {attempt}/{MAX_SEND_ATTEMPTS} failed. {e}");
            },
        }
        tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS * u64::from(attempt))).await;
    }
    request.send().await.map_err(|e| SinkError::Transport(e.to_string()))
}

/// Map a non-success response into a `SinkError::Remote`, pulling whatever body text is available
/// into the message.
pub(crate) async fn reject_unsuccessful(response: Response, what: &str) -> Result<Response, SinkError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    warn!("📤️ {what} was rejected with {status}. {message}");
    Err(SinkError::Remote { status: status.as_u16(), message })
}

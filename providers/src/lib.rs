//! Model client for Sage.
//!
//! # Architecture
//!
//! The crate is organized around one injectable capability:
//!
//! - [`ModelClient`] - the single asynchronous call the engine requires:
//!   send a prompt string, receive a response string, fallibly
//! - [`GeminiClient`] - Google Gemini implementation (GenerateContent API)
//! - [`retry`] - exponential-backoff retry policy for transient transport
//!   failures
//!
//! The engine receives the client as an `Arc<dyn ModelClient>` so tests can
//! substitute a stub. Every call is latency-bearing and fallible, and the
//! returned text carries no guaranteed structure - callers must treat it as
//! an opaque string.
//!
//! # Error Handling
//!
//! Failures are typed by [`ModelError`]. Response bodies of failed calls
//! are read with a size cap and logged here; callers only see the status
//! class, never a structured cause they could be tempted to parse.

pub mod retry;

mod gemini;

pub use gemini::GeminiClient;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Canonical Gemini API base URL.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const CONNECT_TIMEOUT_SECS: u64 = 30;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 100;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// Why a model call failed.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Connection-level failure (DNS, TLS, timeout, aborted stream).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API answered with a non-success status after retries.
    #[error("API error {status}")]
    Api { status: u16 },
    /// The API answered 2xx but the payload contained no text.
    #[error("model returned an empty response")]
    EmptyResponse,
    /// The API answered 2xx but the payload did not have the expected shape.
    #[error("malformed response: {0}")]
    InvalidResponse(String),
}

/// The one capability Sage requires of a hosted model service.
///
/// Implementations must be safe to share across tasks; the engine holds
/// the client behind an `Arc` and calls it from command handlers, the
/// completion provider, and the debounced diagnostics trigger alike.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send `prompt` and return the response text.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

fn base_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
}

pub(crate) fn hardened_client() -> reqwest::Client {
    base_client_builder()
        .https_only(true)
        .build()
        .unwrap_or_else(|e| {
            tracing::error!(
                "Failed to build hardened HTTP client: {e}. Attempting minimal hardened fallback."
            );
            reqwest::Client::builder()
                .https_only(true)
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("Minimal hardened HTTP client must build; cannot proceed without TLS")
        })
}

/// Plaintext-capable client for explicitly overridden base URLs
/// (local mock servers). Otherwise configured like [`hardened_client`].
pub(crate) fn local_client() -> reqwest::Client {
    base_client_builder()
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

pub(crate) async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

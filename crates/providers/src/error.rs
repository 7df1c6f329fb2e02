//! Error taxonomy shared by all provider clients.

/// Errors from the external-collaborator layer.
///
/// Messages are surfaced verbatim on the job record, so each variant
/// renders as a human-readable sentence naming the failing provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("{provider} API error ({status}): {body}")]
    Api {
        /// Provider name, e.g. `"Gemini"`.
        provider: &'static str,
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider answered 2xx but the payload was not usable.
    #[error("{provider} returned a malformed response: {detail}")]
    Malformed {
        provider: &'static str,
        detail: String,
    },

    /// A local file read/write around a provider call failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An external tool invocation (yt-dlp) failed.
    #[error("{tool} failed: {detail}")]
    Tool {
        tool: &'static str,
        detail: String,
    },

    /// A long-running provider job did not finish in time.
    #[error("{provider} request timed out after {waited_secs}s")]
    Timeout {
        provider: &'static str,
        waited_secs: u64,
    },
}

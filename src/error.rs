// src/error.rs
// =============================================================================
// Errors at the network transport boundary.
//
// The rest of the library deliberately has no error taxonomy: a page
// without a title, a broken image or a cancelled download all end up as
// `None`. The transport is the one place where a real error exists, so we
// type it here, log it in the downloader, and then throw it away.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP request failed (DNS, TLS, timeout, invalid URL, ...)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The holder of the DownloadHandle cancelled the transfer
    #[error("transfer cancelled")]
    Cancelled,

    /// A failure from a Transport implementation that doesn't go through
    /// reqwest (a custom client, a cache, a test double, ...). The built-in
    /// ReqwestTransport never produces it.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    // Shorthand for third-party transports
    pub fn other(message: impl Into<String>) -> Self {
        TransportError::Other(message.into())
    }
}

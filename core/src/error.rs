//! Error types for the fetcher and the relay handler.
//!
//! # Design
//! Denials that are retried with a bypass token never surface here; a
//! `FetchError` is always terminal for the request that produced it.
//! Body-shape problems (non-JSON bodies, missing HTML) are not errors at
//! all and degrade to an empty record list.

/// Terminal outcome of a failed upstream fetch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// DNS, connect or timeout failure. Never retried.
    #[error("request could not be sent: {0}")]
    Transport(String),

    /// The transport produced no usable response.
    #[error("no response object returned")]
    NoResponse,

    /// Status >= 400 with no bypass token, or the retry budget ran out.
    #[error("server responded with status {status}")]
    Denied { status: u16, server: String },
}

/// Errors returned by `Relay::handle`.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Could not fetch remote content from ({url}). {source}.")]
    Upstream {
        url: String,
        #[source]
        source: FetchError,
    },
}

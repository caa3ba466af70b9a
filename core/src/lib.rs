//! Core of the showcase relay.
//!
//! # Overview
//! Fetches a creative-coding profile's showcase feed past an anti-bot cookie
//! challenge and turns the returned HTML into `ShowcaseRecord`s. Network I/O
//! is delegated to a `Transport`, so everything here runs the same against a
//! real upstream, a mock server or a scripted stub.
//!
//! # Design
//! - `extract` is a set of pure functions over HTML text.
//! - `ChallengeFetcher` retries denials in a bounded loop; its retry budget
//!   is a per-request `RetryState`, never shared state.
//! - `Relay` glues the two together for one inbound request.
//! - Requests and responses are plain data (`FetchOptions`, `HttpResponse`)
//!   with no framework types.

pub mod cookie;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod relay;
pub mod types;

pub use error::{FetchError, RelayError};
pub use extract::{extract, format_likes, page_html, sanitize};
pub use fetch::{ChallengeFetcher, RetryState, Transport, UpstreamOutcome, DEFAULT_RETRY_LIMIT};
pub use http::{FetchOptions, HttpMethod, HttpResponse};
pub use relay::Relay;
pub use types::{ShowcaseRecord, UpstreamSource};

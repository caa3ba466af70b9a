//! Challenge-aware upstream fetching.
//!
//! # Design
//! `ChallengeFetcher` owns a `Transport` and nothing mutable. Retry
//! bookkeeping lives in a `RetryState` the caller creates per inbound
//! request and passes in by `&mut`, so concurrent requests sharing one
//! fetcher never see each other's counters or cookies.
//!
//! A denial (status >= 400) that carries a bypass cookie is retried with that
//! cookie in place of the previous one, at most `limit` times. Anything else
//! ends the fetch.

use std::future::Future;

use crate::cookie::server_bypass_token;
use crate::error::FetchError;
use crate::http::{FetchOptions, HttpResponse};

/// Retries allowed after the first attempt.
pub const DEFAULT_RETRY_LIMIT: u32 = 3;

/// Result of one `ChallengeFetcher::fetch` call.
pub type UpstreamOutcome = Result<HttpResponse, FetchError>;

/// Executes a single upstream round-trip.
///
/// Implementations map connection-level failures to
/// `FetchError::Transport` and an unreadable response to
/// `FetchError::NoResponse`. Every status code, 4xx and 5xx included, is
/// returned as `Ok`.
pub trait Transport {
    fn send(&self, options: &FetchOptions) -> impl Future<Output = UpstreamOutcome> + Send;
}

/// Per-request retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    attempts: u32,
    limit: u32,
}

impl RetryState {
    pub fn new(limit: u32) -> Self {
        Self { attempts: 0, limit }
    }

    /// Retries spent so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    fn can_retry(&self) -> bool {
        self.attempts < self.limit
    }

    fn reset(&mut self) {
        self.attempts = 0;
    }
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_LIMIT)
    }
}

#[derive(Debug, Clone)]
pub struct ChallengeFetcher<T> {
    transport: T,
    retry_limit: u32,
}

impl<T: Transport> ChallengeFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            retry_limit: DEFAULT_RETRY_LIMIT,
        }
    }

    pub fn with_retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    /// A fresh budget for one inbound request.
    pub fn retry_state(&self) -> RetryState {
        RetryState::new(self.retry_limit)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `options.url`, answering anti-bot denials with their bypass cookie.
    ///
    /// Sends at most `retry.limit() + 1` requests. `options.headers` keeps the
    /// last cookie that was tried. `retry` is back at zero attempts whenever
    /// this returns.
    pub async fn fetch(&self, options: &mut FetchOptions, retry: &mut RetryState) -> UpstreamOutcome {
        loop {
            let response = match self.transport.send(options).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::warn!(
                        method = options.method.as_str(),
                        url = %options.url,
                        error = %err,
                        "upstream request failed"
                    );
                    retry.reset();
                    return Err(err);
                }
            };

            tracing::info!(
                method = options.method.as_str(),
                url = %options.url,
                status = response.status,
                server = response.server(),
                attempt = retry.attempts() + 1,
                "outgoing request"
            );

            if response.status < 400 {
                retry.reset();
                return Ok(response);
            }

            match server_bypass_token(&response) {
                Some(token) if retry.can_retry() => {
                    retry.attempts += 1;
                    tracing::debug!(
                        retry = retry.attempts(),
                        limit = retry.limit(),
                        "denied with bypass cookie, retrying"
                    );
                    options.set_header("cookie", &token);
                }
                _ => {
                    retry.reset();
                    return Err(FetchError::Denied {
                        status: response.status,
                        server: response.server().to_string(),
                    });
                }
            }
        }
    }
}

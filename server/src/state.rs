//! Application state shared across request handlers.

use std::sync::Arc;

use relay_core::{ChallengeFetcher, Relay};

use crate::config::Config;
use crate::transport::ReqwestTransport;

/// Holds only immutable data; per-request fetch state lives in the handler.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay<ReqwestTransport>>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let transport = ReqwestTransport::new(config.upstream_timeout)?;
        let fetcher = ChallengeFetcher::new(transport).with_retry_limit(config.retry_limit);
        let relay = Relay::new(fetcher, config.source.clone());

        tracing::info!(
            upstream = %config.source.feed_url,
            profile_base = %config.source.profile_base,
            "application state initialized"
        );

        Ok(Self {
            relay: Arc::new(relay),
        })
    }
}

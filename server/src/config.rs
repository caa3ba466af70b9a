//! Relay configuration.
//!
//! Only the listen port comes from the environment. Everything else has a
//! fixed default and is overridden in code (tests point `source` at a mock
//! upstream).

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use relay_core::{UpstreamSource, DEFAULT_RETRY_LIMIT};

pub const DEFAULT_PORT: u16 = 8080;

/// Upper bound on a single upstream round-trip.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT value: {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub source: UpstreamSource,
    pub upstream_timeout: Duration,
    pub retry_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            source: UpstreamSource::default(),
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            retry_limit: DEFAULT_RETRY_LIMIT,
        }
    }
}

impl Config {
    /// Defaults, with `PORT` applied when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("PORT") {
            config.port = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?;
        }

        tracing::info!(
            port = config.port,
            upstream = %config.source.feed_url,
            timeout_secs = config.upstream_timeout.as_secs(),
            retry_limit = config.retry_limit,
            "relay configuration loaded"
        );
        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

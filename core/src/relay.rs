//! The relay handler: caller cookie in, showcase records out.
//!
//! # Design
//! `Relay` is shared by every inbound request and holds only immutable
//! data. Each `handle` call builds its own `FetchOptions` and `RetryState`,
//! so the cookie a caller forwards is never seen by another caller.

use crate::cookie::client_bypass_token;
use crate::error::RelayError;
use crate::extract::{extract, page_html};
use crate::fetch::{ChallengeFetcher, Transport};
use crate::http::FetchOptions;
use crate::types::{ShowcaseRecord, UpstreamSource};

/// Browser-like headers the upstream expects before it serves the feed.
const BROWSER_HEADERS: &[(&str, &str)] = &[
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
    ),
    (
        "user-agent",
        "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/72.0.3626.96 Safari/537.36",
    ),
    ("upgrade-insecure-requests", "1"),
    ("cache-control", "no-cache"),
    ("pragma", "no-cache"),
    ("dnt", "1"),
];

pub struct Relay<T> {
    fetcher: ChallengeFetcher<T>,
    source: UpstreamSource,
}

impl<T: Transport> Relay<T> {
    pub fn new(fetcher: ChallengeFetcher<T>, source: UpstreamSource) -> Self {
        Self { fetcher, source }
    }

    pub fn source(&self) -> &UpstreamSource {
        &self.source
    }

    /// Upstream request for one inbound request, seeded with the caller's
    /// bypass cookie when it forwarded one.
    pub fn build_options(&self, client_cookie: Option<&str>) -> FetchOptions {
        let token = client_cookie.and_then(client_bypass_token).unwrap_or_default();
        let options = FetchOptions::get(&self.source.feed_url)
            .with_header("referer", &self.source.feed_url)
            .with_header("cookie", &token);

        BROWSER_HEADERS
            .iter()
            .fold(options, |options, (name, value)| options.with_header(name, value))
    }

    /// Fetch the feed and extract its records.
    ///
    /// A body that is not a JSON envelope with `page.html` is not an error;
    /// it produces an empty list.
    pub async fn handle(&self, client_cookie: Option<&str>) -> Result<Vec<ShowcaseRecord>, RelayError> {
        let mut options = self.build_options(client_cookie);
        let mut retry = self.fetcher.retry_state();

        let response = self
            .fetcher
            .fetch(&mut options, &mut retry)
            .await
            .map_err(|source| RelayError::Upstream {
                url: self.source.feed_url.clone(),
                source,
            })?;

        let records = match page_html(&response.body) {
            Some(html) => extract(&html, &self.source.profile_base),
            None => {
                tracing::debug!(url = %self.source.feed_url, "upstream body has no page html");
                Vec::new()
            }
        };
        Ok(records)
    }
}

//! reqwest-backed `Transport` for the live upstream.

use std::error::Error;
use std::future::Future;
use std::time::Duration;

use relay_core::{FetchError, FetchOptions, HttpMethod, HttpResponse, Transport, UpstreamOutcome};

/// Non-blocking upstream client. Redirects are followed by reqwest; every
/// final status is handed back to the fetcher as data.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, options: &FetchOptions) -> impl Future<Output = UpstreamOutcome> + Send {
        let method = match options.method {
            HttpMethod::Get => reqwest::Method::GET,
        };
        let mut request = self.client.request(method, options.url.as_str());
        for (name, value) in options.wire_headers() {
            request = request.header(name, value);
        }

        async move {
            let response = request
                .send()
                .await
                .map_err(|e| FetchError::Transport(send_failure_detail(&e)))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    let value = value.to_str().ok()?;
                    Some((name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response.text().await.map_err(|e| {
                tracing::debug!(error = %e, "upstream body unreadable");
                FetchError::NoResponse
            })?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}

/// reqwest's top-level message only names the URL; the cause (refused,
/// DNS, timed out) is further down the source chain.
fn send_failure_detail(err: &reqwest::Error) -> String {
    let mut detail = error_chain(err);
    if err.is_timeout() && !detail.contains("timed out") {
        detail.push_str(": operation timed out");
    }
    detail
}

/// `err` and each of its sources, joined with `": "`. Repeated messages
/// from wrapper layers are dropped.
fn error_chain(err: &dyn Error) -> String {
    let mut parts: Vec<String> = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        if !parts.iter().any(|part| part.contains(&message)) {
            parts.push(message);
        }
        source = cause.source();
    }
    parts.join(": ")
}

//! Stand-in for the challenge-protected showcase feed.
//!
//! Serves the fixture in `test-vectors/showcase.html` at `FEED_PATH`, behind
//! a configurable anti-bot challenge that denies with 403 and hands out a
//! bypass cookie the way the real upstream does.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;

pub const FEED_PATH: &str = "/rainner/pens/showcase/grid/";

/// Cookie handed out with every challenge denial.
pub const BYPASS_COOKIE: &str = "__cfduid=d41d8cd98f00b204e9800998ecf8427e";

pub const SHOWCASE_HTML: &str = include_str!("../../test-vectors/showcase.html");

const SERVER_NAME: &str = "cloudflare";

/// When the feed answers with a challenge instead of content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Challenge {
    Never,
    /// Deny the first `n` requests, then serve.
    Times(usize),
    /// Deny until the request carries `BYPASS_COOKIE`.
    UntilCookie,
    /// Deny every request, always offering the cookie.
    Always,
    /// Deny every request without offering a cookie.
    Blocked,
}

/// What a successful feed response carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Payload {
    /// `{"page":{"html": SHOWCASE_HTML}}`
    Envelope,
    /// `SHOWCASE_HTML` as `text/html`.
    RawHtml,
    /// `{"page":{}}`
    EmptyEnvelope,
}

#[derive(Serialize)]
struct Envelope<'a> {
    page: Page<'a>,
}

#[derive(Serialize)]
struct Page<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
}

#[derive(Clone, Debug)]
pub struct MockState {
    pub challenge: Challenge,
    pub payload: Payload,
    hits: Arc<AtomicUsize>,
}

impl MockState {
    pub fn new(challenge: Challenge, payload: Payload) -> Self {
        Self {
            challenge,
            payload,
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Requests received on the feed so far, across all clones.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn is_denied(&self, hit: usize, cookie: &str) -> bool {
        match self.challenge {
            Challenge::Never => false,
            Challenge::Times(n) => hit < n,
            Challenge::UntilCookie => !cookie.contains(BYPASS_COOKIE),
            Challenge::Always | Challenge::Blocked => true,
        }
    }
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route(FEED_PATH, get(feed))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn feed(State(state): State<MockState>, headers: HeaderMap) -> Response {
    let hit = state.hits.fetch_add(1, Ordering::SeqCst);
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if state.is_denied(hit, cookie) {
        tracing::debug!(hit, cookie, "challenge denied");
        return deny(state.challenge);
    }

    let server = [(header::SERVER, SERVER_NAME)];
    match state.payload {
        Payload::Envelope => {
            let body = Envelope {
                page: Page {
                    html: Some(SHOWCASE_HTML),
                },
            };
            (server, Json(body)).into_response()
        }
        Payload::RawHtml => (server, Html(SHOWCASE_HTML)).into_response(),
        Payload::EmptyEnvelope => {
            (server, Json(Envelope { page: Page { html: None } })).into_response()
        }
    }
}

fn deny(challenge: Challenge) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::SERVER, HeaderValue::from_static(SERVER_NAME));
    if challenge != Challenge::Blocked {
        let cookie = format!("{BYPASS_COOKIE}; path=/; domain=.codepen.io; HttpOnly");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            headers.append(header::SET_COOKIE, value);
        }
    }
    (StatusCode::FORBIDDEN, headers, "Access denied").into_response()
}

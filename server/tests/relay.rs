use std::time::Duration;

use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{Challenge, MockState, Payload, BYPASS_COOKIE, FEED_PATH};
use relay_core::{ShowcaseRecord, UpstreamSource};
use relay_server::{router, AppState, Config};
use tokio::net::TcpListener;
use tower::ServiceExt;

const PROFILE_BASE: &str = "https://codepen.io/rainner";

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn expected_records() -> Vec<ShowcaseRecord> {
    let vectors: serde_json::Value =
        serde_json::from_str(include_str!("../../test-vectors/showcase.json")).unwrap();
    serde_json::from_value(vectors["records"].clone()).unwrap()
}

/// Serve the mock upstream on a random port; returns its feed URL.
async fn spawn_upstream(state: MockState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener, state));
    format!("http://{addr}{FEED_PATH}")
}

fn config_for(feed_url: &str) -> Config {
    Config {
        source: UpstreamSource {
            feed_url: feed_url.to_string(),
            profile_base: PROFILE_BASE.to_string(),
        },
        upstream_timeout: Duration::from_secs(5),
        ..Config::default()
    }
}

fn app_for(feed_url: &str) -> axum::Router {
    router(AppState::new(&config_for(feed_url)).unwrap())
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::COOKIE, cookie)
        .body(String::new())
        .unwrap()
}

// --- home ---

#[tokio::test]
async fn home_is_plain_text() {
    let resp = app_for("http://127.0.0.1:9/").oneshot(get("/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert!(resp.headers()[http::header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(&body_bytes(resp).await[..], b"Nothing to see here.");
}

// --- relay success ---

#[tokio::test]
async fn relays_records_from_envelope() {
    let feed = spawn_upstream(MockState::new(Challenge::Never, Payload::Envelope)).await;
    let resp = app_for(&feed).oneshot(get("/codepen")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    let records: Vec<ShowcaseRecord> = serde_json::from_value(body_json(resp).await).unwrap();
    assert_eq!(records, expected_records());
}

#[tokio::test]
async fn relays_through_challenge() {
    let upstream = MockState::new(Challenge::UntilCookie, Payload::Envelope);
    let feed = spawn_upstream(upstream.clone()).await;
    let resp = app_for(&feed).oneshot(get("/codepen")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let records: Vec<ShowcaseRecord> = serde_json::from_value(body_json(resp).await).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(upstream.hits(), 2);
}

#[tokio::test]
async fn forwarded_client_cookie_skips_challenge() {
    let upstream = MockState::new(Challenge::UntilCookie, Payload::Envelope);
    let feed = spawn_upstream(upstream.clone()).await;
    let cookie = format!("theme=dark; {BYPASS_COOKIE}");
    let resp = app_for(&feed)
        .oneshot(get_with_cookie("/codepen", &cookie))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn raw_html_body_yields_empty_array() {
    let feed = spawn_upstream(MockState::new(Challenge::Never, Payload::RawHtml)).await;
    let resp = app_for(&feed).oneshot(get("/codepen")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::json!([]));
}

#[tokio::test]
async fn envelope_without_html_yields_empty_array() {
    let feed = spawn_upstream(MockState::new(Challenge::Never, Payload::EmptyEnvelope)).await;
    let resp = app_for(&feed).oneshot(get("/codepen")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::json!([]));
}

// --- relay failure ---

#[tokio::test]
async fn exhausted_retries_return_500() {
    let upstream = MockState::new(Challenge::Always, Payload::Envelope);
    let feed = spawn_upstream(upstream.clone()).await;
    let resp = app_for(&feed).oneshot(get("/codepen")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    let json = body_json(resp).await;
    assert_eq!(json["status"], 500);
    let error = json["error"].as_str().unwrap();
    assert!(error.contains(&feed));
    assert!(error.contains("server responded with status 403"));
    assert_eq!(upstream.hits(), 4);
}

#[tokio::test]
async fn unreachable_upstream_returns_500_with_url() {
    let feed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}{FEED_PATH}", listener.local_addr().unwrap())
    };
    let resp = app_for(&feed).oneshot(get("/codepen")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(resp).await;
    assert_eq!(json["status"], 500);
    let error = json["error"].as_str().unwrap();
    assert!(error.contains(&feed));
    assert!(error.contains("request could not be sent"));
}

#[tokio::test]
async fn hung_upstream_times_out_with_500() {
    // accepts connections and never answers
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let feed = format!("http://{}{FEED_PATH}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    let config = Config {
        upstream_timeout: Duration::from_secs(1),
        ..config_for(&feed)
    };
    let app = router(AppState::new(&config).unwrap());

    let started = std::time::Instant::now();
    let resp = app.oneshot(get("/codepen")).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(3));

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(resp).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.contains(&feed));
    assert!(error.contains("request could not be sent"));
    assert!(error.contains("timed out"), "got {error}");
}

// --- CORS ---

#[tokio::test]
async fn preflight_echoes_requested_method_and_headers() {
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/codepen")
        .header(http::header::ORIGIN, "https://example.com")
        .header("access-control-request-method", "GET")
        .header("access-control-request-headers", "x-custom, content-type")
        .body(String::new())
        .unwrap();
    let resp = app_for("http://127.0.0.1:9/").oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET");
    assert_eq!(headers["access-control-allow-headers"], "x-custom, content-type");
    assert!(body_bytes(resp).await.is_empty());
}

// --- isolation ---

#[tokio::test]
async fn concurrent_requests_keep_their_own_cookies() {
    let upstream = MockState::new(Challenge::UntilCookie, Payload::Envelope);
    let feed = spawn_upstream(upstream.clone()).await;
    let app = app_for(&feed);

    let (challenged, forwarded) = tokio::join!(
        app.clone().oneshot(get("/codepen")),
        app.clone().oneshot(get_with_cookie("/codepen", BYPASS_COOKIE)),
    );

    assert_eq!(challenged.unwrap().status(), StatusCode::OK);
    assert_eq!(forwarded.unwrap().status(), StatusCode::OK);
    // one denial plus retry for the first caller, a single hit for the second
    assert_eq!(upstream.hits(), 3);
}

#[tokio::test]
async fn denied_request_does_not_affect_next_one() {
    let upstream = MockState::new(Challenge::Times(4), Payload::Envelope);
    let feed = spawn_upstream(upstream.clone()).await;
    let app = app_for(&feed);

    // four denials exhaust the first request's budget
    let first = app.clone().oneshot(get("/codepen")).await.unwrap();
    assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // the next request starts with a full budget and succeeds at once
    let second = app.oneshot(get("/codepen")).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(upstream.hits(), 5);
}

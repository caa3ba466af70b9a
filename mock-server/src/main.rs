use mock_server::{Challenge, MockState, Payload, FEED_PATH};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(feed = %format!("http://{addr}{FEED_PATH}"), "mock upstream listening");
    mock_server::run(listener, MockState::new(Challenge::UntilCookie, Payload::Envelope)).await
}

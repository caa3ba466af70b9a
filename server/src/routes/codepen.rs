//! Showcase feed relay.

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, Uri};
use axum::Json;
use relay_core::ShowcaseRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// Fetch the upstream showcase feed and answer with its records.
///
/// A `__cfduid` cookie sent by the caller is forwarded upstream so a
/// previously solved challenge can be reused.
pub async fn codepen_feed(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Json<Vec<ShowcaseRecord>>, ApiError> {
    super::log_incoming(&method, &uri, &headers);

    let cookie = headers.get(header::COOKIE).and_then(|v| v.to_str().ok());
    let records = state.relay.handle(cookie).await?;

    tracing::info!(
        count = records.len(),
        upstream = %state.relay.source().feed_url,
        "showcase records relayed"
    );
    Ok(Json(records))
}

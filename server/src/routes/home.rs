//! Root placeholder.

use axum::http::{HeaderMap, Method, Uri};
use axum::response::IntoResponse;

pub async fn home(method: Method, uri: Uri, headers: HeaderMap) -> impl IntoResponse {
    super::log_incoming(&method, &uri, &headers);
    (
        [("content-type", "text/plain; charset=utf-8")],
        "Nothing to see here.",
    )
}

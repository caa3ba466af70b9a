//! Bypass-token scanning for cookie and set-cookie headers.

use crate::http::HttpResponse;

/// Substring that identifies the anti-bot challenge cookie.
pub const BYPASS_MARKER: &str = "__cfduid";

pub fn is_bypass_cookie(cookie: &str) -> bool {
    cookie.contains(BYPASS_MARKER)
}

/// Pick the bypass token out of a caller's `cookie` header.
pub fn client_bypass_token(cookie_header: &str) -> Option<String> {
    cookie_header
        .split(';')
        .map(str::trim)
        .find(|cookie| is_bypass_cookie(cookie))
        .map(str::to_string)
}

/// Pick the bypass token out of an upstream denial.
///
/// Only the `name=value` pair before the first `;` of each `set-cookie`
/// value is considered; attributes such as `path` or `HttpOnly` are dropped.
pub fn server_bypass_token(response: &HttpResponse) -> Option<String> {
    response
        .header_values("set-cookie")
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .find(|cookie| is_bypass_cookie(cookie))
        .map(str::to_string)
}

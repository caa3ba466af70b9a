//! Plain-data HTTP types shared by the fetcher and its transports.
//!
//! # Design
//! The core never touches a framework request or response. The fetcher
//! hands a `FetchOptions` to a `Transport`, and the transport hands back an
//! `HttpResponse` carrying only the status code, header list and body. This
//! keeps the retry protocol deterministic and lets tests script upstream
//! behavior without a socket.

/// HTTP method for an upstream request. The relay only ever reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// An upstream request described as plain data.
///
/// Header names compare case-insensitively. `headers` is mutated between
/// attempts, so `set_header` always overwrites an existing entry instead of
/// adding a second one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl FetchOptions {
    pub fn get(url: &str) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: Vec::new(),
        }
    }

    /// Builder-style `set_header`.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Replace the value of `name`, or append it if absent.
    pub fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Headers worth sending. An empty value (e.g. no cookie yet) stays in
    /// `headers` but is left off the wire.
    pub fn wire_headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// An upstream response described as plain data.
///
/// Header names are stored lower-case. Repeated headers such as
/// `set-cookie` keep one entry per value, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// First value of `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The responding server's identity, for logs.
    pub fn server(&self) -> &str {
        self.header("server").unwrap_or("n/a")
    }
}

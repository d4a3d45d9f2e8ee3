//! HTTP transport types shared by the client and its transports.
//!
//! # Design
//! Requests and responses are plain data. The client builds `HttpRequest`
//! values and classifies `HttpResponse` values; a `Transport` in between
//! performs the actual round-trip. Keeping the descriptor as data lets tests
//! hand the classifier any status/redirect/body combination without a
//! network.

use serde_json::Value;

/// HTTP method for a request. The admin API only reads with GET and
/// mutates with POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

/// The response descriptor handed back by a `Transport`.
///
/// `redirected` is true when one or more redirects were followed before this
/// response arrived; `url` is then the final location the body came from.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub redirected: bool,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Build a direct (non-redirected) response. Mostly useful for tests and
    /// transport doubles.
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            redirected: false,
            url: url.into(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Mark the response as having been reached through a redirect that
    /// ended at `url`.
    pub fn redirected_to(mut self, url: impl Into<String>) -> Self {
        self.redirected = true;
        self.url = url.into();
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

//! Error types for the admin API client.
//!
//! # Design
//! Every endpoint call ends in a payload or exactly one `ApiError`. A 404 and
//! an unparsable body each get two variants: reached directly, or reached
//! after the transport silently followed a redirect. The redirected variants
//! carry the final URL, which usually points at a login or maintenance page
//! rather than at the API.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::transport::TransportError;

/// Errors returned by `AdminClient` endpoint methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404 without any redirect.
    #[error("resource not found")]
    NotFound,

    /// The server returned 404 for a request that was redirected first.
    #[error("resource not found after redirect to {url}")]
    NotFoundAfterRedirect { url: String },

    /// The body was not valid JSON.
    #[error("response body is not valid JSON")]
    JsonParse,

    /// The body was not valid JSON and the request had been redirected.
    #[error("response body is not valid JSON after redirect to {url}")]
    JsonParseAfterRedirect { url: String },

    /// A state-changing request failed below HTTP (connection refused,
    /// blocked or excessive redirects, DNS). The cause is not kept.
    #[error("network request failed")]
    Network,

    /// Any other non-2xx status. `message` already embeds the status code.
    #[error("{message}")]
    Api {
        message: String,
        status: u16,
        payload: Value,
    },

    /// A read-only request failed below HTTP. The raw cause is kept.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Discriminant of an `ApiError`, for callers that pick a message by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    NotFoundAfterRedirect,
    JsonParse,
    JsonParseAfterRedirect,
    Network,
    Api,
    Transport,
    Serialization,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not-found",
            ErrorKind::NotFoundAfterRedirect => "not-found-after-redirect",
            ErrorKind::JsonParse => "json-parse",
            ErrorKind::JsonParseAfterRedirect => "json-parse-after-redirect",
            ErrorKind::Network => "network",
            ErrorKind::Api => "api",
            ErrorKind::Transport => "transport",
            ErrorKind::Serialization => "serialization",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound => ErrorKind::NotFound,
            ApiError::NotFoundAfterRedirect { .. } => ErrorKind::NotFoundAfterRedirect,
            ApiError::JsonParse => ErrorKind::JsonParse,
            ApiError::JsonParseAfterRedirect { .. } => ErrorKind::JsonParseAfterRedirect,
            ApiError::Network => ErrorKind::Network,
            ApiError::Api { .. } => ErrorKind::Api,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Human-readable message, identical to the `Display` output.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The final URL of a redirected request, for the `*AfterRedirect` kinds.
    pub fn url(&self) -> Option<&str> {
        match self {
            ApiError::NotFoundAfterRedirect { url } | ApiError::JsonParseAfterRedirect { url } => {
                Some(url.as_str())
            }
            _ => None,
        }
    }

    /// The decoded error body sent by the server, for `Api` failures.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::Api { payload, .. } => Some(payload),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::NotFound | ApiError::NotFoundAfterRedirect { .. } => Some(404),
            _ => None,
        }
    }

    /// True for the kinds that only happen after an invisible redirect.
    pub fn is_after_redirect(&self) -> bool {
        self.url().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redirected_kinds_carry_url() {
        let err = ApiError::NotFoundAfterRedirect {
            url: "https://x/login".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFoundAfterRedirect);
        assert_eq!(err.url(), Some("https://x/login"));
        assert!(err.is_after_redirect());
        assert!(err.payload().is_none());
    }

    #[test]
    fn direct_kinds_carry_nothing() {
        for err in [ApiError::NotFound, ApiError::JsonParse, ApiError::Network] {
            assert!(err.url().is_none());
            assert!(err.payload().is_none());
            assert!(!err.is_after_redirect());
        }
    }

    #[test]
    fn api_error_message_is_display() {
        let err = ApiError::Api {
            message: "bad (Status 500)".to_string(),
            status: 500,
            payload: json!({"message": "bad"}),
        };
        assert_eq!(err.message(), "bad (Status 500)");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.payload(), Some(&json!({"message": "bad"})));
    }

    #[test]
    fn transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ApiError::Transport(Box::new(io));
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "transport error: refused");
    }

    #[test]
    fn kind_names_are_kebab_case() {
        assert_eq!(ErrorKind::JsonParseAfterRedirect.to_string(), "json-parse-after-redirect");
        assert_eq!(ErrorKind::NotFound.as_str(), "not-found");
    }
}

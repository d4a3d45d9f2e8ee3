//! The injectable transport seam.
//!
//! `AdminClient` never talks to the network itself; it hands an `HttpRequest`
//! to a `Transport` and classifies whatever `HttpResponse` comes back. The
//! transport must follow redirects on its own and report whether it did.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Opaque failure raised by a transport below the HTTP layer.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Performs one HTTP round-trip.
///
/// Must return `Ok` for every response that carries a status code, including
/// 4xx and 5xx, and `Err` only for transport-level failures (DNS, refused
/// connections, rejected or excessive redirects).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Collapse any transport failure of a state-changing call into
/// `ApiError::Network`.
///
/// Transport error shapes differ between backends and cannot be inspected
/// reliably, so the cause is only logged.
pub fn normalize_network_error(error: TransportError) -> ApiError {
    tracing::debug!("Transport failed on state-changing request: {}", error);
    ApiError::Network
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_transport_error_becomes_network() {
        let errors: Vec<TransportError> = vec![
            Box::new(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused")),
            "too many redirects".into(),
            "cross-origin redirect rejected".into(),
        ];
        for error in errors {
            let normalized = normalize_network_error(error);
            assert!(matches!(normalized, ApiError::Network));
            assert_eq!(normalized.to_string(), "network request failed");
        }
    }
}

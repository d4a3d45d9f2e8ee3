//! Async client for a site admin REST API.
//!
//! # Overview
//! `AdminClient` exposes one method per admin endpoint (connection, modules,
//! settings, stats, site and plan data, notices, ...). Each call resolves to
//! the parsed JSON payload or to exactly one `ApiError`.
//!
//! # Design
//! - The network sits behind the `Transport` trait and is injected at
//!   construction; `ReqwestTransport` is the default implementation.
//! - `response::check_status` and `response::parse_json_response` hold all
//!   the decision logic. They tell a direct 404 or unparsable body apart from
//!   one reached through a silent redirect (typically a login or maintenance
//!   page), and report the final URL for the latter.
//! - Request specs, URLs and payload DTOs are plain data, so the pipeline can
//!   be driven from tests without a server.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
#[cfg(feature = "reqwest")]
pub mod reqwest_transport;
pub mod response;
pub mod transport;
pub mod types;

pub use client::AdminClient;
pub use config::{ClientConfig, ConfigError};
pub use endpoint::EndpointRequest;
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")]
pub use reqwest_transport::ReqwestTransport;
pub use transport::{Transport, TransportError};
pub use types::{JumpStartAction, StatsRange};

//! Endpoint request specs and URL assembly.
//!
//! An `EndpointRequest` names a resource below the versioned namespace and
//! optionally carries a serialized JSON body. GET is implied unless a body is
//! present. Leading and trailing slashes on the resource are ignored, so
//! `"/settings"` and `"settings"` address the same endpoint.

use serde::Serialize;

use crate::error::ApiError;
use crate::http::HttpMethod;

pub const API_VERSION: &str = "v4";
pub const CACHE_BUSTER_PARAM: &str = "_cacheBuster";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRequest {
    pub path: String,
    pub body: Option<String>,
}

impl EndpointRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: None,
        }
    }

    pub fn post<T: Serialize + ?Sized>(path: impl Into<String>, body: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(Self {
            path: path.into(),
            body: Some(body),
        })
    }

    pub fn method(&self) -> HttpMethod {
        if self.body.is_some() {
            HttpMethod::Post
        } else {
            HttpMethod::Get
        }
    }

    /// The resource path with surrounding slashes removed.
    pub fn resource(&self) -> &str {
        self.path.trim_matches('/')
    }
}

/// Join `<api_root>/<namespace>/v4/<resource>` with exactly one slash at
/// each seam.
pub fn endpoint_url(api_root: &str, namespace: &str, resource: &str) -> String {
    format!(
        "{}/{}/{API_VERSION}/{}",
        api_root.trim_end_matches('/'),
        namespace.trim_matches('/'),
        resource.trim_matches('/'),
    )
}

/// Append `_cacheBuster=<stamp>` after any existing query arguments.
pub fn add_cache_buster(url: &str, stamp: u128) -> String {
    let (base, query) = url.split_once('?').unwrap_or((url, ""));
    let mut args: Vec<String> = if query.is_empty() {
        Vec::new()
    } else {
        query.split('&').map(str::to_string).collect()
    };
    args.push(format!("{CACHE_BUSTER_PARAM}={stamp}"));
    format!("{base}?{}", args.join("&"))
}

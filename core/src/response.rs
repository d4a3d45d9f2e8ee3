//! Response classification and body parsing.
//!
//! # Design
//! Every endpoint runs `check_status` then `parse_json_response`. Status
//! alone is not enough: the transport follows redirects silently, so a 404
//! or an HTML body that arrived via a redirect is usually a login or
//! maintenance interstitial, not a real API answer. Both functions look at
//! the `redirected` flag and report those cases as their own variants.

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::http::HttpResponse;

/// Fallback used when an error body has no `message` field.
const UNKNOWN_MESSAGE: &str = "Unknown error";

/// Stats sections; an error from the upstream analytics service shows up as
/// a `response` key inside them.
const STATS_SECTIONS: [&str; 3] = ["general", "week", "month"];

/// Pass 2xx responses through and turn everything else into an `ApiError`.
pub fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }

    if response.status == 404 {
        let err = if response.redirected {
            ApiError::NotFoundAfterRedirect { url: response.url }
        } else {
            ApiError::NotFound
        };
        tracing::warn!("{}", err);
        return Err(err);
    }

    let status = response.status;
    let payload = parse_json_response(response)?;
    let message = format!("{} (Status {status})", server_message(&payload));
    tracing::warn!("API request failed: {}", message);
    Err(ApiError::Api {
        message,
        status,
        payload,
    })
}

/// Decode the body as JSON, without any schema check.
pub fn parse_json_response(response: HttpResponse) -> Result<Value, ApiError> {
    match response.json() {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::debug!("Response from {} is not JSON: {}", response.url, e);
            if response.redirected {
                Err(ApiError::JsonParseAfterRedirect { url: response.url })
            } else {
                Err(ApiError::JsonParse)
            }
        }
    }
}

/// Second decoding pass for payloads whose `data` field is a JSON document
/// serialized into a string.
pub fn decode_data_field(payload: Value) -> Result<Value, ApiError> {
    let data = payload
        .get("data")
        .and_then(Value::as_str)
        .ok_or(ApiError::JsonParse)?;
    serde_json::from_str(data).map_err(|e| {
        tracing::debug!("Nested data field is not JSON: {}", e);
        ApiError::JsonParse
    })
}

/// Replace a stats payload that only carries upstream analytics errors with
/// an empty object.
///
/// The payload is kept when at least one of `general`, `week` or `month` is
/// present, truthy, and has no `response` key.
pub fn repair_stats_response(payload: Value) -> Value {
    let usable = STATS_SECTIONS
        .iter()
        .filter_map(|section| payload.get(section))
        .any(|section| is_truthy(section) && section.get("response").is_none());

    if usable {
        payload
    } else {
        tracing::debug!("Stats payload reports an upstream error, returning empty stats");
        Value::Object(Map::new())
    }
}

fn server_message(payload: &Value) -> String {
    match payload.get("message") {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Null) | None => UNKNOWN_MESSAGE.to_string(),
        Some(other) => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

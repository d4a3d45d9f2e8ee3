//! Verify the response pipeline against JSON test vectors stored in
//! `test-vectors/`.
//!
//! Each vector describes a response descriptor and either the expected
//! payload or the expected failure kind with its URL, message and payload.

use serde_json::Value;
use siteadmin_core::response::{check_status, parse_json_response, repair_stats_response};
use siteadmin_core::{ApiError, HttpResponse};

fn descriptor(sim: &Value) -> HttpResponse {
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        redirected: sim["redirected"].as_bool().unwrap(),
        url: sim["url"].as_str().unwrap().to_string(),
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn run_pipeline(response: HttpResponse) -> Result<Value, ApiError> {
    let response = check_status(response)?;
    parse_json_response(response)
}

#[test]
fn classify_test_vectors() {
    let raw = include_str!("../../test-vectors/classify.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let result = run_pipeline(descriptor(&case["response"]));

        if let Some(expected) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(err.kind().as_str(), expected["kind"].as_str().unwrap(), "{name}: kind");
            assert_eq!(err.url(), expected["url"].as_str(), "{name}: url");
            if let Some(message) = expected.get("message") {
                assert_eq!(err.message(), message.as_str().unwrap(), "{name}: message");
            }
            assert_eq!(err.payload(), expected.get("payload"), "{name}: payload");
        } else {
            let value = result.unwrap();
            assert_eq!(value, case["expected_result"], "{name}: parsed result");
        }
    }
}

#[test]
fn stats_test_vectors() {
    let raw = include_str!("../../test-vectors/stats.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let repaired = repair_stats_response(case["input"].clone());
        assert_eq!(repaired, case["expected"], "{name}");
    }
}

//! Test helper utilities for journal-e2e integration tests
//!
//! Mounts a well-behaved backend and analysis service on wiremock servers and
//! builds harness configurations pointing at them.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use journal_e2e::config::{AnalysisConfig, BackendConfig, HarnessConfig, RunMode};
use journal_e2e::pacing::PacingPolicy;
use journal_e2e::session::{Credentials, SessionContext};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, header_exists, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.test-session-token";
pub const RECORD_ID: i64 = 42;

/// Pacing with no pauses and timeouts short enough for mocked services
pub fn create_fast_pacing() -> PacingPolicy {
    PacingPolicy {
        health_timeout: Duration::from_millis(500),
        request_timeout: Duration::from_millis(500),
        extended_timeout: Duration::from_millis(1_000),
        backend_analysis_delay: Duration::ZERO,
        direct_analysis_delay: Duration::ZERO,
    }
}

/// Configuration for `mode` pointing at the two mock servers
pub fn create_test_config(
    mode: RunMode,
    backend: &MockServer,
    analysis: &MockServer,
    email: &str,
) -> HarnessConfig {
    HarnessConfig {
        backend: BackendConfig {
            base_url: format!("{}/api", backend.uri()),
        },
        analysis: AnalysisConfig {
            base_url: format!("{}/api/v1", analysis.uri()),
            api_key: Some(TEST_API_KEY.to_string()),
        },
        pacing: create_fast_pacing(),
        credentials: Credentials::new(email, "Test123!"),
        mode,
        require_ai: false,
    }
}

pub fn create_session(config: &HarnessConfig) -> SessionContext {
    SessionContext::new(config.credentials.clone())
}

pub fn token_response(status: u16) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "success": true,
        "data": {
            "token": TEST_TOKEN,
            "user": { "id": 1, "email": "t1@test.com" }
        }
    }))
}

pub fn record_response(status: u16, severity: i64) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(record_body(severity))
}

pub fn record_body(severity: i64) -> Value {
    json!({
        "success": true,
        "data": {
            "id": RECORD_ID,
            "site": "chest",
            "severity": severity
        }
    })
}

pub fn backend_analysis_body() -> Value {
    json!({
        "success": true,
        "data": {
            "symptomSeverity": "high",
            "riskFactors": ["hypertension", "tachycardia"],
            "recommendations": ["Seek emergency care"],
            "redFlags": ["chest pain radiating to left arm"]
        }
    })
}

pub fn direct_analysis_body() -> Value {
    json!({
        "analysis": "Symptoms are consistent with acute coronary syndrome. Immediate evaluation is advised.",
        "confidence": 0.87
    })
}

pub async fn mount_backend_health(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(server)
        .await;
}

pub async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(token_response(201))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(token_response(200))
        .mount(server)
        .await;
}

/// Record routes that track a single record through update and delete.
///
/// The GET route returns the initial severity until an update has been
/// mounted over it; [`mount_record_lifecycle`] handles that ordering.
pub async fn mount_record_routes(server: &MockServer) {
    let bearer = format!("Bearer {TEST_TOKEN}");

    Mock::given(method("POST"))
        .and(path("/api/health-records"))
        .and(header("authorization", bearer.as_str()))
        .respond_with(record_response(201, 8))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/health-records"))
        .and(header("authorization", bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [record_body(8)["data"].clone()]
        })))
        .mount(server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/health-records/{RECORD_ID}")))
        .respond_with(record_response(200, 6))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/health-records/{RECORD_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Health record deleted"
        })))
        .mount(server)
        .await;
}

/// Single-record GETs in workflow order: severity 8, then 6, then 404.
pub async fn mount_record_lifecycle(server: &MockServer) {
    let record_path = format!("/api/health-records/{RECORD_ID}");

    Mock::given(method("GET"))
        .and(path(record_path.as_str()))
        .respond_with(record_response(200, 8))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(record_path.as_str()))
        .respond_with(record_response(200, 6))
        .up_to_n_times(1)
        .with_priority(2)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(record_path.as_str()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "error": "Health record not found"
        })))
        .with_priority(3)
        .mount(server)
        .await;
}

pub async fn mount_backend_analysis(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/analysis/[^/]+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(backend_analysis_body()))
        .mount(server)
        .await;
}

pub async fn mount_analysis_service(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/health"))
        .and(header("x-api-key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "healthy" })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/analyze"))
        .and(header_exists("x-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(direct_analysis_body()))
        .mount(server)
        .await;
}

/// A backend that behaves correctly for every route the full workflow uses.
pub async fn mount_happy_backend(server: &MockServer) {
    mount_backend_health(server).await;
    mount_auth(server).await;
    mount_record_routes(server).await;
    mount_record_lifecycle(server).await;
    mount_backend_analysis(server).await;
}

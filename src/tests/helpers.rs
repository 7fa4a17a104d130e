//! Test helper utilities for journal-e2e unit tests
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

#![allow(dead_code)]

use crate::config::{AnalysisConfig, BackendConfig};
use crate::error::FailureKind;
use crate::pacing::PacingPolicy;
use crate::session::{Credentials, SessionContext};
use crate::step::{Criticality, Services, StepId, StepResult};
use std::time::Duration;

/// Pacing with no pauses and short timeouts
pub fn create_fast_pacing() -> PacingPolicy {
    PacingPolicy {
        health_timeout: Duration::from_millis(200),
        request_timeout: Duration::from_millis(200),
        extended_timeout: Duration::from_millis(500),
        backend_analysis_delay: Duration::ZERO,
        direct_analysis_delay: Duration::ZERO,
    }
}

pub fn create_test_credentials() -> Credentials {
    Credentials::new("t1@test.com", "Test123!")
}

pub fn create_test_session() -> SessionContext {
    SessionContext::new(create_test_credentials())
}

/// Services pointing at an address nothing listens on
pub fn create_unreachable_services() -> Services {
    Services::new(
        BackendConfig {
            base_url: "http://127.0.0.1:9/api".to_string(),
        },
        AnalysisConfig {
            base_url: "http://127.0.0.1:9/api/v1".to_string(),
            api_key: Some("test-api-key".to_string()),
        },
    )
}

pub fn create_step_result(id: StepId, passed: bool, criticality: Criticality) -> StepResult {
    StepResult {
        id,
        name: id.display_name().to_string(),
        passed,
        criticality,
        detail: None,
        error: (!passed).then(|| "Unexpected status: expected 200, got 500".to_string()),
        failure: (!passed).then_some(FailureKind::UnexpectedStatus),
        elapsed: Duration::from_millis(5),
    }
}

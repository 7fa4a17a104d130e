//! Liveness checks

use super::require_api_key;
use crate::error::HarnessResult;
use crate::http::{HttpClient, HttpMethod};
use crate::session::SessionContext;
use crate::step::{Criticality, Services, Step, StepId};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// `GET /health` on the backend, expecting 200
#[derive(Debug, Clone, Default)]
pub struct BackendHealth;

#[async_trait]
impl Step for BackendHealth {
    fn id(&self) -> StepId {
        StepId::BackendHealth
    }

    fn criticality(&self) -> Criticality {
        Criticality::Required
    }

    async fn execute(
        &self,
        _ctx: &mut SessionContext,
        services: &Services,
        timeout: Duration,
    ) -> HarnessResult<Value> {
        let outcome = services
            .http
            .call(
                HttpMethod::Get,
                &services.backend_url("/health"),
                None,
                &HttpClient::json_headers(),
                timeout,
            )
            .await;
        outcome.expect_status(200)?;

        Ok(outcome
            .json()
            .cloned()
            .unwrap_or_else(|| json!({ "status": 200 })))
    }
}

/// `GET /health` on the analysis service with `X-API-Key`, expecting 200
#[derive(Debug, Clone)]
pub struct AnalysisHealth {
    pub criticality: Criticality,
}

#[async_trait]
impl Step for AnalysisHealth {
    fn id(&self) -> StepId {
        StepId::AnalysisHealth
    }

    fn criticality(&self) -> Criticality {
        self.criticality
    }

    async fn execute(
        &self,
        _ctx: &mut SessionContext,
        services: &Services,
        timeout: Duration,
    ) -> HarnessResult<Value> {
        let headers = HttpClient::api_key_headers(require_api_key(services)?)?;
        let outcome = services
            .http
            .call(
                HttpMethod::Get,
                &services.analysis_url("/health"),
                None,
                &headers,
                timeout,
            )
            .await;
        outcome.expect_status(200)?;

        Ok(outcome
            .json()
            .cloned()
            .unwrap_or_else(|| json!({ "status": 200 })))
    }
}

//! Analysis steps against the rate-limited AI pipeline
//!
//! Both calls can take a minute or more; the executor gives them the extended
//! timeout and the pause configured in [`PacingPolicy`](crate::pacing::PacingPolicy).

use super::require_api_key;
use crate::error::HarnessResult;
use crate::http::{HttpClient, HttpMethod};
use crate::response_shape::ResponseShape;
use crate::session::SessionContext;
use crate::step::{Criticality, Services, Step, StepId};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_ANALYSIS_QUERY: &str =
    "Patient with severe chest pain radiating to left arm, shortness of breath, BP 160/95";

const PREVIEW_CHARS: usize = 150;

/// `GET /analysis/{id}` on the backend, expecting 200 and the analysis fields
#[derive(Debug, Clone)]
pub struct AnalysisViaBackend {
    pub criticality: Criticality,
}

#[async_trait]
impl Step for AnalysisViaBackend {
    fn id(&self) -> StepId {
        StepId::AnalysisViaBackend
    }

    fn criticality(&self) -> Criticality {
        self.criticality
    }

    async fn execute(
        &self,
        ctx: &mut SessionContext,
        services: &Services,
        timeout: Duration,
    ) -> HarnessResult<Value> {
        let headers = HttpClient::bearer_headers(ctx.require_token()?)?;
        let id = ctx.require_resource_id()?;
        let outcome = services
            .http
            .call(
                HttpMethod::Get,
                &services.backend_url(&format!("/analysis/{id}")),
                None,
                &headers,
                timeout,
            )
            .await;
        let json = outcome.expect_json(200)?;

        ResponseShape::object(json, "/data")?;
        let severity = ResponseShape::field(json, "/data/symptomSeverity")?.clone();
        let risk_factors = ResponseShape::array(json, "/data/riskFactors")?;
        let recommendations = ResponseShape::array(json, "/data/recommendations")?;
        let red_flags = ResponseShape::array(json, "/data/redFlags")?;

        Ok(json!({
            "symptom_severity": severity,
            "risk_factors_count": risk_factors.len(),
            "recommendations_count": recommendations.len(),
            "red_flags_count": red_flags.len(),
        }))
    }
}

/// `POST /analyze` on the analysis service, expecting 200 and a non-empty
/// `analysis` string
#[derive(Debug, Clone)]
pub struct AnalysisDirect {
    pub criticality: Criticality,
    pub query: String,
}

impl AnalysisDirect {
    pub fn new(criticality: Criticality) -> Self {
        Self {
            criticality,
            query: DEFAULT_ANALYSIS_QUERY.to_string(),
        }
    }
}

#[async_trait]
impl Step for AnalysisDirect {
    fn id(&self) -> StepId {
        StepId::AnalysisDirect
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
        let body = json!({ "query": self.query });
        let outcome = services
            .http
            .call(
                HttpMethod::Post,
                &services.analysis_url("/analyze"),
                Some(&body),
                &headers,
                timeout,
            )
            .await;
        let json = outcome.expect_json(200)?;
        let analysis = ResponseShape::non_empty_str(json, "/analysis")?;

        Ok(json!({
            "analysis_length": analysis.chars().count(),
            "preview": analysis.chars().take(PREVIEW_CHARS).collect::<String>(),
        }))
    }
}

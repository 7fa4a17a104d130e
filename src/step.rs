//! Step abstraction and the executor that runs one step.
//!
//! A step is a value implementing [`Step`]: it performs one checked interaction
//! with a service and either returns a detail payload (pass) or a
//! [`HarnessError`] (fail). The [`StepExecutor`] applies pacing, measures the
//! step, converts any error into a failing [`StepResult`], prints the progress
//! line and hands the result to the aggregator. Nothing a step returns can stop
//! the run.

use crate::config::{AnalysisConfig, BackendConfig};
use crate::error::{ErrorSeverity, FailureKind, HarnessResult};
use crate::http::HttpClient;
use crate::logging::{log_info, log_warn};
use crate::pacing::RateLimitWaiter;
use crate::report::{render_step_line, ResultAggregator};
use crate::session::SessionContext;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Identity of every step a workflow can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StepId {
    BackendHealth,
    Register,
    Login,
    CreateRecord,
    ListRecords,
    GetRecord,
    UpdateRecord,
    VerifyUpdatedRecord,
    AnalysisHealth,
    AnalysisViaBackend,
    AnalysisDirect,
    DeleteRecord,
    VerifyRecordDeleted,
}

impl StepId {
    /// Human-readable name used in the report.
    pub fn display_name(self) -> &'static str {
        match self {
            StepId::BackendHealth => "Backend Health",
            StepId::Register => "User Registration",
            StepId::Login => "User Login",
            StepId::CreateRecord => "Create Health Record",
            StepId::ListRecords => "Get Health Records",
            StepId::GetRecord => "Get Single Record",
            StepId::UpdateRecord => "Update Health Record",
            StepId::VerifyUpdatedRecord => "Verify Updated Record",
            StepId::AnalysisHealth => "AI Service Health",
            StepId::AnalysisViaBackend => "AI Analysis (Backend)",
            StepId::AnalysisDirect => "Direct AI Analysis",
            StepId::DeleteRecord => "Delete Health Record",
            StepId::VerifyRecordDeleted => "Verify Record Deleted",
        }
    }

    /// Steps that touch the analysis service, directly or through the backend.
    pub fn is_ai(self) -> bool {
        matches!(
            self,
            StepId::AnalysisHealth | StepId::AnalysisViaBackend | StepId::AnalysisDirect
        )
    }

    /// Steps that wait on the throttled analysis pipeline.
    pub fn is_rate_limited(self) -> bool {
        matches!(self, StepId::AnalysisViaBackend | StepId::AnalysisDirect)
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Whether a step's failure fails the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Criticality {
    Required,
    BestEffort,
}

/// Immutable record of one executed step.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub id: StepId,
    pub name: String,
    pub passed: bool,
    pub criticality: Criticality,
    pub detail: Option<Value>,
    pub error: Option<String>,
    pub failure: Option<FailureKind>,
    pub elapsed: Duration,
}

impl StepResult {
    pub fn is_required(&self) -> bool {
        self.criticality == Criticality::Required
    }
}

/// External collaborators a step may call.
#[derive(Debug, Clone)]
pub struct Services {
    pub http: HttpClient,
    pub backend: BackendConfig,
    pub analysis: AnalysisConfig,
}

impl Services {
    pub fn new(backend: BackendConfig, analysis: AnalysisConfig) -> Self {
        Self {
            http: HttpClient::new(),
            backend,
            analysis,
        }
    }

    /// Absolute backend URL for `path` (which starts with `/`).
    pub fn backend_url(&self, path: &str) -> String {
        join_url(&self.backend.base_url, path)
    }

    /// Absolute analysis service URL for `path` (which starts with `/`).
    pub fn analysis_url(&self, path: &str) -> String {
        join_url(&self.analysis.base_url, path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// One checked interaction with a service.
///
/// Implementations check their session prerequisites first (through the
/// `require_*` gates) and only then issue their call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Step: Send + Sync {
    fn id(&self) -> StepId;

    fn criticality(&self) -> Criticality;

    /// Perform the call and validate the response.
    ///
    /// Returns a detail payload on success.
    async fn execute(
        &self,
        ctx: &mut SessionContext,
        services: &Services,
        timeout: Duration,
    ) -> HarnessResult<Value>;
}

/// Runs individual steps against shared services.
#[derive(Debug)]
pub struct StepExecutor<'a> {
    services: &'a Services,
    waiter: &'a RateLimitWaiter,
}

impl<'a> StepExecutor<'a> {
    pub fn new(services: &'a Services, waiter: &'a RateLimitWaiter) -> Self {
        Self { services, waiter }
    }

    /// Execute `step` and convert its outcome into a [`StepResult`].
    pub async fn execute(&self, step: &dyn Step, ctx: &mut SessionContext) -> StepResult {
        let id = step.id();
        let criticality = step.criticality();
        self.waiter.pace(id).await;

        let started = Instant::now();
        let outcome = step
            .execute(ctx, self.services, self.waiter.timeout_for(id))
            .await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(detail) => {
                log_info!(
                    step = %id,
                    passed = true,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Step passed"
                );
                StepResult {
                    id,
                    name: id.display_name().to_string(),
                    passed: true,
                    criticality,
                    detail: (!detail.is_null()).then_some(detail),
                    error: None,
                    failure: None,
                    elapsed,
                }
            }
            Err(error) => {
                // Dependency failures log at INFO, service failures at WARN.
                match error.severity() {
                    ErrorSeverity::Warning => log_info!(
                        step = %id,
                        passed = false,
                        failure = %error.kind(),
                        dependency_failure = error.is_dependency_failure(),
                        error = %error,
                        "Step failed on missing session state"
                    ),
                    ErrorSeverity::Error | ErrorSeverity::Critical => log_warn!(
                        step = %id,
                        passed = false,
                        failure = %error.kind(),
                        error = %error,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Step failed"
                    ),
                }
                StepResult {
                    id,
                    name: id.display_name().to_string(),
                    passed: false,
                    criticality,
                    detail: None,
                    error: Some(error.to_string()),
                    failure: Some(error.kind()),
                    elapsed,
                }
            }
        }
    }

    /// Execute `step`, print its progress line and record the result.
    ///
    /// Returns whether the step passed.
    pub async fn run_step(
        &self,
        step: &dyn Step,
        ctx: &mut SessionContext,
        results: &mut ResultAggregator,
    ) -> bool {
        let result = self.execute(step, ctx).await;
        println!("{}", render_step_line(&result));
        let passed = result.passed;
        results.record(result);
        passed
    }
}

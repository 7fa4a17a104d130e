//! Workflow definitions and the sequential runner.
//!
//! A [`Workflow`] is an ordered list of [`Step`] values; one definition per
//! [`RunMode`]. The [`WorkflowRunner`] executes every declared step in order,
//! whatever happened before: a step whose prerequisite was never produced
//! records a MissingPrerequisite failure and the run moves on.

use crate::config::{HarnessConfig, RunMode};
use crate::logging::log_info;
use crate::pacing::RateLimitWaiter;
use crate::report::{ResultAggregator, RunSummary};
use crate::session::SessionContext;
use crate::step::{Criticality, Services, Step, StepExecutor, StepId};
use crate::steps::{
    AnalysisDirect, AnalysisHealth, AnalysisViaBackend, BackendHealth, CreateRecord, DeleteRecord,
    GetRecord, ListRecords, Login, Register, UpdateRecord, VerifyRecordDeleted,
};

/// Ordered step list for one run.
pub struct Workflow {
    mode: RunMode,
    steps: Vec<Box<dyn Step>>,
}

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("mode", &self.mode)
            .field("steps", &self.step_ids())
            .finish()
    }
}

impl Workflow {
    /// Definition for `mode`. AI steps are best-effort unless `require_ai`
    /// is set; the MVP run always requires them.
    pub fn for_mode(mode: RunMode, require_ai: bool) -> Self {
        let ai = if require_ai || mode == RunMode::Mvp {
            Criticality::Required
        } else {
            Criticality::BestEffort
        };

        match mode {
            RunMode::Full => Self::full(ai),
            RunMode::BackendOnly => Self::backend_only(),
            RunMode::Mvp => Self::mvp(),
        }
    }

    /// Backend CRUD with the AI steps between the update and the delete.
    pub fn full(ai: Criticality) -> Self {
        let steps: Vec<Box<dyn Step>> = vec![
            Box::new(BackendHealth),
            Box::new(Register),
            Box::new(Login),
            Box::new(CreateRecord),
            Box::new(ListRecords),
            Box::new(GetRecord::after_create()),
            Box::new(UpdateRecord),
            Box::new(GetRecord::after_update()),
            Box::new(AnalysisHealth { criticality: ai }),
            Box::new(AnalysisViaBackend { criticality: ai }),
            Box::new(AnalysisDirect::new(ai)),
            Box::new(DeleteRecord),
            Box::new(VerifyRecordDeleted),
        ];
        Self::from_steps(RunMode::Full, steps)
    }

    pub fn backend_only() -> Self {
        let steps: Vec<Box<dyn Step>> = vec![
            Box::new(BackendHealth),
            Box::new(Register),
            Box::new(Login),
            Box::new(CreateRecord),
            Box::new(ListRecords),
            Box::new(GetRecord::after_create()),
            Box::new(UpdateRecord),
            Box::new(GetRecord::after_update()),
            Box::new(DeleteRecord),
            Box::new(VerifyRecordDeleted),
        ];
        Self::from_steps(RunMode::BackendOnly, steps)
    }

    /// Smoke run: both health checks, direct analysis, then one record
    /// analysed through the backend.
    pub fn mvp() -> Self {
        let ai = Criticality::Required;
        let steps: Vec<Box<dyn Step>> = vec![
            Box::new(BackendHealth),
            Box::new(AnalysisHealth { criticality: ai }),
            Box::new(AnalysisDirect::new(ai)),
            Box::new(Register),
            Box::new(CreateRecord),
            Box::new(AnalysisViaBackend { criticality: ai }),
        ];
        Self::from_steps(RunMode::Mvp, steps)
    }

    pub fn from_steps(mode: RunMode, steps: Vec<Box<dyn Step>>) -> Self {
        Self { mode, steps }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn steps(&self) -> &[Box<dyn Step>] {
        &self.steps
    }

    pub fn step_ids(&self) -> Vec<StepId> {
        self.steps.iter().map(|s| s.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Drives one workflow against one session.
#[derive(Debug)]
pub struct WorkflowRunner {
    services: Services,
    waiter: RateLimitWaiter,
    workflow: Workflow,
}

impl WorkflowRunner {
    pub fn new(services: Services, waiter: RateLimitWaiter, workflow: Workflow) -> Self {
        Self {
            services,
            waiter,
            workflow,
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(
            Services::new(config.backend.clone(), config.analysis.clone()),
            RateLimitWaiter::new(config.pacing.clone()),
            Workflow::for_mode(config.mode, config.require_ai),
        )
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Execute every declared step in order and summarise the results.
    pub async fn run(&self, ctx: &mut SessionContext) -> RunSummary {
        let executor = StepExecutor::new(&self.services, &self.waiter);
        let mut results = ResultAggregator::new();

        log_info!(
            mode = %self.workflow.mode(),
            steps = self.workflow.len(),
            user = %ctx.user_identity(),
            "Starting workflow"
        );

        for step in &self.workflow.steps {
            executor.run_step(step.as_ref(), ctx, &mut results).await;
        }

        let summary = results.summary();
        log_info!(
            passed = summary.passed_count,
            total = summary.total_count,
            required_failures = summary.required_failures,
            "Workflow finished"
        );
        summary
    }
}

//! # journal-e2e
//!
//! End-to-end integration harness for the health journal backend and its AI
//! analysis service.
//!
//! ## Key Features
//!
//! - **Session threading**: one [`SessionContext`] carries the auth token and
//!   the created record id from step to step
//! - **Precondition gates**: dependent steps fail fast with a
//!   MissingPrerequisite result instead of sending malformed requests
//! - **Partial-failure tolerance**: every declared step always runs and is
//!   always recorded
//! - **Rate-limit pacing**: fixed pauses and extended timeouts for the
//!   analysis calls
//! - **Deterministic report**: ordered results, a verdict banner, and an exit
//!   code driven by required steps only
//!
//! ## Example
//!
//! ```rust,no_run
//! use journal_e2e::{HarnessConfig, RunMode, SessionContext, WorkflowRunner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = HarnessConfig::for_mode(RunMode::BackendOnly);
//! config.validate()?;
//!
//! let runner = WorkflowRunner::from_config(&config);
//! let mut ctx = SessionContext::new(config.credentials.clone());
//! let summary = runner.run(&mut ctx).await;
//! std::process::exit(summary.exit_code());
//! # }
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

pub mod logging;

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod http;
pub mod pacing;
pub mod report;
pub(crate) mod response_shape;
pub mod session;
pub mod step;
pub mod steps;
pub mod workflow;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use config::{AnalysisConfig, BackendConfig, HarnessConfig, RunMode, ServiceConfig};
pub use error::{FailureKind, HarnessError, HarnessResult};
pub use http::{HttpClient, HttpMethod, HttpOutcome, ResponseBody};
pub use pacing::{PacingPolicy, RateLimitWaiter};
pub use report::{ResultAggregator, RunSummary, Verdict};
pub use session::{Credentials, SessionContext};
pub use step::{Criticality, Services, Step, StepExecutor, StepId, StepResult};
pub use workflow::{Workflow, WorkflowRunner};

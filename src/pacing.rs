//! Static pacing for the rate-limited analysis dependency
//!
//! The analysis service throttles callers and can take well over a minute per
//! request. Steps that reach it get:
//! - a fixed pause before dispatch (3s before analysis via backend, 5s before
//!   direct analysis in the full workflow)
//! - an extended per-call timeout (120s) instead of the CRUD timeout (10s)
//!
//! The policy is keyed by step identity and never adapts to responses; a
//! single attempt is made per step.

use crate::logging::log_info;
use crate::step::StepId;

use std::time::Duration;
use tokio::time::sleep;

/// Timeouts and pauses applied per step
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PacingPolicy {
    /// Timeout for liveness checks against the backend
    pub health_timeout: Duration,
    /// Timeout for auth and CRUD calls
    pub request_timeout: Duration,
    /// Timeout ceiling for calls that reach the analysis service
    pub extended_timeout: Duration,
    /// Pause before asking the backend for an analysis
    pub backend_analysis_delay: Duration,
    /// Pause before calling the analysis service directly
    pub direct_analysis_delay: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            health_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            extended_timeout: Duration::from_secs(120),
            backend_analysis_delay: Duration::from_secs(3),
            direct_analysis_delay: Duration::from_secs(5),
        }
    }
}

impl PacingPolicy {
    /// Lighter pacing for the MVP smoke run: one short pause, 30s ceiling.
    pub fn mvp() -> Self {
        Self {
            extended_timeout: Duration::from_secs(30),
            backend_analysis_delay: Duration::from_secs(1),
            direct_analysis_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// No pauses at all; timeouts unchanged.
    pub fn without_delays(mut self) -> Self {
        self.backend_analysis_delay = Duration::ZERO;
        self.direct_analysis_delay = Duration::ZERO;
        self
    }
}

/// Applies a [`PacingPolicy`] around step dispatch
#[derive(Debug, Clone, Default)]
pub struct RateLimitWaiter {
    policy: PacingPolicy,
}

impl RateLimitWaiter {
    pub fn new(policy: PacingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PacingPolicy {
        &self.policy
    }

    /// Pause owed before dispatching `step`.
    pub fn delay_for(&self, step: StepId) -> Duration {
        match step {
            StepId::AnalysisViaBackend => self.policy.backend_analysis_delay,
            StepId::AnalysisDirect => self.policy.direct_analysis_delay,
            _ => Duration::ZERO,
        }
    }

    /// Per-call timeout for `step`.
    pub fn timeout_for(&self, step: StepId) -> Duration {
        if step.is_rate_limited() {
            return self.policy.extended_timeout;
        }
        match step {
            StepId::BackendHealth => self.policy.health_timeout,
            _ => self.policy.request_timeout,
        }
    }

    /// Sleep for the pause owed before `step`, if any.
    pub async fn pace(&self, step: StepId) {
        let delay = self.delay_for(step);
        if delay.is_zero() {
            return;
        }

        log_info!(
            step = %step,
            delay_ms = delay.as_millis() as u64,
            timeout_seconds = self.timeout_for(step).as_secs(),
            "Pacing before rate-limited call"
        );
        sleep(delay).await;
    }
}

//! Error types for harness steps.
//!
//! Every way a step can fail maps onto one [`HarnessError`] variant. The step
//! executor turns these into failing [`StepResult`](crate::step::StepResult)s;
//! none of them ever aborts a run.
//!
//! # Error Kinds
//!
//! | Variant | Kind | Raised when |
//! |---------|------|-------------|
//! | `TransportFailure` | Transport | connection refused, DNS failure, timeout |
//! | `UnexpectedStatus` | UnexpectedStatus | status code differs from the documented one |
//! | `MalformedBody` | MalformedBody | status matched but a required field is missing |
//! | `MissingPrerequisite` | MissingPrerequisite | session lacks a token or resource id |
//! | `ConfigurationError` | Configuration | invalid harness settings (startup only) |
//!
//! # Example
//!
//! ```rust
//! use journal_e2e::{HarnessError, error::FailureKind};
//!
//! let err = HarnessError::missing_prerequisite("auth token");
//! assert_eq!(err.kind(), FailureKind::MissingPrerequisite);
//! assert!(err.is_dependency_failure());
//! ```

use crate::logging::{log_error, log_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a step failure, recorded on each failing result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The request never produced a response.
    Transport,
    /// A response arrived with the wrong status code.
    UnexpectedStatus,
    /// The status matched but the payload did not have the documented shape.
    MalformedBody,
    /// A dependent step ran without the session state it needs.
    MissingPrerequisite,
    /// Harness settings were invalid.
    Configuration,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::Transport => "transport",
            FailureKind::UnexpectedStatus => "unexpected_status",
            FailureKind::MalformedBody => "malformed_body",
            FailureKind::MissingPrerequisite => "missing_prerequisite",
            FailureKind::Configuration => "configuration",
        };
        f.write_str(label)
    }
}

/// Severity level for logging decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// The harness itself cannot run.
    Critical,
    /// A service misbehaved or could not be reached.
    Error,
    /// Expected fallout of an earlier failure.
    Warning,
}

/// Convenient result type for harness operations.
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;

/// Errors a step (or harness startup) can produce.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The HTTP call never got a response.
    #[error("Transport failure: {message}")]
    TransportFailure {
        /// Description from the HTTP client.
        message: String,
        /// Whether the per-call timeout expired.
        timed_out: bool,
    },

    /// The service answered with a status code other than the documented one.
    #[error("Unexpected status: expected {expected}, got {actual}{}", format_body(.body))]
    UnexpectedStatus {
        /// Documented status for the operation.
        expected: u16,
        /// Status actually returned.
        actual: u16,
        /// Truncated response body, when one was returned.
        body: Option<String>,
    },

    /// The status matched but the body lacked a required field.
    #[error("Malformed body: {message}")]
    MalformedBody {
        /// Which field or shape was wrong.
        message: String,
    },

    /// A dependent step found its session prerequisite absent.
    #[error("Missing prerequisite: {prerequisite}")]
    MissingPrerequisite {
        /// Name of the missing session value.
        prerequisite: String,
    },

    /// Harness settings are invalid.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },
}

fn format_body(body: &Option<String>) -> String {
    match body {
        Some(text) if !text.is_empty() => format!(" ({text})"),
        _ => String::new(),
    }
}

impl HarnessError {
    /// Classification recorded on the failing step result.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::TransportFailure { .. } => FailureKind::Transport,
            Self::UnexpectedStatus { .. } => FailureKind::UnexpectedStatus,
            Self::MalformedBody { .. } => FailureKind::MalformedBody,
            Self::MissingPrerequisite { .. } => FailureKind::MissingPrerequisite,
            Self::ConfigurationError { .. } => FailureKind::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TransportFailure { .. } => ErrorSeverity::Error,
            Self::UnexpectedStatus { .. } => ErrorSeverity::Error,
            Self::MalformedBody { .. } => ErrorSeverity::Error,
            Self::MissingPrerequisite { .. } => ErrorSeverity::Warning,
            Self::ConfigurationError { .. } => ErrorSeverity::Critical,
        }
    }

    /// True when the failure was caused by an earlier step, not by the
    /// service under test.
    pub fn is_dependency_failure(&self) -> bool {
        matches!(self, Self::MissingPrerequisite { .. })
    }

    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    pub fn transport_failure(message: impl Into<String>, timed_out: bool) -> Self {
        let message = message.into();
        log_error!(
            error_type = "transport_failure",
            message = %message,
            timed_out = timed_out,
            "HTTP call produced no response"
        );
        Self::TransportFailure { message, timed_out }
    }

    pub fn unexpected_status(expected: u16, actual: u16, body: Option<String>) -> Self {
        log_warn!(
            error_type = "unexpected_status",
            expected = expected,
            actual = actual,
            "Service returned an unexpected status"
        );
        Self::UnexpectedStatus {
            expected,
            actual,
            body,
        }
    }

    pub fn malformed_body(message: impl Into<String>) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "malformed_body",
            message = %message,
            "Response body does not have the expected shape"
        );
        Self::MalformedBody { message }
    }

    pub fn missing_prerequisite(prerequisite: impl Into<String>) -> Self {
        let prerequisite = prerequisite.into();
        log_warn!(
            error_type = "missing_prerequisite",
            prerequisite = %prerequisite,
            "Step skipped its call: prerequisite state absent"
        );
        Self::MissingPrerequisite { prerequisite }
    }

    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            message = %message,
            "Harness configuration validation failed"
        );
        Self::ConfigurationError { message }
    }
}

//! Concrete workflow steps
//!
//! - **health**: liveness checks for the backend and the analysis service
//! - **auth**: registration and login, which set the session token
//! - **records**: health record CRUD, which set and retire the resource id
//! - **analysis**: the rate-limited analysis calls, via the backend and direct
//!
//! Every step checks its session prerequisites before issuing a request.

pub mod analysis;
pub mod auth;
pub mod health;
pub mod records;

pub use analysis::{AnalysisDirect, AnalysisViaBackend, DEFAULT_ANALYSIS_QUERY};
pub use auth::{Login, Register};
pub use health::{AnalysisHealth, BackendHealth};
pub use records::{
    CreateRecord, DeleteRecord, GetRecord, ListRecords, RecordFixture, UpdateRecord,
    VerifyRecordDeleted,
};

use crate::error::{HarnessError, HarnessResult};
use crate::step::Services;

/// The analysis service API key, treated as a prerequisite of the direct
/// analysis steps.
pub(crate) fn require_api_key(services: &Services) -> HarnessResult<&str> {
    services
        .analysis
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| HarnessError::missing_prerequisite("analysis API key"))
}

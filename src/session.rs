//! Per-run session state threaded through every step.
//!
//! A [`SessionContext`] is created once per run and mutated in place by the
//! steps that authenticate (token) or create and delete a record (resource
//! id). Dependent steps read it only through the `require_*` gates, which
//! fail with [`HarnessError::MissingPrerequisite`] before any request is sent.

use crate::error::{HarnessError, HarnessResult};
use crate::logging::log_debug;

/// Credentials the run authenticates with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Mutable state shared by the steps of one run.
#[derive(Debug, Clone)]
pub struct SessionContext {
    credentials: Credentials,
    auth_token: Option<String>,
    active_resource_id: Option<String>,
    retired_resource_id: Option<String>,
}

impl SessionContext {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            auth_token: None,
            active_resource_id: None,
            retired_resource_id: None,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The identity this session registers and logs in as.
    pub fn user_identity(&self) -> &str {
        &self.credentials.email
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn active_resource_id(&self) -> Option<&str> {
        self.active_resource_id.as_deref()
    }

    pub fn retired_resource_id(&self) -> Option<&str> {
        self.retired_resource_id.as_deref()
    }

    /// Store a bearer token, replacing any previous one.
    pub fn set_token(&mut self, token: impl Into<String>) {
        let replaced = self.auth_token.replace(token.into()).is_some();
        log_debug!(replaced = replaced, "Session token updated");
    }

    /// Store the id of the record the run is working on.
    pub fn set_resource_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        log_debug!(resource_id = %id, "Session resource id set");
        self.active_resource_id = Some(id);
    }

    /// Forget the active record after it was deleted, keeping its id for
    /// the post-delete check.
    pub fn retire_resource_id(&mut self) -> Option<String> {
        let retired = self.active_resource_id.take();
        if let Some(id) = &retired {
            log_debug!(resource_id = %id, "Session resource id retired");
            self.retired_resource_id = Some(id.clone());
        }
        retired
    }

    pub fn require_token(&self) -> HarnessResult<&str> {
        self.auth_token
            .as_deref()
            .ok_or_else(|| HarnessError::missing_prerequisite("auth token"))
    }

    pub fn require_resource_id(&self) -> HarnessResult<&str> {
        self.active_resource_id
            .as_deref()
            .ok_or_else(|| HarnessError::missing_prerequisite("resource id"))
    }

    pub fn require_retired_resource_id(&self) -> HarnessResult<&str> {
        self.retired_resource_id
            .as_deref()
            .ok_or_else(|| HarnessError::missing_prerequisite("deleted resource id"))
    }
}

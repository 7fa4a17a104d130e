use crate::error::{HarnessError, HarnessResult};
use crate::logging::log_debug;
use crate::pacing::PacingPolicy;
use crate::session::Credentials;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_ANALYSIS_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_PASSWORD: &str = "Test123!";

/// Trait for the configuration of one external service
pub trait ServiceConfig: Send + Sync + Debug {
    /// Service name used in logs and error messages
    fn service_name(&self) -> &'static str;

    /// Get the base URL every path is appended to
    fn base_url(&self) -> &str;

    /// Get the API key if the service uses one
    fn api_key(&self) -> Option<&str>;

    /// Validate the configuration is complete
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ConfigurationError`] if the base URL is empty or
    /// is not an http(s) URL.
    fn validate(&self) -> HarnessResult<()> {
        validate_base_url(self.service_name(), self.base_url())
    }
}

fn validate_base_url(service: &str, base_url: &str) -> HarnessResult<()> {
    if base_url.trim().is_empty() {
        return Err(HarnessError::configuration_error(format!(
            "{service} base URL is required"
        )));
    }
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(HarnessError::configuration_error(format!(
            "{service} base URL must start with http:// or https://, got {base_url}"
        )));
    }
    Ok(())
}

/// Resource backend (auth + health records)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
        }
    }
}

impl ServiceConfig for BackendConfig {
    fn service_name(&self) -> &'static str {
        "backend"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Option<&str> {
        None // The backend authenticates with session bearer tokens
    }
}

/// AI analysis microservice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ANALYSIS_URL.to_string(),
            api_key: None,
        }
    }
}

impl ServiceConfig for AnalysisConfig {
    fn service_name(&self) -> &'static str {
        "analysis"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn validate(&self) -> HarnessResult<()> {
        validate_base_url(self.service_name(), &self.base_url)?;
        if self.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            return Err(HarnessError::configuration_error(
                "Analysis service API key is required",
            ));
        }
        Ok(())
    }
}

/// Which workflow definition a run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    /// Backend CRUD plus every AI step
    Full,
    /// Backend CRUD only
    BackendOnly,
    /// Short smoke run across both services
    Mvp,
}

impl RunMode {
    /// Whether the workflow for this mode contains AI steps
    pub fn includes_ai(self) -> bool {
        !matches!(self, RunMode::BackendOnly)
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Full => write!(f, "full"),
            RunMode::BackendOnly => write!(f, "backend-only"),
            RunMode::Mvp => write!(f, "mvp"),
        }
    }
}

impl std::str::FromStr for RunMode {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(RunMode::Full),
            "backend-only" | "backend_only" | "backend" => Ok(RunMode::BackendOnly),
            "mvp" => Ok(RunMode::Mvp),
            other => Err(HarnessError::configuration_error(format!(
                "Unsupported run mode: {other}. Supported modes: full, backend-only, mvp"
            ))),
        }
    }
}

/// Complete settings for one harness run
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub backend: BackendConfig,
    pub analysis: AnalysisConfig,
    pub pacing: PacingPolicy,
    pub credentials: Credentials,
    pub mode: RunMode,
    /// Make AI steps count towards the exit code
    pub require_ai: bool,
}

impl HarnessConfig {
    /// Settings for `mode` with default URLs, a fresh identity and the
    /// mode's pacing.
    pub fn for_mode(mode: RunMode) -> Self {
        Self {
            backend: BackendConfig::default(),
            analysis: AnalysisConfig::default(),
            pacing: Self::pacing_for(mode),
            credentials: Credentials::new(generate_test_email(), DEFAULT_PASSWORD),
            mode,
            require_ai: false,
        }
    }

    pub fn pacing_for(mode: RunMode) -> PacingPolicy {
        match mode {
            RunMode::Mvp => PacingPolicy::mvp(),
            RunMode::Full | RunMode::BackendOnly => PacingPolicy::default(),
        }
    }

    /// Validate every service the selected mode talks to
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ConfigurationError`] if a base URL is invalid,
    /// the credentials are blank, or the mode needs the analysis service and
    /// no API key is configured.
    pub fn validate(&self) -> HarnessResult<()> {
        self.backend.validate()?;
        if self.mode.includes_ai() {
            self.analysis.validate()?;
        }
        if self.credentials.email.trim().is_empty() || self.credentials.password.is_empty() {
            return Err(HarnessError::configuration_error(
                "Test credentials must not be empty",
            ));
        }
        Ok(())
    }

    /// Load configuration from environment variables
    /// This is the ONLY method that should access environment variables
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ConfigurationError`] if `E2E_MODE` names an
    /// unknown mode. Validation is left to [`HarnessConfig::validate`] so
    /// command line overrides can be applied first.
    pub fn from_env() -> HarnessResult<Self> {
        let mode = match std::env::var("E2E_MODE") {
            Ok(value) => value.parse::<RunMode>()?,
            Err(_) => RunMode::Full,
        };

        let mut config = Self::for_mode(mode);
        if let Ok(url) = std::env::var("BACKEND_URL") {
            config.backend.base_url = url;
        }
        if let Ok(url) = std::env::var("AI_SERVICE_URL") {
            config.analysis.base_url = url;
        }
        if let Ok(key) = std::env::var("AI_API_KEY") {
            config.analysis.api_key = Some(key);
        }
        if let Ok(email) = std::env::var("TEST_EMAIL") {
            config.credentials.email = email;
        }
        if let Ok(password) = std::env::var("TEST_PASSWORD") {
            config.credentials.password = password;
        }
        if let Ok(flag) = std::env::var("E2E_REQUIRE_AI") {
            config.require_ai = parse_flag(&flag);
        }

        log_debug!(
            mode = %config.mode,
            backend_url = %config.backend.base_url,
            analysis_url = %config.analysis.base_url,
            has_api_key = config.analysis.api_key.is_some(),
            require_ai = config.require_ai,
            "Harness configuration loaded from environment"
        );

        Ok(config)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Fresh identity per run: `test_<unix-seconds>_<8 hex>@test.com`.
pub fn generate_test_email() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "test_{}_{}@test.com",
        chrono::Utc::now().timestamp(),
        &suffix[..8]
    )
}

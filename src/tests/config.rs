// Unit Tests for Harness Configuration
//
// UNIT UNDER TEST: HarnessConfig, BackendConfig, AnalysisConfig, RunMode
//
// BUSINESS RESPONSIBILITY:
//   - Loads service URLs, credentials and mode from the environment
//   - Refuses to start when a service the mode needs is misconfigured
//   - Generates a fresh identity per run
//
// TEST COVERAGE:
//   - Environment variable parsing (serialised: tests mutate process env)
//   - Validation of URLs and the analysis API key
//   - Mode parsing and per-mode pacing

use crate::config::{
    generate_test_email, AnalysisConfig, BackendConfig, HarnessConfig, RunMode, ServiceConfig,
    DEFAULT_ANALYSIS_URL, DEFAULT_BACKEND_URL, DEFAULT_PASSWORD,
};
use crate::error::FailureKind;
use crate::pacing::PacingPolicy;
use serial_test::serial;

const ENV_KEYS: [&str; 7] = [
    "BACKEND_URL",
    "AI_SERVICE_URL",
    "AI_API_KEY",
    "TEST_EMAIL",
    "TEST_PASSWORD",
    "E2E_MODE",
    "E2E_REQUIRE_AI",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

#[cfg(test)]
mod service_config_tests {
    use super::*;

    #[test]
    fn test_backend_defaults_validate() {
        let backend = BackendConfig::default();

        assert_eq!(backend.service_name(), "backend");
        assert_eq!(backend.base_url(), DEFAULT_BACKEND_URL);
        assert!(backend.api_key().is_none());
        assert!(backend.validate().is_ok());
    }

    #[test]
    fn test_backend_rejects_non_http_url() {
        let backend = BackendConfig {
            base_url: "localhost:3001/api".to_string(),
        };

        let error = backend.validate().unwrap_err();

        assert_eq!(error.kind(), FailureKind::Configuration);
    }

    #[test]
    fn test_analysis_requires_api_key() {
        // Test verifies the analysis service cannot be used without its credential

        let mut analysis = AnalysisConfig::default();
        assert!(analysis.validate().is_err());

        analysis.api_key = Some("  ".to_string());
        assert!(analysis.validate().is_err(), "Blank keys are rejected");

        analysis.api_key = Some("ai-key".to_string());
        assert!(analysis.validate().is_ok());
    }
}

#[cfg(test)]
mod harness_config_tests {
    use super::*;

    #[test]
    fn test_backend_only_does_not_need_api_key() {
        let config = HarnessConfig::for_mode(RunMode::BackendOnly);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_mode_needs_api_key() {
        let mut config = HarnessConfig::for_mode(RunMode::Full);
        assert!(config.validate().is_err());

        config.analysis.api_key = Some("ai-key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_email_is_rejected() {
        let mut config = HarnessConfig::for_mode(RunMode::BackendOnly);
        config.credentials.email = String::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pacing_per_mode() {
        assert_eq!(HarnessConfig::pacing_for(RunMode::Mvp), PacingPolicy::mvp());
        assert_eq!(
            HarnessConfig::pacing_for(RunMode::Full),
            PacingPolicy::default()
        );
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("full".parse::<RunMode>().unwrap(), RunMode::Full);
        assert_eq!("Backend-Only".parse::<RunMode>().unwrap(), RunMode::BackendOnly);
        assert_eq!("mvp".parse::<RunMode>().unwrap(), RunMode::Mvp);
        assert!("load-test".parse::<RunMode>().is_err());
        assert!(!RunMode::BackendOnly.includes_ai());
        assert!(RunMode::Mvp.includes_ai());
    }

    #[test]
    fn test_generated_emails_are_distinct() {
        // Test verifies two runs in the same second still get different identities

        let first = generate_test_email();
        let second = generate_test_email();

        assert_ne!(first, second);
        assert!(first.starts_with("test_"));
        assert!(first.ends_with("@test.com"));
    }
}

#[cfg(test)]
mod from_env_tests {
    use super::*;

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        // Arrange
        clear_env();

        // Act
        let config = HarnessConfig::from_env().unwrap();

        // Assert
        assert_eq!(config.mode, RunMode::Full);
        assert_eq!(config.backend.base_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.analysis.base_url, DEFAULT_ANALYSIS_URL);
        assert!(config.analysis.api_key.is_none());
        assert_eq!(config.credentials.password, DEFAULT_PASSWORD);
        assert!(!config.require_ai);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        // Arrange
        clear_env();
        std::env::set_var("BACKEND_URL", "http://backend.test/api");
        std::env::set_var("AI_SERVICE_URL", "http://ai.test/api/v1");
        std::env::set_var("AI_API_KEY", "secret");
        std::env::set_var("TEST_EMAIL", "fixed@test.com");
        std::env::set_var("E2E_MODE", "mvp");
        std::env::set_var("E2E_REQUIRE_AI", "true");

        // Act
        let config = HarnessConfig::from_env().unwrap();
        clear_env();

        // Assert
        assert_eq!(config.mode, RunMode::Mvp);
        assert_eq!(config.pacing, PacingPolicy::mvp());
        assert_eq!(config.backend.base_url, "http://backend.test/api");
        assert_eq!(config.analysis.base_url, "http://ai.test/api/v1");
        assert_eq!(config.analysis.api_key.as_deref(), Some("secret"));
        assert_eq!(config.credentials.email, "fixed@test.com");
        assert!(config.require_ai);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unknown_mode() {
        // Arrange
        clear_env();
        std::env::set_var("E2E_MODE", "soak");

        // Act
        let result = HarnessConfig::from_env();
        clear_env();

        // Assert
        assert_eq!(result.unwrap_err().kind(), FailureKind::Configuration);
    }
}

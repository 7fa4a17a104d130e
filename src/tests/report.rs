// Unit Tests for Result Aggregation and Reporting
//
// UNIT UNDER TEST: ResultAggregator, RunSummary, Verdict, render functions
//
// BUSINESS RESPONSIBILITY:
//   - Keeps step results in execution order
//   - Computes pass counts and the coarse verdict banner
//   - Derives the exit code from required steps only
//
// TEST COVERAGE:
//   - Verdict thresholds (all / >=80% / otherwise)
//   - Best-effort failures do not change the exit code
//   - Rendered lines and summary contents

use crate::exit_codes;
use crate::http::BODY_SNIPPET_CHARS;
use crate::report::{render_step_line, render_summary, ResultAggregator, Verdict};
use crate::step::{Criticality, StepId};
use crate::tests::helpers::create_step_result;
use serde_json::json;

#[cfg(test)]
mod verdict_tests {
    use super::*;

    #[test]
    fn test_all_passed() {
        assert_eq!(Verdict::from_counts(11, 11), Verdict::AllPassed);
    }

    #[test]
    fn test_eighty_percent_boundary() {
        // Test verifies exactly 80% counts as mostly passed and just below does not

        assert_eq!(Verdict::from_counts(8, 10), Verdict::MostlyPassed);
        assert_eq!(Verdict::from_counts(9, 11), Verdict::MostlyPassed);
        assert_eq!(Verdict::from_counts(7, 10), Verdict::Failed);
        assert_eq!(Verdict::from_counts(8, 11), Verdict::Failed);
    }

    #[test]
    fn test_empty_run_is_failure() {
        assert_eq!(Verdict::from_counts(0, 0), Verdict::Failed);
    }
}

#[cfg(test)]
mod aggregator_tests {
    use super::*;

    #[test]
    fn test_results_keep_execution_order() {
        // Arrange
        let mut results = ResultAggregator::new();

        // Act
        results.record(create_step_result(StepId::BackendHealth, true, Criticality::Required));
        results.record(create_step_result(StepId::Register, false, Criticality::Required));
        results.record(create_step_result(StepId::Login, true, Criticality::Required));

        // Assert
        let ids: Vec<StepId> = results.results().iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec![StepId::BackendHealth, StepId::Register, StepId::Login]
        );
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_required_failure_sets_nonzero_exit() {
        // Arrange
        let mut results = ResultAggregator::new();
        results.record(create_step_result(StepId::BackendHealth, true, Criticality::Required));
        results.record(create_step_result(StepId::CreateRecord, false, Criticality::Required));

        // Act
        let summary = results.summary();

        // Assert
        assert_eq!(summary.passed_count, 1);
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.required_failures, 1);
        assert!(!summary.all_required_passed());
        assert_eq!(summary.exit_code(), exit_codes::REQUIRED_STEP_FAILED);
    }

    #[test]
    fn test_best_effort_failure_keeps_zero_exit() {
        // Test verifies AI steps marked best-effort affect the banner but not the exit code

        // Arrange
        let mut results = ResultAggregator::new();
        results.record(create_step_result(StepId::BackendHealth, true, Criticality::Required));
        results.record(create_step_result(
            StepId::AnalysisDirect,
            false,
            Criticality::BestEffort,
        ));

        // Act
        let summary = results.summary();

        // Assert
        assert_eq!(summary.exit_code(), exit_codes::OK);
        assert_eq!(summary.verdict(), Verdict::Failed);
        assert!((summary.pass_percentage() - 50.0).abs() < f64::EPSILON);
    }
}

#[cfg(test)]
mod render_tests {
    use super::*;

    #[test]
    fn test_step_line_for_failure_shows_error() {
        // Arrange
        let result = create_step_result(StepId::Register, false, Criticality::Required);

        // Act
        let line = render_step_line(&result);

        // Assert
        assert!(line.starts_with("❌ User Registration"));
        assert!(line.contains("expected 200, got 500"));
        assert!(!line.contains("[best-effort]"));
    }

    #[test]
    fn test_step_line_marks_best_effort() {
        // Arrange
        let result = create_step_result(StepId::AnalysisHealth, true, Criticality::BestEffort);

        // Act
        let line = render_step_line(&result);

        // Assert
        assert!(line.starts_with("✅ AI Service Health"));
        assert!(line.contains("[best-effort]"));
    }

    #[test]
    fn test_step_line_truncates_large_detail() {
        // Test verifies a health check echoing a large body does not flood the console

        // Arrange
        let mut result = create_step_result(StepId::BackendHealth, true, Criticality::Required);
        result.detail = Some(json!({ "status": "ok", "dump": "y".repeat(5_000) }));

        // Act
        let line = render_step_line(&result);

        // Assert
        let detail_line = line.lines().nth(1).unwrap().trim_start();
        assert!(detail_line.ends_with("..."));
        assert_eq!(detail_line.chars().count(), BODY_SNIPPET_CHARS + 3);
    }

    #[test]
    fn test_step_line_keeps_short_detail() {
        // Arrange
        let mut result = create_step_result(StepId::CreateRecord, true, Criticality::Required);
        result.detail = Some(json!({ "id": "42" }));

        // Act
        let line = render_step_line(&result);

        // Assert
        assert!(line.ends_with(r#"{"id":"42"}"#));
    }

    #[test]
    fn test_summary_lists_steps_and_ratio() {
        // Arrange
        let mut results = ResultAggregator::new();
        for id in [StepId::BackendHealth, StepId::Register, StepId::Login, StepId::CreateRecord] {
            results.record(create_step_result(id, true, Criticality::Required));
        }
        results.record(create_step_result(StepId::ListRecords, false, Criticality::Required));

        // Act
        let text = render_summary(&results.summary());

        // Assert
        assert!(text.contains("✅ Backend Health (5 ms)"));
        assert!(text.contains("❌ Get Health Records"));
        assert!(text.contains("Total: 4/5 tests passed (80.0%)"));
        assert!(text.contains(Verdict::MostlyPassed.banner()));
        assert!(text.contains("Required steps failed: 1"));
    }
}

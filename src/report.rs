//! Result aggregation and the console report.
//!
//! The aggregator keeps step results in execution order. The verdict banner is
//! for human triage only; the exit code is decided by required steps alone
//! (see [`RunSummary::exit_code`]).

use crate::config::HarnessConfig;
use crate::exit_codes;
use crate::http::BODY_SNIPPET_CHARS;
use crate::step::StepResult;

use serde_json::Value;
use std::fmt::Write as _;

const RULE_WIDTH: usize = 60;

/// Append-only, ordered collection of step results.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: Vec<StepResult>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: StepResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            passed_count: self.results.iter().filter(|r| r.passed).count(),
            total_count: self.results.len(),
            required_failures: self
                .results
                .iter()
                .filter(|r| r.is_required() && !r.passed)
                .count(),
            results: self.results.clone(),
        }
    }
}

/// Coarse outcome shown in the summary banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    AllPassed,
    /// At least 80% of steps passed.
    MostlyPassed,
    Failed,
}

impl Verdict {
    pub fn from_counts(passed: usize, total: usize) -> Self {
        if total == 0 {
            return Verdict::Failed;
        }
        if passed == total {
            Verdict::AllPassed
        } else if passed * 5 >= total * 4 {
            Verdict::MostlyPassed
        } else {
            Verdict::Failed
        }
    }

    pub fn banner(self) -> &'static str {
        match self {
            Verdict::AllPassed => "🎉 ALL TESTS PASSED! System is working perfectly!",
            Verdict::MostlyPassed => "⚠️  Most tests passed. Check failed tests above.",
            Verdict::Failed => "❌ Multiple tests failed. System needs attention.",
        }
    }
}

/// Snapshot of a finished (or in-progress) run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub passed_count: usize,
    pub total_count: usize,
    pub required_failures: usize,
    pub results: Vec<StepResult>,
}

impl RunSummary {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_counts(self.passed_count, self.total_count)
    }

    pub fn pass_percentage(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        self.passed_count as f64 / self.total_count as f64 * 100.0
    }

    pub fn all_required_passed(&self) -> bool {
        self.required_failures == 0
    }

    /// `0` when every required step passed, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.all_required_passed() {
            exit_codes::OK
        } else {
            exit_codes::REQUIRED_STEP_FAILED
        }
    }
}

fn icon(passed: bool) -> &'static str {
    if passed {
        "✅"
    } else {
        "❌"
    }
}

/// Detail JSON cut to [`BODY_SNIPPET_CHARS`], marked with `...` when cut.
fn detail_snippet(detail: &Value) -> String {
    let text = detail.to_string();
    if text.chars().count() <= BODY_SNIPPET_CHARS {
        return text;
    }
    let mut cut: String = text.chars().take(BODY_SNIPPET_CHARS).collect();
    cut.push_str("...");
    cut
}

/// One progress line, printed as each step finishes.
pub fn render_step_line(result: &StepResult) -> String {
    let mut line = format!(
        "{} {} ({} ms)",
        icon(result.passed),
        result.name,
        result.elapsed.as_millis()
    );
    if !result.is_required() {
        line.push_str(" [best-effort]");
    }
    if let Some(error) = &result.error {
        let _ = write!(line, "\n   {error}");
    } else if let Some(detail) = &result.detail {
        let _ = write!(line, "\n   {}", detail_snippet(detail));
    }
    line
}

/// Run banner with the targets and identity under test.
pub fn render_header(config: &HarnessConfig) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "🚀 STARTING SYSTEM TEST ({})", config.mode);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Backend URL: {}", config.backend.base_url);
    if config.mode.includes_ai() {
        let _ = writeln!(out, "AI Service URL: {}", config.analysis.base_url);
    }
    let _ = writeln!(out, "Test User: {}", config.credentials.email);
    out
}

/// Final summary: every step in order, the ratio, and the verdict banner.
pub fn render_summary(summary: &RunSummary) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "📊 TEST SUMMARY");
    let _ = writeln!(out, "{rule}");

    for result in &summary.results {
        let suffix = if result.is_required() {
            ""
        } else {
            " [best-effort]"
        };
        let _ = writeln!(
            out,
            "{} {} ({} ms){}",
            icon(result.passed),
            result.name,
            result.elapsed.as_millis(),
            suffix
        );
        if let Some(error) = &result.error {
            let _ = writeln!(out, "   {error}");
        }
    }

    let _ = writeln!(out, "\n{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "Total: {}/{} tests passed ({:.1}%)",
        summary.passed_count,
        summary.total_count,
        summary.pass_percentage()
    );
    let _ = writeln!(out, "{}", summary.verdict().banner());
    if summary.required_failures > 0 {
        let _ = writeln!(
            out,
            "Required steps failed: {}",
            summary.required_failures
        );
    }
    let _ = writeln!(out, "{rule}");
    out
}

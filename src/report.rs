//! Check results and the aggregated run report
//!
//! `CheckResult` is produced once per check by the verdict functions
//! and is immutable afterwards. `Report` accumulates results in order,
//! is serialized to JSON at the end of a run, and drives the process
//! exit code.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────
// Check Results
// ─────────────────────────────────────────────────────────────────

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Pass,
    Fail,
}

impl CheckStatus {
    /// The glyph used in the summary block
    pub fn glyph(&self) -> char {
        match self {
            CheckStatus::Pass => '✓',
            CheckStatus::Fail => '✗',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
        }
    }
}

/// Result of a single check, immutable after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check name (e.g. "Background Color", "Responsive mobile")
    pub name: String,

    /// PASS or FAIL
    pub status: CheckStatus,

    /// Expected value, for assertion mismatches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,

    /// Observed value, for assertion mismatches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,

    /// Reason, for missing-element and error conditions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CheckResult {
    /// A passing result
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Pass,
            expected: None,
            actual: None,
            reason: None,
        }
    }

    /// A failing result with no detail
    pub fn fail(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Fail,
            expected: None,
            actual: None,
            reason: None,
        }
    }

    /// A failing result recording expected vs actual
    pub fn fail_mismatch(
        name: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Fail,
            expected: Some(expected.into()),
            actual: Some(actual.into()),
            reason: None,
        }
    }

    /// A failing result with a reason string
    pub fn fail_reason(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Fail,
            expected: None,
            actual: None,
            reason: Some(reason.into()),
        }
    }

    /// Attach the observed value (used by typography FAILs)
    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}

// ─────────────────────────────────────────────────────────────────
// Report
// ─────────────────────────────────────────────────────────────────

/// Aggregated run report, built incrementally during a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    /// Number of passing checks
    pub passed: u32,

    /// Number of failing checks
    pub failed: u32,

    /// Ordered sequence of check results
    pub tests: Vec<CheckResult>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result, bumping the matching counter
    pub fn record(&mut self, result: CheckResult) {
        match result.status {
            CheckStatus::Pass => self.passed += 1,
            CheckStatus::Fail => self.failed += 1,
        }
        self.tests.push(result);
    }

    pub fn total(&self) -> u32 {
        self.passed + self.failed
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Process exit code for this report: 0 all-pass, 1 any-fail
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    /// Write the report as pretty-printed JSON, overwriting any
    /// previous file at `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| Error::IoWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!(path = %path.display(), passed = self.passed, failed = self.failed, "Report saved");
        Ok(())
    }

    /// Print the human-readable summary block to stdout.
    ///
    /// The summary must always appear, so this runs before any
    /// attempt to persist the report.
    pub fn print_summary(&self) {
        let stdout = io::stdout();
        let _ = self.write_summary(&mut stdout.lock());
    }

    /// Write the summary block to any writer
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "=== TEST RESULTS ===")?;
        writeln!(out, "Total Tests: {}", self.total())?;
        writeln!(out, "Passed: {}", self.passed)?;
        writeln!(out, "Failed: {}", self.failed)?;
        writeln!(out)?;
        writeln!(out, "Detailed Results:")?;

        for test in &self.tests {
            writeln!(
                out,
                "{} {}: {}",
                test.status.glyph(),
                test.name,
                test.status.as_str()
            )?;
            if let Some(ref expected) = test.expected {
                writeln!(out, "  Expected: {}", expected)?;
                if let Some(ref actual) = test.actual {
                    writeln!(out, "  Actual: {}", actual)?;
                }
            } else if let Some(ref actual) = test.actual {
                writeln!(out, "  Actual: {}", actual)?;
            }
            if let Some(ref reason) = test.reason {
                writeln!(out, "  Reason: {}", reason)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_match_results() {
        let mut report = Report::new();
        report.record(CheckResult::pass("Background Color"));
        report.record(CheckResult::fail_mismatch("Load Time", "< 1000ms", "1200ms"));
        report.record(CheckResult::pass("Typography"));

        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.total(), report.tests.len() as u32);
        assert!(!report.all_passed());
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_all_passed_exit_code() {
        let mut report = Report::new();
        report.record(CheckResult::pass("Hover States"));
        assert!(report.all_passed());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_json_shape() {
        let mut report = Report::new();
        report.record(CheckResult::pass("Background Color"));
        report.record(CheckResult::fail_reason("Hover States", "No links found"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["passed"], 1);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["tests"][0]["name"], "Background Color");
        assert_eq!(json["tests"][0]["status"], "PASS");
        // Optional fields are omitted, not null
        assert!(json["tests"][0].get("expected").is_none());
        assert_eq!(json["tests"][1]["status"], "FAIL");
        assert_eq!(json["tests"][1]["reason"], "No links found");
    }

    #[test]
    fn test_json_roundtrip() {
        let mut report = Report::new();
        report.record(CheckResult::fail_mismatch(
            "Background Color",
            "rgb(0, 0, 0)",
            "rgb(255, 255, 255)",
        ));

        let json = serde_json::to_string(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.failed, 1);
        assert_eq!(parsed.tests[0].expected.as_deref(), Some("rgb(0, 0, 0)"));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        let mut first = Report::new();
        first.record(CheckResult::fail("Responsive mobile"));
        first.save(&path).unwrap();

        let mut second = Report::new();
        second.record(CheckResult::pass("Responsive mobile"));
        second.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Report = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.passed, 1);
        assert_eq!(parsed.failed, 0);
    }

    #[test]
    fn test_save_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = Report::new();
        report.record(CheckResult::pass("Background Color"));
        report.record(CheckResult::pass("Typography"));

        let path_a = dir.path().join("a.json");
        let path_b = dir.path().join("b.json");
        report.save(&path_a).unwrap();
        report.save(&path_b).unwrap();

        assert_eq!(
            std::fs::read(&path_a).unwrap(),
            std::fs::read(&path_b).unwrap()
        );
    }

    #[test]
    fn test_summary_content() {
        let mut report = Report::new();
        report.record(CheckResult::pass("Background Color"));
        report.record(CheckResult::fail_mismatch("Load Time", "< 1000ms", "1200ms"));
        report.record(CheckResult::fail_reason("Hover States", "No links found"));

        let mut buf = Vec::new();
        report.write_summary(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("=== TEST RESULTS ==="));
        assert!(text.contains("Total Tests: 3"));
        assert!(text.contains("Passed: 1"));
        assert!(text.contains("Failed: 2"));
        assert!(text.contains("✓ Background Color: PASS"));
        assert!(text.contains("✗ Load Time: FAIL"));
        assert!(text.contains("  Expected: < 1000ms"));
        assert!(text.contains("  Actual: 1200ms"));
        assert!(text.contains("  Reason: No links found"));
    }

    #[test]
    fn test_summary_does_not_depend_on_save() {
        // The summary block must be emittable even when the report
        // file cannot be written (e.g. unwritable path)
        let mut report = Report::new();
        report.record(CheckResult::fail("Responsive mobile"));

        let mut buf = Vec::new();
        report.write_summary(&mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("=== TEST RESULTS ==="));

        let unwritable = Path::new("/nonexistent-dir/results.json");
        assert!(report.save(unwritable).is_err());
    }

    #[test]
    fn test_status_glyphs() {
        assert_eq!(CheckStatus::Pass.glyph(), '✓');
        assert_eq!(CheckStatus::Fail.glyph(), '✗');
    }
}

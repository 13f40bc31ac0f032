//! Pure pass/fail decisions
//!
//! Each check's verdict is a small pure function of (observed value,
//! expected value) → `CheckResult`, kept free of browser plumbing so
//! it unit-tests without Chromium. The observed values arrive as the
//! deserialized return values of the in-page scripts in the parent
//! module.

use serde::Deserialize;

use crate::config::{ColorSettings, PerformanceSettings};
use crate::report::CheckResult;

// ─────────────────────────────────────────────────────────────────
// In-page probe results
// ─────────────────────────────────────────────────────────────────

/// Computed body styles
#[derive(Debug, Clone, Deserialize)]
pub struct BodyStyles {
    /// Computed background-color of document.body
    pub background: String,

    /// Computed color of document.body
    pub color: String,
}

/// Navigation-timing deltas, both relative to navigation start
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TimingMetrics {
    /// Navigation start -> load event end (ms)
    pub load_time_ms: i64,

    /// Navigation start -> DOM content loaded end (ms)
    pub dom_ready_ms: i64,
}

/// Anchor and stylesheet scan result
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HoverProbe {
    /// Number of anchor elements on the page
    pub link_count: u32,

    /// Whether any accessible stylesheet has a ":hover" selector
    pub has_hover_rules: bool,
}

/// First-heading font probe
#[derive(Debug, Clone, Deserialize)]
pub struct TypographyProbe {
    /// Computed font-family of the first h1, None when no h1 exists
    pub font: Option<String>,
}

// ─────────────────────────────────────────────────────────────────
// Verdicts
// ─────────────────────────────────────────────────────────────────

/// Background color: exact string match against the expected value
pub fn background_verdict(colors: &ColorSettings, styles: &BodyStyles) -> CheckResult {
    if styles.background == colors.background {
        CheckResult::pass("Background Color")
    } else {
        CheckResult::fail_mismatch("Background Color", &colors.background, &styles.background)
    }
}

/// Responsive layout: a `main` region must exist and not be hidden
pub fn responsive_verdict(viewport_name: &str, main_visible: bool) -> CheckResult {
    let name = format!("Responsive {}", viewport_name);
    if main_visible {
        CheckResult::pass(name)
    } else {
        CheckResult::fail(name)
    }
}

/// Load time: strictly below the configured maximum
pub fn load_time_verdict(performance: &PerformanceSettings, metrics: &TimingMetrics) -> CheckResult {
    if metrics.load_time_ms < performance.max_load_time_ms as i64 {
        CheckResult::pass("Load Time")
    } else {
        CheckResult::fail_mismatch(
            "Load Time",
            format!("< {}ms", performance.max_load_time_ms),
            format!("{}ms", metrics.load_time_ms),
        )
    }
}

/// Hover states: requires at least one anchor and at least one ":hover"
/// rule in an accessible stylesheet
pub fn hover_verdict(probe: &HoverProbe) -> CheckResult {
    if probe.link_count == 0 {
        CheckResult::fail_reason("Hover States", "No links found")
    } else if probe.has_hover_rules {
        CheckResult::pass("Hover States")
    } else {
        CheckResult::fail("Hover States")
    }
}

/// Typography: the first heading's computed font family must contain
/// "inter" or "system", case-insensitively
pub fn typography_verdict(probe: &TypographyProbe) -> CheckResult {
    match probe.font {
        None => CheckResult::fail_reason("Typography", "No h1 found"),
        Some(ref font) => {
            let lowered = font.to_lowercase();
            if lowered.contains("inter") || lowered.contains("system") {
                CheckResult::pass("Typography")
            } else {
                CheckResult::fail("Typography").with_actual(font.clone())
            }
        }
    }
}

/// Degraded-mode probe: the site root must answer 200
pub fn status_verdict(status: u16) -> CheckResult {
    if status == 200 {
        CheckResult::pass("Basic Server")
    } else {
        CheckResult::fail_mismatch("Basic Server", "200", status.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CheckStatus;

    fn colors() -> ColorSettings {
        ColorSettings::default()
    }

    fn thresholds() -> PerformanceSettings {
        PerformanceSettings::default()
    }

    #[test]
    fn test_background_exact_match_passes() {
        let styles = BodyStyles {
            background: "rgb(0, 0, 0)".to_string(),
            color: "rgb(255, 255, 255)".to_string(),
        };
        let result = background_verdict(&colors(), &styles);
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.expected.is_none());
    }

    #[test]
    fn test_background_mismatch_records_both_values() {
        let styles = BodyStyles {
            background: "rgb(10, 10, 10)".to_string(),
            color: "rgb(255, 255, 255)".to_string(),
        };
        let result = background_verdict(&colors(), &styles);
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.expected.as_deref(), Some("rgb(0, 0, 0)"));
        assert_eq!(result.actual.as_deref(), Some("rgb(10, 10, 10)"));
    }

    #[test]
    fn test_responsive_names_follow_viewports() {
        let names: Vec<String> = ["mobile", "tablet", "desktop"]
            .iter()
            .map(|vp| responsive_verdict(vp, true).name)
            .collect();
        assert_eq!(
            names,
            vec!["Responsive mobile", "Responsive tablet", "Responsive desktop"]
        );
    }

    #[test]
    fn test_responsive_hidden_main_fails() {
        let result = responsive_verdict("mobile", false);
        assert_eq!(result.status, CheckStatus::Fail);
    }

    #[test]
    fn test_load_time_strictly_below_threshold() {
        let just_under = TimingMetrics {
            load_time_ms: 999,
            dom_ready_ms: 400,
        };
        assert_eq!(
            load_time_verdict(&thresholds(), &just_under).status,
            CheckStatus::Pass
        );

        let at_threshold = TimingMetrics {
            load_time_ms: 1000,
            dom_ready_ms: 400,
        };
        let result = load_time_verdict(&thresholds(), &at_threshold);
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.expected.as_deref(), Some("< 1000ms"));
        assert_eq!(result.actual.as_deref(), Some("1000ms"));
    }

    #[test]
    fn test_hover_no_links() {
        let probe = HoverProbe {
            link_count: 0,
            has_hover_rules: true,
        };
        let result = hover_verdict(&probe);
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.reason.as_deref(), Some("No links found"));
    }

    #[test]
    fn test_hover_rule_found() {
        let probe = HoverProbe {
            link_count: 1,
            has_hover_rules: true,
        };
        assert_eq!(hover_verdict(&probe).status, CheckStatus::Pass);
    }

    #[test]
    fn test_hover_links_but_no_rules() {
        let probe = HoverProbe {
            link_count: 3,
            has_hover_rules: false,
        };
        let result = hover_verdict(&probe);
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.reason.is_none());
    }

    #[test]
    fn test_typography_inter_passes_case_insensitive() {
        let probe = TypographyProbe {
            font: Some("Inter, sans-serif".to_string()),
        };
        assert_eq!(typography_verdict(&probe).status, CheckStatus::Pass);

        let probe = TypographyProbe {
            font: Some("SYSTEM-UI".to_string()),
        };
        assert_eq!(typography_verdict(&probe).status, CheckStatus::Pass);
    }

    #[test]
    fn test_typography_wrong_font_records_actual() {
        let probe = TypographyProbe {
            font: Some("Arial".to_string()),
        };
        let result = typography_verdict(&probe);
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.actual.as_deref(), Some("Arial"));
    }

    #[test]
    fn test_typography_missing_heading() {
        let probe = TypographyProbe { font: None };
        let result = typography_verdict(&probe);
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.reason.as_deref(), Some("No h1 found"));
    }

    #[test]
    fn test_status_verdict() {
        assert_eq!(status_verdict(200).status, CheckStatus::Pass);

        let result = status_verdict(404);
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.expected.as_deref(), Some("200"));
        assert_eq!(result.actual.as_deref(), Some("404"));
    }

    #[test]
    fn test_probe_deserialization() {
        let probe: HoverProbe =
            serde_json::from_str(r#"{"link_count": 2, "has_hover_rules": true}"#).unwrap();
        assert_eq!(probe.link_count, 2);
        assert!(probe.has_hover_rules);

        let metrics: TimingMetrics =
            serde_json::from_str(r#"{"load_time_ms": 420, "dom_ready_ms": 180}"#).unwrap();
        assert_eq!(metrics.load_time_ms, 420);

        let typography: TypographyProbe = serde_json::from_str(r#"{"font": null}"#).unwrap();
        assert!(typography.font.is_none());
    }
}

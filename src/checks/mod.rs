//! The check suite
//!
//! Drives the one browser page through the fixed sequence of checks:
//! background color, responsive layout per viewport, load timing,
//! hover-rule presence, heading typography. Observed values come from
//! in-page scripts; pass/fail decisions live in [`verdicts`].
//!
//! Any error escaping the sequence is caught once, recorded as a
//! single "Test Execution" failure, and never prevents browser
//! teardown or report emission. No check is retried.

pub mod verdicts;

use tracing::{error, info};

use crate::browser::CheckPage;
use crate::config::CheckConfig;
use crate::error::Result;
use crate::report::{CheckResult, Report};

use verdicts::{BodyStyles, HoverProbe, TimingMetrics, TypographyProbe};

// ─────────────────────────────────────────────────────────────────
// In-page scripts
// ─────────────────────────────────────────────────────────────────

const BODY_STYLES_SCRIPT: &str = r#"
(() => {
    const style = window.getComputedStyle(document.body);
    return { background: style.backgroundColor, color: style.color };
})()
"#;

const MAIN_VISIBLE_SCRIPT: &str = r#"
(() => {
    const main = document.querySelector('main');
    return main !== null && window.getComputedStyle(main).display !== 'none';
})()
"#;

const TIMING_SCRIPT: &str = r#"
(() => {
    const timing = performance.timing;
    return {
        load_time_ms: timing.loadEventEnd - timing.navigationStart,
        dom_ready_ms: timing.domContentLoadedEventEnd - timing.navigationStart
    };
})()
"#;

// Stylesheets that throw on cssRules access (cross-origin) are
// skipped without failing the check.
const HOVER_SCRIPT: &str = r#"
(() => {
    const links = document.querySelectorAll('a');
    let hasHover = false;
    for (const sheet of Array.from(document.styleSheets)) {
        try {
            const rules = Array.from(sheet.cssRules || sheet.rules || []);
            if (rules.some(rule => rule.selectorText && rule.selectorText.includes(':hover'))) {
                hasHover = true;
                break;
            }
        } catch (e) {
            // cross-origin stylesheet, skip
        }
    }
    return { link_count: links.length, has_hover_rules: hasHover };
})()
"#;

const TYPOGRAPHY_SCRIPT: &str = r#"
(() => {
    const h1 = document.querySelector('h1');
    if (!h1) return { font: null };
    return { font: window.getComputedStyle(h1).fontFamily };
})()
"#;

// ─────────────────────────────────────────────────────────────────
// Check Suite
// ─────────────────────────────────────────────────────────────────

/// Runs the fixed check sequence against one page
pub struct CheckSuite<'a> {
    config: &'a CheckConfig,
}

impl<'a> CheckSuite<'a> {
    pub fn new(config: &'a CheckConfig) -> Self {
        Self { config }
    }

    /// Run every check in order, aggregating into a fresh report.
    ///
    /// Errors inside the sequence are converted into a single
    /// "Test Execution" failure entry; the report is always returned.
    pub async fn run(&self, page: &CheckPage) -> Report {
        let mut report = Report::new();

        if let Err(e) = self.run_sequence(page, &mut report).await {
            error!(error = %e.format_for_log(), "Check sequence aborted");
            report.record(CheckResult::fail_reason("Test Execution", e.to_string()));
        }

        report
    }

    async fn run_sequence(&self, page: &CheckPage, report: &mut Report) -> Result<()> {
        self.check_background(page, report).await?;
        self.check_responsive(page, report).await?;
        self.check_performance(page, report).await?;
        self.check_hover(page, report).await?;
        self.check_typography(page, report).await?;
        Ok(())
    }

    /// Check 1: computed body background against the expected color
    async fn check_background(&self, page: &CheckPage, report: &mut Report) -> Result<()> {
        println!("Testing colors...");
        page.navigate(&self.config.page_url()).await?;

        let styles: BodyStyles = page.evaluate("Background Color", BODY_STYLES_SCRIPT).await?;
        info!(background = %styles.background, text = %styles.color, "Computed body styles");

        report.record(verdicts::background_verdict(&self.config.colors, &styles));
        Ok(())
    }

    /// Check 2: the main region stays visible across every viewport
    async fn check_responsive(&self, page: &CheckPage, report: &mut Report) -> Result<()> {
        println!("Testing responsive viewports...");
        for viewport in &self.config.viewports {
            page.set_viewport(viewport).await?;
            page.navigate(&self.config.page_url()).await?;

            let main_visible: bool = page
                .evaluate(&format!("Responsive {}", viewport.name), MAIN_VISIBLE_SCRIPT)
                .await?;

            report.record(verdicts::responsive_verdict(&viewport.name, main_visible));
        }
        Ok(())
    }

    /// Check 3: navigation-timing load time below the threshold
    async fn check_performance(&self, page: &CheckPage, report: &mut Report) -> Result<()> {
        println!("Testing performance...");
        let metrics: TimingMetrics = page.evaluate("Load Time", TIMING_SCRIPT).await?;
        info!(
            load_time_ms = metrics.load_time_ms,
            dom_ready_ms = metrics.dom_ready_ms,
            max_dom_ready_ms = self.config.performance.max_dom_ready_ms,
            "Navigation timing"
        );

        report.record(verdicts::load_time_verdict(
            &self.config.performance,
            &metrics,
        ));
        Ok(())
    }

    /// Check 4: at least one link and one ":hover" rule
    async fn check_hover(&self, page: &CheckPage, report: &mut Report) -> Result<()> {
        println!("Testing hover states...");
        let probe: HoverProbe = page.evaluate("Hover States", HOVER_SCRIPT).await?;
        info!(
            link_count = probe.link_count,
            has_hover_rules = probe.has_hover_rules,
            "Hover scan"
        );

        report.record(verdicts::hover_verdict(&probe));
        Ok(())
    }

    /// Check 5: first heading uses the expected font family
    async fn check_typography(&self, page: &CheckPage, report: &mut Report) -> Result<()> {
        println!("Testing typography...");
        let probe: TypographyProbe = page.evaluate("Typography", TYPOGRAPHY_SCRIPT).await?;
        info!(font = ?probe.font, "Heading font");

        report.record(verdicts::typography_verdict(&probe));
        Ok(())
    }
}

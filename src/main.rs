//! sitecheck - Browser-driven smoke checks for a static website
//!
//! Loads the target page in headless Chromium, runs a fixed sequence
//! of visual and performance checks, prints a summary, and persists a
//! JSON report. When no browser is available the run degrades to a
//! single HTTP status probe of the site root.

mod browser;
mod checks;
mod cli;
mod config;
mod error;
mod logging;
mod probe;
mod report;
mod version;

use clap::Parser;
use tracing::{info, warn};

use crate::browser::HeadlessBrowser;
use crate::checks::CheckSuite;
use crate::cli::{Cli, Commands, ConfigSubcommand};
use crate::config::CheckConfig;
use crate::error::{Error, Result};
use crate::report::{CheckResult, Report};

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    // Commands that don't need full logging use simple setup
    match &cli.command {
        Commands::Version => {
            version::print_version();
            return;
        }
        Commands::Config { subcommand } => {
            if let Err(e) = logging::init_simple(tracing::Level::WARN) {
                eprint!("{}", e.format_for_terminal());
                std::process::exit(e.exit_code());
            }
            if let Err(e) = handle_config_command(subcommand.clone()) {
                eprint!("{}", e.format_for_terminal());
                std::process::exit(e.exit_code());
            }
            return;
        }
        Commands::Run { .. } => {}
    }

    let (config_path, url_override, output_override) = match cli.command {
        Commands::Run {
            config,
            url,
            output,
        } => (config, url, output),
        _ => unreachable!(),
    };

    // Load config (or use defaults), then apply CLI overrides
    let config = match load_run_config(
        config_path.as_deref(),
        url_override.as_deref(),
        output_override.as_deref(),
    ) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprint!("{}", e.format_for_terminal());
            std::process::exit(e.exit_code());
        }
    };

    // Initialize logging with config settings.
    // The guards must be kept alive until just before exit so the
    // file layer flushes.
    let log_guards = match logging::init_logging(&config.logging, cli.verbose, cli.quiet) {
        Ok(guards) => guards,
        Err(e) => {
            eprint!("{}", e.format_for_terminal());
            std::process::exit(e.exit_code());
        }
    };

    let build = version::build_info();
    info!(
        version = %build.full_version(),
        target_url = %config.page_url(),
        "Starting sitecheck"
    );

    // The suite is strictly sequential; a current-thread runtime is enough
    let exit_code = {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                let err = Error::Internal(format!("Failed to create runtime: {}", e));
                eprint!("{}", err.format_for_terminal());
                std::process::exit(err.exit_code());
            }
        };

        match rt.block_on(run(&config)) {
            Ok(code) => code,
            Err(e) => {
                eprint!("{}", e.format_for_terminal());
                e.exit_code()
            }
        }
    };

    drop(log_guards);
    std::process::exit(exit_code);
}

/// Load the run configuration and fold in CLI overrides
fn load_run_config(
    config_path: Option<&str>,
    url_override: Option<&str>,
    output_override: Option<&str>,
) -> Result<CheckConfig> {
    let mut config = CheckConfig::load(config_path)?;

    if let Some(url) = url_override {
        config.target.base_url = url.to_string();
    }
    if let Some(output) = output_override {
        config.report.path = output.to_string();
    }

    // Overrides can invalidate a previously valid config
    config.validate()?;
    Ok(config)
}

/// Select the execution path and run it, returning the process exit code.
///
/// Capability detection is explicit: `BrowserUnavailable` (no Chromium
/// executable on this host) selects the degraded HTTP-only path, while
/// a launch failure of a detected executable is fatal and propagates.
async fn run(config: &CheckConfig) -> Result<i32> {
    match HeadlessBrowser::launch(&config.browser).await {
        Ok(browser) => run_browser_suite(browser, config).await,
        Err(Error::BrowserUnavailable { message }) => {
            warn!(reason = %message, "No browser automation available, degrading to HTTP probe");
            let result = probe::run_basic_probe(config).await;
            Ok(if result.passed() { 0 } else { 1 })
        }
        Err(e) => Err(e),
    }
}

/// Full browser path: run the suite, close the browser on every exit
/// path, persist the report, print the summary.
async fn run_browser_suite(browser: HeadlessBrowser, config: &CheckConfig) -> Result<i32> {
    println!("Starting visual checks...");

    let report = match browser.new_page().await {
        Ok(page) => CheckSuite::new(config).run(&page).await,
        Err(e) => {
            // Setup failure after launch still produces a report
            let mut report = Report::new();
            report.record(CheckResult::fail_reason("Test Execution", e.to_string()));
            report
        }
    };

    // Teardown happens before the report is emitted, regardless of
    // how the suite went
    browser.close().await?;

    // The summary always prints, even when the report file cannot
    // be written
    report.print_summary();
    report.save(&config.report_path())?;
    println!();
    println!("Results saved to {}", config.report.path);

    Ok(report.exit_code())
}

/// Handle `sitecheck config <subcommand>`
fn handle_config_command(subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show { config } => {
            let cfg = CheckConfig::load(config.as_deref())?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            config::init_config(path.as_deref(), force)?;
        }
        ConfigSubcommand::Validate { config } => {
            match CheckConfig::load(config.as_deref()) {
                Ok(_) => {
                    println!("Configuration is valid.");
                }
                Err(e) => {
                    eprint!("{}", e.format_for_terminal());
                    std::process::exit(e.exit_code());
                }
            }
        }
    }

    Ok(())
}

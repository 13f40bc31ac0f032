//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for sitecheck.

use clap::{Parser, Subcommand};

/// sitecheck - Browser-driven smoke checks for a static website
///
/// Drives a headless Chromium page through a fixed sequence of visual
/// and performance checks against a locally served site, then prints
/// and persists a pass/fail report. Falls back to a plain HTTP status
/// probe when no browser is available.
#[derive(Parser, Debug)]
#[command(name = "sitecheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output except errors (check progress and the
    /// summary still print)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the check suite against the target site
    Run {
        /// Path to configuration file
        #[arg(short, long, env = "SITECHECK_CONFIG")]
        config: Option<String>,

        /// Override the target base URL (e.g. http://localhost:8000)
        #[arg(long, env = "SITECHECK_URL")]
        url: Option<String>,

        /// Override the report output path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verifies that the CLI definition is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from(["sitecheck", "run"]);
        match cli.command {
            Commands::Run { config, url, output } => {
                assert!(config.is_none());
                assert!(url.is_none());
                assert!(output.is_none());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_run_with_overrides() {
        let cli = Cli::parse_from([
            "sitecheck",
            "run",
            "--url",
            "http://localhost:9000",
            "--output",
            "out.json",
        ]);
        match cli.command {
            Commands::Run { url, output, .. } => {
                assert_eq!(url.as_deref(), Some("http://localhost:9000"));
                assert_eq!(output.as_deref(), Some("out.json"));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_verbose_flag_count() {
        let cli = Cli::parse_from(["sitecheck", "-vv", "run"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["sitecheck", "config", "validate"]);
        match cli.command {
            Commands::Config {
                subcommand: ConfigSubcommand::Validate { config },
            } => assert!(config.is_none()),
            _ => panic!("Expected Config Validate"),
        }
    }
}

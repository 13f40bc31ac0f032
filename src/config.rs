//! Configuration system for sitecheck
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (SITECHECK_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Main sitecheck configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Target site settings
    pub target: TargetSettings,

    /// Expected computed colors
    pub colors: ColorSettings,

    /// Viewports exercised by the responsive check
    pub viewports: Vec<ViewportSettings>,

    /// Navigation-timing thresholds
    pub performance: PerformanceSettings,

    /// Browser launch settings
    pub browser: BrowserSettings,

    /// Report output settings
    pub report: ReportSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Target site settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSettings {
    /// Base URL of the served site
    pub base_url: String,

    /// Page path checked by the browser suite
    pub page_path: String,
}

/// Expected computed colors (exact string match against the browser's
/// resolved rgb() form)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    /// Expected body background color
    pub background: String,

    /// Expected body text color
    pub text: String,

    /// Expected accent color
    pub accent: String,
}

/// A single viewport exercised by the responsive check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportSettings {
    /// Viewport name (used in the per-viewport result name)
    pub name: String,

    /// Width in CSS pixels
    pub width: u32,

    /// Height in CSS pixels
    pub height: u32,
}

/// Navigation-timing thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSettings {
    /// Maximum time from navigation start to load-event end (ms)
    pub max_load_time_ms: u64,

    /// Maximum time from navigation start to DOM-content-loaded end (ms)
    pub max_dom_ready_ms: u64,
}

/// Browser launch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Explicit Chromium executable path (auto-detect if not set)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,

    /// Disable the Chromium sandbox (needed in most containers)
    pub no_sandbox: bool,
}

/// Report output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Path of the JSON report, overwritten each run
    pub path: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

// Default implementations

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            target: TargetSettings::default(),
            colors: ColorSettings::default(),
            viewports: default_viewports(),
            performance: PerformanceSettings::default(),
            browser: BrowserSettings::default(),
            report: ReportSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            page_path: "/index.html".to_string(),
        }
    }
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            background: "rgb(0, 0, 0)".to_string(),
            text: "rgb(255, 255, 255)".to_string(),
            accent: "rgb(0, 212, 255)".to_string(),
        }
    }
}

/// The three viewports the responsive check runs against by default
fn default_viewports() -> Vec<ViewportSettings> {
    vec![
        ViewportSettings {
            name: "mobile".to_string(),
            width: 320,
            height: 568,
        },
        ViewportSettings {
            name: "tablet".to_string(),
            width: 768,
            height: 1024,
        },
        ViewportSettings {
            name: "desktop".to_string(),
            width: 1440,
            height: 900,
        },
    ]
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            max_load_time_ms: 1000,
            max_dom_ready_ms: 500,
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            executable: None,
            no_sandbox: false,
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            path: "test_results.json".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            json_format: false,
        }
    }
}

impl CheckConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        let config_file = Self::find_config_file(config_path)?;
        if let Some(path) = config_file {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
            config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
                message: e.to_string(),
                source: Some(e),
            })?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let expanded = shellexpand::tilde(path);
            let path = PathBuf::from(expanded.as_ref());
            if path.exists() {
                return Ok(Some(path));
            } else {
                return Err(Error::ConfigNotFound { path });
            }
        }

        // Search in standard locations
        let search_paths = [
            // Current directory
            PathBuf::from("sitecheck.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("sitecheck").join("config.toml"))
                .unwrap_or_default(),
            // System config (Linux)
            PathBuf::from("/etc/sitecheck/config.toml"),
        ];

        for path in &search_paths {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Target settings
        if let Ok(val) = std::env::var("SITECHECK_BASE_URL") {
            self.target.base_url = val;
        }
        if let Ok(val) = std::env::var("SITECHECK_PAGE_PATH") {
            self.target.page_path = val;
        }

        // Color expectations
        if let Ok(val) = std::env::var("SITECHECK_EXPECTED_BACKGROUND") {
            self.colors.background = val;
        }
        if let Ok(val) = std::env::var("SITECHECK_EXPECTED_TEXT") {
            self.colors.text = val;
        }
        if let Ok(val) = std::env::var("SITECHECK_EXPECTED_ACCENT") {
            self.colors.accent = val;
        }

        // Performance thresholds
        if let Ok(val) = std::env::var("SITECHECK_MAX_LOAD_TIME_MS") {
            if let Ok(n) = val.parse() {
                self.performance.max_load_time_ms = n;
            }
        }
        if let Ok(val) = std::env::var("SITECHECK_MAX_DOM_READY_MS") {
            if let Ok(n) = val.parse() {
                self.performance.max_dom_ready_ms = n;
            }
        }

        // Browser settings
        if let Ok(val) = std::env::var("SITECHECK_BROWSER_EXECUTABLE") {
            self.browser.executable = Some(val);
        }
        if let Ok(val) = std::env::var("SITECHECK_NO_SANDBOX") {
            self.browser.no_sandbox = val.to_lowercase() == "true" || val == "1";
        }

        // Report settings
        if let Ok(val) = std::env::var("SITECHECK_REPORT_PATH") {
            self.report.path = val;
        }

        // Logging settings
        if let Ok(val) = std::env::var("SITECHECK_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("SITECHECK_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("SITECHECK_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        self.report.path = expand_path(&self.report.path);

        if let Some(ref exe) = self.browser.executable {
            self.browser.executable = Some(expand_path(exe));
        }
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate target URL
        if self.target.base_url.is_empty() {
            return Err(Error::Config("Target base URL cannot be empty".to_string()));
        }
        url::Url::parse(&self.target.base_url)
            .map_err(|e| Error::Config(format!("Invalid target base URL: {}", e)))?;
        if !self.target.base_url.starts_with("http://")
            && !self.target.base_url.starts_with("https://")
        {
            return Err(Error::Config(
                "Target base URL must start with http:// or https://".to_string(),
            ));
        }

        // Validate viewports
        if self.viewports.is_empty() {
            return Err(Error::Config(
                "At least one viewport must be configured".to_string(),
            ));
        }
        for vp in &self.viewports {
            if vp.width == 0 || vp.height == 0 {
                return Err(Error::Config(format!(
                    "Viewport '{}' has zero width or height",
                    vp.name
                )));
            }
        }

        // Validate thresholds
        if self.performance.max_load_time_ms == 0 {
            return Err(Error::Config(
                "max_load_time_ms must be greater than zero".to_string(),
            ));
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Full URL of the checked page
    pub fn page_url(&self) -> String {
        format!(
            "{}{}",
            self.target.base_url.trim_end_matches('/'),
            self.target.page_path
        )
    }

    /// URL of the site root (degraded-mode probe target)
    pub fn root_url(&self) -> String {
        format!("{}/", self.target.base_url.trim_end_matches('/'))
    }

    /// Report path as a PathBuf
    pub fn report_path(&self) -> PathBuf {
        PathBuf::from(&self.report.path)
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<()> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| PathBuf::from("sitecheck.toml"));

    // Check if file exists
    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }
    }

    // Generate default config with comments
    let config_content = generate_default_config();

    // Write the file
    fs::write(&config_path, config_content).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    println!("Configuration file created: {}", config_path.display());
    Ok(())
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# sitecheck configuration

[target]
# Base URL of the locally served site
base_url = "http://localhost:8000"

# Page checked by the browser suite
page_path = "/index.html"

[colors]
# Expected computed colors, in the browser's resolved rgb() form
background = "rgb(0, 0, 0)"
text = "rgb(255, 255, 255)"
accent = "rgb(0, 212, 255)"

# Viewports exercised by the responsive check
[[viewports]]
name = "mobile"
width = 320
height = 568

[[viewports]]
name = "tablet"
width = 768
height = 1024

[[viewports]]
name = "desktop"
width = 1440
height = 900

[performance]
# Navigation start -> load event end (ms)
max_load_time_ms = 1000

# Navigation start -> DOM content loaded end (ms)
max_dom_ready_ms = 500

[browser]
# Explicit Chromium executable (comment out to auto-detect)
# executable = "/usr/bin/chromium"

# Disable the Chromium sandbox (needed in most containers)
no_sandbox = false

[report]
# JSON report path, overwritten each run
path = "test_results.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "sitecheck.log"

# JSON formatted logs
json_format = false
"#
    .to_string()
}

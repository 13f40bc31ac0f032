//! Error types for sitecheck
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for sitecheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Connection errors (3xx)
    ConnectionFailed = 300,
    ConnectionTimeout = 301,

    // Browser errors (4xx)
    BrowserUnavailable = 400,
    BrowserLaunch = 401,
    PageNavigation = 402,

    // Evaluation errors (5xx)
    ScriptEvaluation = 500,
    ViewportOverride = 501,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Connection errors
            400..=499 => 40, // Browser errors
            500..=599 => 50, // Evaluation errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for sitecheck
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File write error (report, config template)
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Connection Errors
    // ─────────────────────────────────────────────────────────────

    /// HTTP request failed (degraded-mode probe)
    #[error("Failed to connect to {url}: {message}")]
    ConnectionFailed { url: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Browser Errors
    // ─────────────────────────────────────────────────────────────

    /// No Chromium executable could be found on this host.
    /// Selects the degraded HTTP-only path rather than aborting.
    #[error("Browser automation unavailable: {message}")]
    BrowserUnavailable { message: String },

    /// Chromium was found but failed to start (fatal)
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch { message: String },

    /// Page navigation failed
    #[error("Failed to navigate to {url}: {message}")]
    PageNavigation { url: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Evaluation Errors
    // ─────────────────────────────────────────────────────────────

    /// In-page script evaluation failed
    #[error("Script evaluation failed during '{check}': {message}")]
    ScriptEvaluation { check: String, message: String },

    /// Device metrics override failed
    #[error("Failed to apply viewport {name}: {message}")]
    ViewportOverride { name: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::Config(_) => ErrorCode::ConfigValidation,

            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,
            Error::Json(_) => ErrorCode::IoWrite,

            Error::ConnectionFailed { .. } => ErrorCode::ConnectionFailed,

            Error::BrowserUnavailable { .. } => ErrorCode::BrowserUnavailable,
            Error::BrowserLaunch { .. } => ErrorCode::BrowserLaunch,
            Error::PageNavigation { .. } => ErrorCode::PageNavigation,

            Error::ScriptEvaluation { .. } => ErrorCode::ScriptEvaluation,
            Error::ViewportOverride { .. } => ErrorCode::ViewportOverride,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'sitecheck config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'sitecheck config validate' to see details."
            ),
            Error::Config(_) => Some(
                "Review the configuration file and fix the invalid values."
            ),
            Error::ConnectionFailed { .. } => Some(
                "Make sure the site is being served locally (e.g. 'python3 -m http.server 8000')."
            ),
            Error::BrowserUnavailable { .. } => Some(
                "Install Chromium or Google Chrome, or set browser.executable in the config."
            ),
            Error::BrowserLaunch { .. } => Some(
                "Try browser.no_sandbox = true when running inside a container."
            ),
            Error::PageNavigation { .. } => Some(
                "Verify the target URL is reachable from this machine."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            code.as_str(),
            self
        );

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        let code = self.code();
        format!("[{}] {}", code.as_str(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string() {
        assert_eq!(ErrorCode::ConfigNotFound.as_str(), "E100");
        assert_eq!(ErrorCode::BrowserUnavailable.as_str(), "E400");
        assert_eq!(ErrorCode::InternalError.as_str(), "E900");
    }

    #[test]
    fn test_exit_code_ranges() {
        assert_eq!(ErrorCode::ConfigValidation.exit_code(), 10);
        assert_eq!(ErrorCode::IoWrite.exit_code(), 20);
        assert_eq!(ErrorCode::ConnectionFailed.exit_code(), 30);
        assert_eq!(ErrorCode::BrowserLaunch.exit_code(), 40);
        assert_eq!(ErrorCode::ScriptEvaluation.exit_code(), 50);
        assert_eq!(ErrorCode::InternalError.exit_code(), 90);
    }

    #[test]
    fn test_error_classification() {
        let err = Error::Config("bad value".to_string());
        assert_eq!(err.code(), ErrorCode::ConfigValidation);
        assert_eq!(err.exit_code(), 10);

        let err = Error::BrowserUnavailable {
            message: "no executable".to_string(),
        };
        assert_eq!(err.code(), ErrorCode::BrowserUnavailable);
    }

    #[test]
    fn test_terminal_format_includes_hint() {
        let err = Error::BrowserUnavailable {
            message: "no executable".to_string(),
        };
        let text = err.format_for_terminal();
        assert!(text.contains("E400"));
        assert!(text.contains("Hint"));
    }

    #[test]
    fn test_log_format() {
        let err = Error::Internal("boom".to_string());
        assert_eq!(err.format_for_log(), "[E900] Internal error: boom");
    }
}

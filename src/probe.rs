//! Degraded-mode HTTP probe
//!
//! Used when no browser automation is available on the host: a single
//! GET against the site root, PASS iff the response status is 200.
//! Connection errors are recorded with the error message and fail the
//! run.

use std::time::Duration;

use tracing::{info, warn};

use crate::checks::verdicts;
use crate::config::CheckConfig;
use crate::error::Error;
use crate::report::{CheckResult, CheckStatus};

/// Run the single HTTP status check against the site root and print
/// the result line. The returned result decides the exit code.
pub async fn run_basic_probe(config: &CheckConfig) -> CheckResult {
    println!("Browser automation unavailable. Running basic HTTP test...");

    let url = config.root_url();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_default();

    let result = match client.get(&url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            println!("Server response: {}", status);
            info!(url = %url, status = status, "Probe response");
            verdicts::status_verdict(status)
        }
        Err(e) => {
            let err = Error::ConnectionFailed {
                url: url.clone(),
                message: e.to_string(),
            };
            warn!(error = %err.format_for_log(), "Probe request failed");
            CheckResult::fail_reason("Basic Server", e.to_string())
        }
    };

    match result.status {
        CheckStatus::Pass => println!("✓ Basic server test: PASS"),
        CheckStatus::Fail => {
            println!("✗ Basic server test: FAIL");
            if let Some(ref reason) = result.reason {
                println!("Error: {}", reason);
            }
        }
    }

    result
}

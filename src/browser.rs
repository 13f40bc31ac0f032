//! Headless browser control via the Chrome DevTools Protocol
//!
//! Thin wrapper around chromiumoxide covering exactly what the check
//! suite needs: launch/close, one page, navigation, typed script
//! evaluation, and viewport emulation.
//!
//! Capability detection happens at launch: if no Chromium executable
//! can be found on the host, `launch` returns
//! [`Error::BrowserUnavailable`] and the caller degrades to the
//! HTTP-only probe. A failure to start an executable that *was* found
//! is [`Error::BrowserLaunch`] and treated as fatal.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{BrowserSettings, ViewportSettings};
use crate::error::{Error, Result};

/// A launched headless browser plus its CDP event-handler task
pub struct HeadlessBrowser {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl HeadlessBrowser {
    /// Detect a Chromium executable and launch it headless.
    ///
    /// Executable discovery is part of `BrowserConfig` construction;
    /// a config build failure therefore means "no browser on this
    /// host" and maps to `BrowserUnavailable`.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self> {
        let mut builder = BrowserConfig::builder();

        if settings.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = settings.executable {
            builder = builder.chrome_executable(path);
        }

        let config = builder
            .build()
            .map_err(|message| Error::BrowserUnavailable { message })?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::BrowserLaunch {
                message: e.to_string(),
            })?;

        // Drive CDP events until the connection closes
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!("Browser launched");
        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Open the single page reused by every check
    pub async fn new_page(&self) -> Result<CheckPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::BrowserLaunch {
                message: format!("Failed to open page: {}", e),
            })?;
        Ok(CheckPage { page })
    }

    /// Close the browser. Must run on every exit path, including after
    /// a failed check sequence.
    pub async fn close(mut self) -> Result<()> {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "Browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(error = %e, "Browser did not exit cleanly");
        }
        self.handler_task.abort();
        debug!("Browser closed");
        Ok(())
    }
}

/// The one browser page driven through the check sequence
pub struct CheckPage {
    page: Page,
}

impl CheckPage {
    /// Navigate and wait for the load event
    pub async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| Error::PageNavigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| Error::PageNavigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Evaluate an in-page script and deserialize its return value
    pub async fn evaluate<T: DeserializeOwned>(&self, check: &str, script: &str) -> Result<T> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| Error::ScriptEvaluation {
                check: check.to_string(),
                message: e.to_string(),
            })?;
        result.into_value().map_err(|e| Error::ScriptEvaluation {
            check: check.to_string(),
            message: format!("Unexpected evaluation result: {}", e),
        })
    }

    /// Emulate the given viewport via Emulation.setDeviceMetricsOverride
    pub async fn set_viewport(&self, viewport: &ViewportSettings) -> Result<()> {
        let params = SetDeviceMetricsOverrideParams::builder()
            .width(viewport.width as i64)
            .height(viewport.height as i64)
            .device_scale_factor(1.0)
            .mobile(viewport.width < 768)
            .build()
            .map_err(|message| Error::ViewportOverride {
                name: viewport.name.clone(),
                message,
            })?;

        self.page
            .execute(params)
            .await
            .map_err(|e| Error::ViewportOverride {
                name: viewport.name.clone(),
                message: e.to_string(),
            })?;

        debug!(
            viewport = %viewport.name,
            width = viewport.width,
            height = viewport.height,
            "Viewport applied"
        );
        Ok(())
    }
}

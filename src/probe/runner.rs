//! Page probe - one end-to-end check of a single URL
//!
//! Navigates, waits for readiness, optionally scrolls, checks title and
//! text, and screenshots along the way. Every failure goes through the same
//! path: diagnostic screenshot, then the original error becomes the verdict.
//! The browser is closed on every exit.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::browser::PageDriver;
use crate::core::{Outcome, ProbeError, ProbeRequest, ProbeResult, Result};
use crate::probe::readiness::{confirm_ready, scroll_through, wait_until_ready};
use crate::probe::screenshot::ScreenshotRecorder;

/// Selector whose text is checked for the expected substring
const TEXT_SELECTOR: &str = "body";

/// What a run has learned so far; survives an early exit
#[derive(Debug, Default)]
struct RunState {
    title: String,
    http_status: Option<u16>,
    load_time: Option<Duration>,
}

/// Drives a page through a probe request
pub struct PageProbe<D: PageDriver> {
    driver: D,
}

impl<D: PageDriver> PageProbe<D> {
    /// Create a probe over a driver
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    /// Borrow the underlying driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run the probe. Never fails; failures are part of the result.
    pub async fn run(&self, request: &ProbeRequest) -> ProbeResult {
        let started = Instant::now();
        let mut recorder = ScreenshotRecorder::new(request);
        let mut state = RunState::default();

        let outcome = match self.drive(request, &mut recorder, &mut state, started).await {
            Ok(()) => {
                info!(url = %request.url, "probe passed");
                Outcome::Success
            }
            Err(err) => {
                warn!(url = %request.url, kind = %err.kind(), "probe failed: {}", err);
                recorder
                    .capture_best_effort(&self.driver, Some("failure"))
                    .await;
                Outcome::Failure {
                    kind: err.kind(),
                    reason: err.to_string(),
                }
            }
        };

        if let Err(e) = self.driver.close().await {
            warn!("failed to close browser: {}", e);
        }

        ProbeResult {
            url: request.url.clone(),
            outcome,
            title: state.title,
            http_status: state.http_status,
            load_time: state.load_time.unwrap_or_else(|| started.elapsed()),
            screenshots: recorder.into_paths(),
        }
    }

    async fn drive(
        &self,
        request: &ProbeRequest,
        recorder: &mut ScreenshotRecorder,
        state: &mut RunState,
        started: Instant,
    ) -> Result<()> {
        info!(url = %request.url, "navigating");
        let navigation = tokio::time::timeout(
            request.navigation_timeout,
            self.driver.navigate(&request.url, request.navigation_timeout),
        )
        .await
        .map_err(|_| {
            ProbeError::navigation(format!(
                "timed out after {:.1}s",
                request.navigation_timeout.as_secs_f64()
            ))
        })??;

        state.http_status = navigation.status;
        match navigation.status {
            None => return Err(ProbeError::navigation("page returned no response")),
            Some(status) if status >= 400 => return Err(ProbeError::HttpStatus(status)),
            Some(status) => info!(status, "navigation complete"),
        }

        wait_until_ready(&self.driver, request, recorder, started).await?;
        state.load_time = Some(started.elapsed());

        if request.scroll_steps > 0 {
            scroll_through(&self.driver, request.scroll_steps, request.scroll_pause).await?;
            confirm_ready(&self.driver, request).await?;
        }

        let title = self.driver.title().await?;
        if title.trim().is_empty() {
            return Err(ProbeError::assertion("Page title is empty"));
        }
        state.title = title;

        if let Some(expected) = &request.expected_text {
            let body = self.driver.visible_text(TEXT_SELECTOR).await?;
            if !body.contains(expected.as_str()) {
                return Err(ProbeError::assertion(format!(
                    "Text '{}' not found",
                    expected
                )));
            }
        }

        if recorder.capture_best_effort(&self.driver, None).await.is_none() {
            warn!("final screenshot missing; probe still passes");
        }

        Ok(())
    }
}

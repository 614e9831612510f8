//! Readiness polling
//!
//! Conditions are polled in order against one shared budget, counted from
//! navigation start. Every missed attempt leaves a screenshot behind.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::browser::PageDriver;
use crate::core::{ProbeError, ProbeRequest, ReadinessCondition, Result};
use crate::probe::screenshot::ScreenshotRecorder;

/// Poll every readiness condition until it holds or the budget runs out.
///
/// `started` is when navigation began; time spent navigating counts
/// against the budget.
pub async fn wait_until_ready(
    driver: &dyn PageDriver,
    request: &ProbeRequest,
    recorder: &mut ScreenshotRecorder,
    started: Instant,
) -> Result<()> {
    let mut attempt = 0u32;

    for condition in &request.readiness {
        loop {
            attempt += 1;
            let remaining = request.readiness_budget.saturating_sub(started.elapsed());
            let window = request.attempt_timeout(condition).min(remaining);
            let attempt_started = Instant::now();

            let last_error = match driver.wait_for(condition, window).await {
                Ok(true) => {
                    debug!(%condition, attempt, "ready");
                    break;
                }
                Ok(false) => format!("not satisfied within {:.1}s", window.as_secs_f64()),
                Err(e) => e.to_string(),
            };
            debug!(%condition, attempt, "not ready: {}", last_error);

            let elapsed = started.elapsed();
            let label = format!("wait_{}_{}s", attempt, elapsed.as_secs());
            recorder.capture_best_effort(driver, Some(&label)).await;

            let elapsed = started.elapsed();
            if elapsed >= request.readiness_budget {
                return Err(ProbeError::ReadinessTimeout {
                    condition: condition.to_string(),
                    waited: elapsed,
                    last_error,
                });
            }

            // An attempt that failed early sits out the rest of its window
            let spent = attempt_started.elapsed();
            if spent < window {
                let pause = (window - spent).min(request.readiness_budget - elapsed);
                tokio::time::sleep(pause).await;
            }
        }
    }

    Ok(())
}

/// One last check after scrolling: a single attempt per condition
pub async fn confirm_ready(driver: &dyn PageDriver, request: &ProbeRequest) -> Result<()> {
    for condition in &request.readiness {
        let window = request.attempt_timeout(condition);
        let started = Instant::now();
        let last_error = match driver.wait_for(condition, window).await {
            Ok(true) => continue,
            Ok(false) => format!("not satisfied after scrolling within {:.1}s", window.as_secs_f64()),
            Err(e) => e.to_string(),
        };
        return Err(ProbeError::ReadinessTimeout {
            condition: condition.to_string(),
            waited: started.elapsed(),
            last_error,
        });
    }
    Ok(())
}

/// Scroll positions for `steps` equal steps, top to bottom
pub fn scroll_fractions(steps: u32) -> Vec<f64> {
    (1..=steps)
        .map(|step| f64::from(step) / f64::from(steps))
        .collect()
}

/// Walk the page down in equal steps so lazy content gets a chance to load
pub async fn scroll_through(driver: &dyn PageDriver, steps: u32, pause: Duration) -> Result<()> {
    for fraction in scroll_fractions(steps) {
        driver.scroll_to(fraction).await?;
        debug!(fraction, "scrolled");
        tokio::time::sleep(pause).await;
    }
    Ok(())
}

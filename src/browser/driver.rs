//! Page driver trait for abstracting the browser backend
//!
//! The probe only talks to a page through this trait, so it can run
//! against agent-browser or a scripted driver in tests.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::{ReadinessCondition, Result};

/// What navigation told us about the main document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    /// HTTP status, `None` when no response was observed
    pub status: Option<u16>,
}

/// A single browser page the probe can drive
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Load `url`, giving up after `timeout`
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<Navigation>;

    /// Wait up to `timeout` for `condition`.
    ///
    /// Returns `Ok(false)` when the window elapsed without the condition holding.
    async fn wait_for(&self, condition: &ReadinessCondition, timeout: Duration) -> Result<bool>;

    /// Scroll so the viewport sits at `fraction` (0.0 top, 1.0 bottom) of the page
    async fn scroll_to(&self, fraction: f64) -> Result<()>;

    /// Current document title
    async fn title(&self) -> Result<String>;

    /// Visible text of the first element matching `selector`
    async fn visible_text(&self, selector: &str) -> Result<String>;

    /// Write a PNG screenshot to `path`
    async fn screenshot(&self, path: &Path, full_page: bool) -> Result<()>;

    /// Release the browser
    async fn close(&self) -> Result<()>;
}

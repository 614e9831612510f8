//! Custom error types for pageprobe
//!
//! Provides a unified error handling system across all modules.

use std::time::Duration;

use thiserror::Error;

use crate::core::types::FailureKind;

/// Main error type for probe operations
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Required input (URL, expected text) was not supplied
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// Navigation failed before a response arrived
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Page answered with an error status
    #[error("Page returned HTTP {0}")]
    HttpStatus(u16),

    /// Readiness condition never held within the budget
    #[error("{condition} not ready after {:.1}s: {last_error}", .waited.as_secs_f64())]
    ReadinessTimeout {
        condition: String,
        waited: Duration,
        last_error: String,
    },

    /// Title or text assertion failed
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// Browser automation errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// A bounded browser command ran out of time
    #[error("{operation} timed out after {:.1}s", .after.as_secs_f64())]
    Timeout { operation: String, after: Duration },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Agent-browser not installed
    #[error("agent-browser not found. Install with: npm install -g agent-browser && agent-browser install")]
    AgentBrowserNotFound,
}

/// Convenience Result type for probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

impl ProbeError {
    /// Create a missing input error
    pub fn missing(msg: impl Into<String>) -> Self {
        Self::MissingInput(msg.into())
    }

    /// Create a navigation error
    pub fn navigation(msg: impl Into<String>) -> Self {
        Self::Navigation(msg.into())
    }

    /// Create an assertion error
    pub fn assertion(msg: impl Into<String>) -> Self {
        Self::Assertion(msg.into())
    }

    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Where this error sits in the failure taxonomy.
    ///
    /// Anything the browser or the host throws at us while talking to the
    /// page counts as a navigation failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MissingInput(_) | Self::Config(_) => FailureKind::MissingInput,
            Self::ReadinessTimeout { .. } => FailureKind::ReadinessTimeout,
            Self::Assertion(_) => FailureKind::AssertionFailure,
            Self::Navigation(_)
            | Self::HttpStatus(_)
            | Self::Browser(_)
            | Self::Timeout { .. }
            | Self::Json(_)
            | Self::Http(_)
            | Self::Io(_)
            | Self::AgentBrowserNotFound => FailureKind::NavigationFailure,
        }
    }

    /// True for the error a bounded command returns when its window elapsed
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

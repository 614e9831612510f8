//! Shared types used across pageprobe modules
//!
//! Contains the probe request, readiness conditions and the probe verdict.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};

use crate::core::config::ProbeDefaults;
use crate::core::error::ProbeError;

/// Selector waited for when nothing else is configured
pub const DEFAULT_SELECTOR: &str = "h1";
/// Upper bound on the initial navigation
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(65);
/// Window for one selector-wait attempt
pub const DEFAULT_SELECTOR_TIMEOUT: Duration = Duration::from_secs(5);
/// Window for one network-idle attempt
pub const DEFAULT_NETWORK_IDLE_TIMEOUT: Duration = Duration::from_secs(5);
/// Total time readiness polling may take
pub const DEFAULT_READINESS_BUDGET: Duration = Duration::from_secs(65);
/// Pause after each scroll step
pub const DEFAULT_SCROLL_PAUSE: Duration = Duration::from_millis(500);

/// A predicate telling us the page has rendered enough to check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum ReadinessCondition {
    /// A CSS selector is present in the DOM
    Selector(String),
    /// No network activity for a short quiet period
    NetworkIdle,
}

impl fmt::Display for ReadinessCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadinessCondition::Selector(selector) => write!(f, "selector '{}'", selector),
            ReadinessCondition::NetworkIdle => write!(f, "network idle"),
        }
    }
}

/// One probe's worth of input. Built once, then only borrowed.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    /// Page to load
    pub url: String,
    /// Substring that must appear in the page's visible text
    pub expected_text: Option<String>,
    /// Conditions polled in order after navigation
    pub readiness: Vec<ReadinessCondition>,
    /// Bound on the navigation itself
    pub navigation_timeout: Duration,
    /// Window for one selector-wait attempt
    pub selector_timeout: Duration,
    /// Window for one network-idle attempt
    pub network_idle_timeout: Duration,
    /// Total readiness polling budget
    pub readiness_budget: Duration,
    /// Number of equal scroll steps (0 disables scrolling)
    pub scroll_steps: u32,
    /// Pause after each scroll step
    pub scroll_pause: Duration,
    /// Where screenshots are written
    pub output_dir: PathBuf,
}

impl ProbeRequest {
    /// Create a request with the documented defaults
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            expected_text: None,
            readiness: vec![ReadinessCondition::Selector(DEFAULT_SELECTOR.to_string())],
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            selector_timeout: DEFAULT_SELECTOR_TIMEOUT,
            network_idle_timeout: DEFAULT_NETWORK_IDLE_TIMEOUT,
            readiness_budget: DEFAULT_READINESS_BUDGET,
            scroll_steps: 0,
            scroll_pause: DEFAULT_SCROLL_PAUSE,
            output_dir: PathBuf::from("."),
        }
    }

    /// Create a request from configured defaults
    pub fn from_defaults(url: impl Into<String>, defaults: &ProbeDefaults) -> Self {
        Self {
            url: url.into(),
            expected_text: None,
            readiness: vec![ReadinessCondition::Selector(defaults.selector.clone())],
            navigation_timeout: Duration::from_millis(defaults.navigation_timeout_ms),
            selector_timeout: Duration::from_millis(defaults.selector_timeout_ms),
            network_idle_timeout: Duration::from_millis(defaults.network_idle_timeout_ms),
            readiness_budget: Duration::from_millis(defaults.readiness_budget_ms),
            scroll_steps: defaults.scroll_steps,
            scroll_pause: Duration::from_millis(defaults.scroll_pause_ms),
            output_dir: defaults.output_dir.clone(),
        }
    }

    /// Require a substring in the page's visible text
    pub fn with_expected_text(mut self, text: impl Into<String>) -> Self {
        self.expected_text = Some(text.into());
        self
    }

    /// Replace the readiness conditions
    pub fn with_readiness(mut self, readiness: Vec<ReadinessCondition>) -> Self {
        self.readiness = readiness;
        self
    }

    /// Set the navigation timeout
    pub fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Set both per-attempt readiness windows
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.selector_timeout = timeout;
        self.network_idle_timeout = timeout;
        self
    }

    /// Set the total readiness budget
    pub fn with_readiness_budget(mut self, budget: Duration) -> Self {
        self.readiness_budget = budget;
        self
    }

    /// Enable incremental scrolling
    pub fn with_scroll(mut self, steps: u32, pause: Duration) -> Self {
        self.scroll_steps = steps;
        self.scroll_pause = pause;
        self
    }

    /// Set the screenshot directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Attempt window for a given condition
    pub fn attempt_timeout(&self, condition: &ReadinessCondition) -> Duration {
        match condition {
            ReadinessCondition::Selector(_) => self.selector_timeout,
            ReadinessCondition::NetworkIdle => self.network_idle_timeout,
        }
    }
}

/// Failure taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No URL or required argument
    MissingInput,
    /// Network or browser error, or HTTP status >= 400
    NavigationFailure,
    /// Readiness condition never satisfied within budget
    ReadinessTimeout,
    /// Empty title or missing expected text
    AssertionFailure,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::MissingInput => write!(f, "MissingInput"),
            FailureKind::NavigationFailure => write!(f, "NavigationFailure"),
            FailureKind::ReadinessTimeout => write!(f, "ReadinessTimeout"),
            FailureKind::AssertionFailure => write!(f, "AssertionFailure"),
        }
    }
}

/// Verdict of a probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    Success,
    Failure { kind: FailureKind, reason: String },
}

/// Everything a probe run produced
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    /// Probed URL
    pub url: String,
    /// Pass or fail, with the reason on failure
    pub outcome: Outcome,
    /// Page title (empty only when the run failed before reading it)
    pub title: String,
    /// HTTP status of the main document, when known
    pub http_status: Option<u16>,
    /// Navigation start until readiness, or until the failure
    #[serde(rename = "load_time_secs", serialize_with = "serialize_secs")]
    pub load_time: Duration,
    /// Screenshots written during the run, in order
    pub screenshots: Vec<PathBuf>,
}

impl ProbeResult {
    /// A failed result for a run that never reached the browser
    pub fn from_error(url: impl Into<String>, err: &ProbeError) -> Self {
        Self {
            url: url.into(),
            outcome: Outcome::Failure {
                kind: err.kind(),
                reason: err.to_string(),
            },
            title: String::new(),
            http_status: None,
            load_time: Duration::ZERO,
            screenshots: Vec::new(),
        }
    }

    /// Whether the probe passed
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success)
    }

    /// Failure kind, if the probe failed
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            Outcome::Success => None,
            Outcome::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Failure reason, if the probe failed
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success => None,
            Outcome::Failure { reason, .. } => Some(reason),
        }
    }

    /// Process exit code for this result
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

//! Configuration management for pageprobe
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/pageprobe/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{ProbeError, Result};
use crate::core::types::{
    DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_NETWORK_IDLE_TIMEOUT, DEFAULT_READINESS_BUDGET,
    DEFAULT_SCROLL_PAUSE, DEFAULT_SELECTOR, DEFAULT_SELECTOR_TIMEOUT,
};

/// Main configuration for pageprobe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Browser configuration
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Probe defaults
    #[serde(default)]
    pub probe: ProbeDefaults,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Browser automation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// agent-browser executable
    pub binary: String,
    /// Session name for agent-browser
    pub session_name: String,
    /// Whether to run in headed mode (visible browser)
    pub headed: bool,
    /// Ask the server directly when the browser reports no status
    pub http_status_fallback: bool,
}

/// Defaults applied to every probe request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeDefaults {
    /// Selector to wait for
    /// Default: h1
    pub selector: String,
    /// Navigation timeout in ms
    pub navigation_timeout_ms: u64,
    /// Selector-wait attempt window in ms
    pub selector_timeout_ms: u64,
    /// Network-idle attempt window in ms
    pub network_idle_timeout_ms: u64,
    /// Total readiness budget in ms
    pub readiness_budget_ms: u64,
    /// Scroll steps before the final readiness check
    pub scroll_steps: u32,
    /// Pause after each scroll step in ms
    pub scroll_pause_ms: u64,
    /// Screenshot directory
    pub output_dir: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset
    pub level: String,
    /// Emit JSON log lines
    pub json: bool,
}

fn parse_flag(value: &str) -> bool {
    value == "true" || value == "1"
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().map(|v| parse_flag(&v))
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            binary: env::var("PAGEPROBE_BROWSER_BIN")
                .unwrap_or_else(|_| "agent-browser".to_string()),
            session_name: env::var("PAGEPROBE_BROWSER_SESSION")
                .unwrap_or_else(|_| "pageprobe".to_string()),
            headed: env_flag("PAGEPROBE_BROWSER_HEADED").unwrap_or(false),
            http_status_fallback: true,
        }
    }
}

impl Default for ProbeDefaults {
    fn default() -> Self {
        Self {
            selector: env::var("TEST_SELECTOR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SELECTOR.to_string()),
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT.as_millis() as u64,
            selector_timeout_ms: DEFAULT_SELECTOR_TIMEOUT.as_millis() as u64,
            network_idle_timeout_ms: DEFAULT_NETWORK_IDLE_TIMEOUT.as_millis() as u64,
            readiness_budget_ms: DEFAULT_READINESS_BUDGET.as_millis() as u64,
            scroll_steps: 0,
            scroll_pause_ms: DEFAULT_SCROLL_PAUSE.as_millis() as u64,
            output_dir: env::var("PAGEPROBE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: env::var("PAGEPROBE_LOG").unwrap_or_else(|_| "warn".to_string()),
            json: env_flag("PAGEPROBE_LOG_JSON").unwrap_or(false),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pageprobe")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    ///
    /// A missing file means defaults. A file that cannot be read or parsed
    /// is an error; the caller decides whether to fall back.
    pub fn load() -> Result<Self> {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let config = Self::load_from_file(&Self::config_file())?.unwrap_or_default();
        Ok(config.with_env_overrides(|key| env::var(key).ok()))
    }

    /// Load configuration from a file only. `Ok(None)` when it does not exist.
    pub fn load_from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ProbeError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_toml(&content).map(Some)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ProbeError::config(format!("Failed to parse config: {}", e)))
    }

    /// Env vars win over the config file
    fn with_env_overrides(mut self, env: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(selector) = env("TEST_SELECTOR").filter(|s| !s.trim().is_empty()) {
            self.probe.selector = selector;
        }
        if let Some(binary) = env("PAGEPROBE_BROWSER_BIN").filter(|s| !s.trim().is_empty()) {
            self.browser.binary = binary;
        }
        if let Some(session) = env("PAGEPROBE_BROWSER_SESSION") {
            self.browser.session_name = session;
        }
        if let Some(headed) = env("PAGEPROBE_BROWSER_HEADED") {
            self.browser.headed = parse_flag(&headed);
        }
        if let Some(dir) = env("PAGEPROBE_OUTPUT_DIR") {
            self.probe.output_dir = PathBuf::from(dir);
        }
        if let Some(level) = env("PAGEPROBE_LOG") {
            self.logging.level = level;
        }
        if let Some(json) = env("PAGEPROBE_LOG_JSON") {
            self.logging.json = parse_flag(&json);
        }
        self
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}

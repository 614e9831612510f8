//! Browser executor - wraps agent-browser CLI
//!
//! Provides the async [`PageDriver`] interface on top of agent-browser commands.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::browser::driver::{Navigation, PageDriver};
use crate::core::config::BrowserConfig;
use crate::core::{ProbeError, ReadinessCondition, Result};

/// Bound for commands that have no timeout of their own
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Status of the main document as the browser saw it; 0 when unknown
const NAVIGATION_STATUS_JS: &str = "(() => { const e = performance.getEntriesByType('navigation')[0]; return e && e.responseStatus ? e.responseStatus : 0; })()";

/// Executor for browser automation via agent-browser CLI
pub struct BrowserExecutor {
    /// agent-browser executable
    binary: String,
    /// Session name for isolation
    session_name: String,
    /// Whether to run in headed mode
    headed: bool,
    /// Client for the status fallback, if enabled
    http: Option<reqwest::Client>,
}

impl BrowserExecutor {
    /// Create a new browser executor
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            binary: "agent-browser".to_string(),
            session_name: session_name.into(),
            headed: false,
            http: None,
        }
    }

    /// Create an executor from configuration
    pub fn from_config(config: &BrowserConfig) -> Self {
        let mut executor = Self::new(config.session_name.clone());
        executor.binary = config.binary.clone();
        executor.headed = config.headed;
        if config.http_status_fallback {
            executor.http = Some(reqwest::Client::new());
        }
        executor
    }

    /// Check if agent-browser is installed
    pub async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Run an agent-browser command, killing it if `timeout` elapses first
    async fn run_command(&self, args: &[&str], timeout: Duration) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["--session", &self.session_name]);

        if self.headed {
            cmd.arg("--headed");
        }

        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        debug!(session = %self.session_name, ?args, "agent-browser");

        let output = match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(output) => output,
            Err(_) => {
                return Err(ProbeError::Timeout {
                    operation: format!("agent-browser {}", args.first().unwrap_or(&"")),
                    after: timeout,
                });
            }
        };

        let output = output.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProbeError::AgentBrowserNotFound
            } else {
                ProbeError::browser(format!("Failed to run agent-browser: {}", e))
            }
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ProbeError::browser(format!(
                "agent-browser command failed: {}",
                stderr.trim()
            )))
        }
    }

    /// Evaluate JavaScript in the page
    async fn eval(&self, script: &str) -> Result<String> {
        self.run_command(&["eval", script], COMMAND_TIMEOUT).await
    }

    /// Ask the server directly for the document status
    async fn status_via_http(&self, url: &str, timeout: Duration) -> Option<u16> {
        let client = self.http.as_ref()?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return None;
        }
        match client.get(url).timeout(timeout).send().await {
            Ok(response) => Some(response.status().as_u16()),
            Err(e) => {
                debug!("status fallback for {} failed: {}", url, e);
                None
            }
        }
    }
}

#[async_trait]
impl PageDriver for BrowserExecutor {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<Navigation> {
        self.run_command(&["open", url], timeout)
            .await
            .map_err(|e| match e {
                ProbeError::AgentBrowserNotFound => e,
                other => ProbeError::navigation(other.to_string()),
            })?;

        let mut status = match self.eval(NAVIGATION_STATUS_JS).await {
            Ok(output) => parse_status(&output),
            Err(e) => {
                debug!("could not read navigation status: {}", e);
                None
            }
        };

        if status.is_none() {
            status = self.status_via_http(url, timeout).await;
        }

        Ok(Navigation { status })
    }

    async fn wait_for(&self, condition: &ReadinessCondition, timeout: Duration) -> Result<bool> {
        let result = match condition {
            ReadinessCondition::Selector(selector) => {
                self.run_command(&["wait", selector.as_str()], timeout).await
            }
            ReadinessCondition::NetworkIdle => {
                self.run_command(&["wait", "--load", "networkidle"], timeout)
                    .await
            }
        };

        match result {
            Ok(_) => Ok(true),
            Err(e) if e.is_timeout() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn scroll_to(&self, fraction: f64) -> Result<()> {
        let script = scroll_script(fraction);
        self.eval(&script).await?;
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        self.run_command(&["get", "title"], COMMAND_TIMEOUT)
            .await
            .map(|s| s.trim().to_string())
    }

    async fn visible_text(&self, selector: &str) -> Result<String> {
        self.run_command(&["get", "text", selector], COMMAND_TIMEOUT)
            .await
    }

    async fn screenshot(&self, path: &Path, full_page: bool) -> Result<()> {
        let path = path.to_string_lossy().into_owned();
        let mut args = vec!["screenshot", path.as_str()];

        if full_page {
            args.push("--full");
        }

        self.run_command(&args, COMMAND_TIMEOUT).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.run_command(&["close"], COMMAND_TIMEOUT).await?;
        Ok(())
    }
}

impl Default for BrowserExecutor {
    fn default() -> Self {
        Self::new("pageprobe")
    }
}

/// Pull a status code out of `eval` output; 0 and garbage mean unknown
fn parse_status(output: &str) -> Option<u16> {
    let trimmed = output.trim();
    let value = match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Number(n)) => n.as_u64(),
        Ok(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => trimmed.parse().ok(),
    }?;
    u16::try_from(value).ok().filter(|status| *status > 0)
}

fn scroll_script(fraction: f64) -> String {
    let fraction = fraction.clamp(0.0, 1.0);
    format!(
        "window.scrollTo(0, Math.round((document.body.scrollHeight - window.innerHeight) * {}))",
        fraction
    )
}

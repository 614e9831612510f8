//! Command-line arguments and input resolution
//!
//! Environment variables win; positional arguments are the fallback.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::core::config::ProbeDefaults;
use crate::core::{ProbeError, ProbeRequest, ReadinessCondition, Result};

/// Env var holding the target URL
pub const URL_ENV: &str = "SMOKETEST_URL";
/// Env var holding the expected text
pub const EXPECTED_TEXT_ENV: &str = "EXPECTED_TEXT";

/// Which readiness signals to wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WaitMode {
    /// CSS selector presence
    Selector,
    /// Network idle
    NetworkIdle,
    /// Network idle, then the selector
    Both,
}

/// pageprobe - headless browser smoke test
#[derive(Parser, Debug)]
#[command(name = "pageprobe")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// URL to probe (fallback for SMOKETEST_URL)
    pub url: Option<String>,

    /// Text that must appear on the page (fallback for EXPECTED_TEXT)
    pub expected_text: Option<String>,

    /// CSS selector to wait for (default: TEST_SELECTOR or h1)
    #[arg(long, short = 's')]
    pub selector: Option<String>,

    /// Readiness signals to wait for
    #[arg(long, value_enum, default_value_t = WaitMode::Selector)]
    pub wait: WaitMode,

    /// Scroll the page in this many steps before the final check
    #[arg(long)]
    pub scroll_steps: Option<u32>,

    /// Navigation timeout in seconds
    #[arg(long)]
    pub navigation_timeout: Option<u64>,

    /// Total readiness budget in seconds
    #[arg(long)]
    pub readiness_timeout: Option<u64>,

    /// Directory for screenshots
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Run in headed browser mode (visible window)
    #[arg(long)]
    pub headed: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Log filter when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Print the default config file and exit
    #[arg(long)]
    pub print_config: bool,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Args {
    /// Build the probe request from env, arguments and configured defaults.
    ///
    /// `env` looks up environment variables; pass `|k| std::env::var(k).ok()`.
    pub fn resolve_request(
        &self,
        defaults: &ProbeDefaults,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ProbeRequest> {
        let url = non_empty(env(URL_ENV))
            .or_else(|| non_empty(self.url.clone()))
            .ok_or_else(|| {
                ProbeError::missing("No URL provided. Set SMOKETEST_URL or pass as argument.")
            })?;

        let mut request = ProbeRequest::from_defaults(url, defaults);

        if let Some(text) =
            non_empty(env(EXPECTED_TEXT_ENV)).or_else(|| non_empty(self.expected_text.clone()))
        {
            request = request.with_expected_text(text);
        }

        let selector = non_empty(self.selector.clone()).unwrap_or_else(|| defaults.selector.clone());
        let readiness = match self.wait {
            WaitMode::Selector => vec![ReadinessCondition::Selector(selector)],
            WaitMode::NetworkIdle => vec![ReadinessCondition::NetworkIdle],
            WaitMode::Both => vec![
                ReadinessCondition::NetworkIdle,
                ReadinessCondition::Selector(selector),
            ],
        };
        request = request.with_readiness(readiness);

        if let Some(steps) = self.scroll_steps {
            request.scroll_steps = steps;
        }
        if let Some(secs) = self.navigation_timeout {
            request = request.with_navigation_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.readiness_timeout {
            request = request.with_readiness_budget(Duration::from_secs(secs));
        }
        if let Some(dir) = &self.output_dir {
            request = request.with_output_dir(dir.clone());
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn defaults() -> ProbeDefaults {
        ProbeDefaults {
            selector: "h1".to_string(),
            navigation_timeout_ms: 65_000,
            selector_timeout_ms: 5_000,
            network_idle_timeout_ms: 5_000,
            readiness_budget_ms: 65_000,
            scroll_steps: 0,
            scroll_pause_ms: 500,
            output_dir: PathBuf::from("."),
        }
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_url() {
        let args = Args::parse_from(["pageprobe"]);
        let err = args.resolve_request(&defaults(), env_from(&[])).unwrap_err();
        assert!(matches!(err, ProbeError::MissingInput(_)));
    }

    #[test]
    fn test_positional_fallback() {
        let args = Args::parse_from(["pageprobe", "https://example.com", "Example Domain"]);
        let request = args.resolve_request(&defaults(), env_from(&[])).unwrap();
        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.expected_text.as_deref(), Some("Example Domain"));
        assert_eq!(
            request.readiness,
            vec![ReadinessCondition::Selector("h1".to_string())]
        );
    }

    #[test]
    fn test_env_wins_over_arguments() {
        let args = Args::parse_from(["pageprobe", "https://arg.example", "from args"]);
        let env = env_from(&[
            ("SMOKETEST_URL", "https://env.example"),
            ("EXPECTED_TEXT", "from env"),
        ]);
        let request = args.resolve_request(&defaults(), env).unwrap();
        assert_eq!(request.url, "https://env.example");
        assert_eq!(request.expected_text.as_deref(), Some("from env"));
    }

    #[test]
    fn test_empty_env_falls_back() {
        let args = Args::parse_from(["pageprobe", "https://arg.example"]);
        let env = env_from(&[("SMOKETEST_URL", "  ")]);
        let request = args.resolve_request(&defaults(), env).unwrap();
        assert_eq!(request.url, "https://arg.example");
        assert!(request.expected_text.is_none());
    }

    #[test]
    fn test_print_config_needs_no_url() {
        let args = Args::parse_from(["pageprobe", "--print-config"]);
        assert!(args.print_config);
        assert!(args.url.is_none());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "pageprobe",
            "https://example.com",
            "--wait",
            "both",
            "--selector",
            "#app",
            "--scroll-steps",
            "5",
            "--navigation-timeout",
            "15",
            "--readiness-timeout",
            "20",
            "-o",
            "shots",
        ]);
        let request = args.resolve_request(&defaults(), env_from(&[])).unwrap();
        assert_eq!(
            request.readiness,
            vec![
                ReadinessCondition::NetworkIdle,
                ReadinessCondition::Selector("#app".to_string())
            ]
        );
        assert_eq!(request.scroll_steps, 5);
        assert_eq!(request.navigation_timeout, Duration::from_secs(15));
        assert_eq!(request.readiness_budget, Duration::from_secs(20));
        assert_eq!(request.output_dir, PathBuf::from("shots"));
    }
}

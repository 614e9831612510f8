//! Screenshot naming and capture
//!
//! Files are named `{domain}_{path}_{label}_{timestamp}.png` and written to
//! the request's output directory.

use std::path::PathBuf;

use tracing::{info, warn};
use url::Url;

use crate::browser::PageDriver;
use crate::core::{ProbeRequest, Result};

/// Replace everything outside `[A-Za-z0-9-]` with `_`
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Sanitized `(domain, path)` pair for a URL
fn url_parts(url: &str) -> (String, String) {
    let Ok(parsed) = Url::parse(url) else {
        return ("unknown".to_string(), "home".to_string());
    };

    let host = parsed.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    let domain = match (host.is_empty(), parsed.port()) {
        (true, _) => parsed.scheme().to_string(),
        (false, Some(port)) => format!("{}:{}", host, port),
        (false, None) => host.to_string(),
    };

    let path = parsed.path().trim_matches('/');
    let path = if path.is_empty() {
        "home".to_string()
    } else {
        sanitize(path)
    };

    (sanitize(&domain), path)
}

/// Build a screenshot file name for `url`
pub fn screenshot_filename(url: &str, label: Option<&str>, timestamp: i64) -> String {
    let (domain, path) = url_parts(url);
    match label.filter(|l| !l.is_empty()) {
        Some(label) => format!("{}_{}_{}_{}.png", domain, path, sanitize(label), timestamp),
        None => format!("{}_{}_{}.png", domain, path, timestamp),
    }
}

/// Captures screenshots for one probe run and remembers where they went
pub struct ScreenshotRecorder {
    dir: PathBuf,
    url: String,
    paths: Vec<PathBuf>,
}

impl ScreenshotRecorder {
    /// Recorder writing into the request's output directory
    pub fn new(request: &ProbeRequest) -> Self {
        Self {
            dir: request.output_dir.clone(),
            url: request.url.clone(),
            paths: Vec::new(),
        }
    }

    /// Path the next capture with `label` would use
    pub fn next_path(&self, label: Option<&str>) -> PathBuf {
        let timestamp = chrono::Utc::now().timestamp();
        self.dir
            .join(screenshot_filename(&self.url, label, timestamp))
    }

    /// Take a full-page screenshot
    pub async fn capture(&mut self, driver: &dyn PageDriver, label: Option<&str>) -> Result<PathBuf> {
        if !self.dir.as_os_str().is_empty() {
            tokio::fs::create_dir_all(&self.dir).await?;
        }

        let path = self.next_path(label);
        driver.screenshot(&path, true).await?;
        info!(path = %path.display(), "screenshot saved");

        if !self.paths.contains(&path) {
            self.paths.push(path.clone());
        }
        Ok(path)
    }

    /// Take a screenshot, logging instead of failing
    pub async fn capture_best_effort(
        &mut self,
        driver: &dyn PageDriver,
        label: Option<&str>,
    ) -> Option<PathBuf> {
        match self.capture(driver, label).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("could not capture screenshot: {}", e);
                None
            }
        }
    }

    /// Screenshots captured so far
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Consume the recorder, keeping the paths
    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_strips_www_and_dots() {
        assert_eq!(
            screenshot_filename("https://www.example.com/docs/intro/", Some("text"), 1700000000),
            "example_com_docs_intro_text_1700000000.png"
        );
    }

    #[test]
    fn test_filename_root_path_is_home() {
        assert_eq!(
            screenshot_filename("https://example.com", None, 42),
            "example_com_home_42.png"
        );
        assert_eq!(
            screenshot_filename("https://example.com/", Some(""), 42),
            "example_com_home_42.png"
        );
    }

    #[test]
    fn test_filename_keeps_port_and_sanitizes() {
        assert_eq!(
            screenshot_filename("http://localhost:8080/a b/c.html?q=1", Some("wait_1_5s"), 7),
            "localhost_8080_a_20b_c_html_wait_1_5s_7.png"
        );
    }

    #[test]
    fn test_filename_unparseable_url() {
        assert_eq!(
            screenshot_filename("not a url", Some("failure"), 1),
            "unknown_home_failure_1.png"
        );
    }

    #[test]
    fn test_filename_file_url() {
        assert_eq!(
            screenshot_filename("file:///tmp/page.html", None, 3),
            "file_tmp_page_html_3.png"
        );
    }

    #[test]
    fn test_next_path_in_output_dir() {
        let request = ProbeRequest::new("https://example.com").with_output_dir("shots");
        let recorder = ScreenshotRecorder::new(&request);
        let path = recorder.next_path(Some("failure"));
        assert!(path.starts_with("shots"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("example_com_home_failure_"));
        assert!(name.ends_with(".png"));
        assert!(recorder.paths().is_empty());
    }
}

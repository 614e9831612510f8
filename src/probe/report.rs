//! Human-readable and JSON rendering of probe results

use crate::core::{Outcome, ProbeResult, Result};

/// Summary lines printed after a run
pub fn render_text(result: &ProbeResult, expected_text: Option<&str>) -> String {
    let mut lines = Vec::new();

    match &result.outcome {
        Outcome::Success => {
            lines.push(format!("✅ Page loaded. Title: {}", result.title));
            if let Some(text) = expected_text {
                lines.push(format!("✅ Text '{}' found on page", text));
            }
            lines.push(format!(
                "⏱ Load time: {:.2} seconds",
                result.load_time.as_secs_f64()
            ));
        }
        Outcome::Failure { kind, reason } => {
            lines.push(format!("❌ {} ({})", reason, kind));
        }
    }

    for path in &result.screenshots {
        lines.push(format!("📷 Screenshot saved to '{}'", path.display()));
    }

    lines.join("\n")
}

/// The result as pretty JSON
pub fn render_json(result: &ProbeResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

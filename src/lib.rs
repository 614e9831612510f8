//! pageprobe - headless browser smoke tests
//!
//! Loads a page in a headless browser (driven through agent-browser), waits
//! for it to become ready, checks its status, title and text, and leaves
//! screenshots behind for every checkpoint that matters.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **Browser**: The `PageDriver` seam and the agent-browser executor
//! - **Probe**: Navigation, readiness polling, assertions, screenshots
//! - **CLI**: Argument parsing and env/positional input resolution
//!
//! # Usage
//!
//! ```rust,no_run
//! use pageprobe::{BrowserExecutor, PageProbe, ProbeRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let probe = PageProbe::new(BrowserExecutor::default());
//!     let request = ProbeRequest::new("https://example.com").with_expected_text("Example");
//!
//!     let result = probe.run(&request).await;
//!     println!("{:?}", result.outcome);
//! }
//! ```

pub mod browser;
pub mod cli;
pub mod core;
pub mod probe;

// Re-export commonly used items
pub use crate::browser::{BrowserExecutor, Navigation, PageDriver};
pub use crate::core::{
    Config, FailureKind, Outcome, ProbeError, ProbeRequest, ProbeResult, ReadinessCondition,
    Result,
};
pub use crate::probe::PageProbe;

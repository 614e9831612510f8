//! Probe module - page readiness and assertion checks
//!
//! [`PageProbe`] runs one request against a [`PageDriver`](crate::browser::PageDriver).

pub mod readiness;
pub mod report;
pub mod runner;
pub mod screenshot;

pub use runner::PageProbe;
pub use screenshot::{screenshot_filename, ScreenshotRecorder};

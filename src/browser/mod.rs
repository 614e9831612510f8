//! Browser automation module
//!
//! Wraps agent-browser CLI behind the [`PageDriver`] trait.

mod driver;
mod executor;

pub use driver::{Navigation, PageDriver};
pub use executor::BrowserExecutor;

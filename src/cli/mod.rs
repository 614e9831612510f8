//! CLI module - command-line interface
//!
//! Contains argument parsing and input resolution.

pub mod args;

pub use args::{Args, WaitMode};

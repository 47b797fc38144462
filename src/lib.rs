//! threadline - a TUI planner for scheduled posts and threads
//!
//! This library provides both CLI and TUI interfaces for laying out a week
//! of posts, keeping thread replies correctly spaced after their main post,
//! and generating campaigns from the creation wizard.

pub mod cli;
pub mod core;
pub mod error;
pub mod tui;

pub use error::{Result, ThreadlineError};

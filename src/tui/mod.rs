//! Terminal User Interface module
//!
//! The ratatui board: seven day columns of posts and a thread screen for
//! re-timing replies.

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;

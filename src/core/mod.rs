//! Core functionality for threadline
//!
//! This module contains shared business logic including:
//! - Thread timeline repair
//! - Posts and the weekly board
//! - The campaign creation wizard
//! - Mock content generation
//! - Posting accounts
//! - Application configuration

pub mod accounts;
pub mod board;
pub mod config;
pub mod mock;
pub mod post;
pub mod thread;
pub mod wizard;

pub use accounts::{Account, AccountBook};
pub use board::Board;
pub use config::Config;
pub use mock::{ContentSource, MockContent};
pub use post::{Author, DayOfWeek, Post};
pub use thread::ThreadItem;
pub use wizard::WizardState;

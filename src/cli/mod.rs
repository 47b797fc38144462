//! CLI module for threadline
//!
//! This module contains all CLI command definitions and handlers using clap.

pub mod commands;
pub mod account;
pub mod board;
pub mod campaign;
pub mod config;
pub mod thread;

pub use commands::{Cli, Commands};

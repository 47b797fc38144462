//! Configuration CLI command handlers

use crate::cli::commands::{ConfigCommand, ConfigKey};
use crate::core::config::Config;
use crate::core::post::DEFAULT_MAX_CHARS;
use crate::core::thread::DEFAULT_GAP_SECS;
use crate::error::{Result, ThreadlineError};

/// Handle configuration commands
pub fn handle_config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Set { key, value } => handle_set(key, value),
        ConfigCommand::Get { key } => handle_get(key),
        ConfigCommand::Remove { key } => handle_remove(key),
    }
}

/// Handle setting a configuration value
fn handle_set(key: ConfigKey, value: String) -> Result<()> {
    let mut config = Config::load()?;

    match key {
        ConfigKey::ThreadGap => {
            let secs = parse_number::<i64>(&value, "Thread gap")?;
            config.set_thread_gap(secs)?;
            config.save()?;
            println!("Thread gap set to: {}s", config.thread_gap_secs);
        }
        ConfigKey::DefaultTime => {
            config.set_default_post_time(&value)?;
            config.save()?;
            println!("Default post time set to: {}", config.default_post_time);
        }
        ConfigKey::MaxChars => {
            let max = parse_number::<usize>(&value, "Character limit")?;
            config.set_max_chars(max)?;
            config.save()?;
            println!("Character limit set to: {}", config.max_chars);
        }
    }
    Ok(())
}

/// Handle getting a configuration value
fn handle_get(key: ConfigKey) -> Result<()> {
    let config = Config::load()?;

    match key {
        ConfigKey::ThreadGap => println!("Thread gap: {}s", config.thread_gap_secs),
        ConfigKey::DefaultTime => println!("Default post time: {}", config.default_post_time),
        ConfigKey::MaxChars => println!("Character limit: {}", config.max_chars),
    }
    Ok(())
}

/// Handle resetting a configuration value
fn handle_remove(key: ConfigKey) -> Result<()> {
    let mut config = Config::load()?;
    let defaults = Config::default();

    match key {
        ConfigKey::ThreadGap => {
            config.thread_gap_secs = defaults.thread_gap_secs;
            config.save()?;
            println!("Thread gap reset to default: {}s", DEFAULT_GAP_SECS);
        }
        ConfigKey::DefaultTime => {
            config.default_post_time = defaults.default_post_time;
            config.save()?;
            println!("Default post time reset to default: {}", config.default_post_time);
        }
        ConfigKey::MaxChars => {
            config.max_chars = defaults.max_chars;
            config.save()?;
            println!("Character limit reset to default: {}", DEFAULT_MAX_CHARS);
        }
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| {
        ThreadlineError::InvalidInput(format!("{} must be a whole number, got '{}'", what, value))
    })
}

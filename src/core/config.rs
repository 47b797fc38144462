//! Application configuration management
//!
//! Handles loading and saving application settings including:
//! - Thread reply spacing
//! - Default time for new posts
//! - Post character limit
//! - Posting accounts

use std::fs;
use std::path::PathBuf;

use chrono::{Duration, NaiveTime};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::core::accounts::AccountBook;
use crate::core::post::DEFAULT_MAX_CHARS;
use crate::core::thread::{self, DEFAULT_GAP_SECS};
use crate::error::{Result, ThreadlineError};

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "THREADLINE_CONFIG_DIR";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum spacing between thread replies in seconds
    #[serde(default = "default_gap_secs")]
    pub thread_gap_secs: i64,

    /// Time of day new posts are scheduled at (`HH:MM`)
    #[serde(default = "default_post_time")]
    pub default_post_time: String,

    /// Character limit for a single post
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Posting accounts
    #[serde(default)]
    pub accounts: AccountBook,
}

fn default_gap_secs() -> i64 {
    DEFAULT_GAP_SECS
}

fn default_post_time() -> String {
    "12:00".to_string()
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thread_gap_secs: default_gap_secs(),
            default_post_time: default_post_time(),
            max_chars: default_max_chars(),
            accounts: AccountBook::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, or create default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the configuration directory
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        let project_dirs = ProjectDirs::from("com", "threadline", "threadline")
            .ok_or_else(|| ThreadlineError::Config("Could not determine config directory".into()))?;

        Ok(project_dirs.config_dir().to_path_buf())
    }

    /// Thread spacing as a duration
    pub fn gap(&self) -> Result<Duration> {
        thread::gap_from_secs(self.thread_gap_secs)
    }

    /// Default time for new posts
    pub fn post_time(&self) -> Result<NaiveTime> {
        thread::parse_clock(&self.default_post_time)
    }

    /// Set the thread spacing
    pub fn set_thread_gap(&mut self, secs: i64) -> Result<()> {
        thread::gap_from_secs(secs)?;
        self.thread_gap_secs = secs;
        Ok(())
    }

    /// Set the default post time, normalised to `HH:MM`
    pub fn set_default_post_time(&mut self, value: &str) -> Result<()> {
        let time = thread::parse_clock(value)?;
        self.default_post_time = time.format("%H:%M").to_string();
        Ok(())
    }

    /// Set the character limit
    pub fn set_max_chars(&mut self, max: usize) -> Result<()> {
        if max == 0 {
            return Err(ThreadlineError::InvalidInput(
                "Character limit must be at least 1".to_string(),
            ));
        }
        self.max_chars = max;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.thread_gap_secs, 30);
        assert_eq!(config.default_post_time, "12:00");
        assert_eq!(config.max_chars, 280);
        assert_eq!(config.gap().unwrap(), Duration::seconds(30));
        assert_eq!(config.post_time().unwrap(), NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("thread_gap_secs = 45\n").unwrap();
        assert_eq!(config.thread_gap_secs, 45);
        assert_eq!(config.max_chars, 280);
        assert_eq!(config.accounts, AccountBook::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.set_default_post_time("08:05").unwrap();
        config.accounts.add_generated();

        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_setters_validate() {
        let mut config = Config::default();
        assert!(config.set_thread_gap(0).is_err());
        assert!(config.set_thread_gap(60).is_ok());
        assert!(config.set_thread_gap(86_401).is_err());
        assert!(config.set_thread_gap(i64::MAX).is_err());
        assert_eq!(config.thread_gap_secs, 60);

        assert!(config.set_default_post_time("later").is_err());
        config.set_default_post_time("18:30").unwrap();
        assert_eq!(config.default_post_time, "18:30");

        assert!(config.set_max_chars(0).is_err());
        config.set_max_chars(500).unwrap();
        assert_eq!(config.max_chars, 500);
    }
}

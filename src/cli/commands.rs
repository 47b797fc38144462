//! CLI command definitions using clap
//!
//! Defines the command structure for the `tl` CLI tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// threadline - weekly post and thread scheduler
///
/// Plan posts across the week and keep thread replies correctly spaced.
/// Run without arguments to launch the TUI board.
#[derive(Parser, Debug)]
#[command(name = "tl", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the weekly board
    Board(BoardArgs),

    /// Edit a thread file and keep its replies spaced
    Thread(ThreadArgs),

    /// Generate a campaign schedule
    Campaign(CampaignArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Manage posting accounts
    Account(AccountArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Board Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Board commands
#[derive(Parser, Debug)]
pub struct BoardArgs {
    #[command(subcommand)]
    pub command: BoardCommand,
}

#[derive(Subcommand, Debug)]
pub enum BoardCommand {
    /// Print a week of mock posts
    Show {
        /// Any date in the week to show (defaults to today)
        #[arg(long)]
        week: Option<String>,

        /// Seed for reproducible mock data
        #[arg(long)]
        seed: Option<u64>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Thread Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Thread commands
#[derive(Parser, Debug)]
pub struct ThreadArgs {
    #[command(subcommand)]
    pub command: ThreadCommand,
}

#[derive(Subcommand, Debug)]
pub enum ThreadCommand {
    /// Create a thread file
    New {
        /// Thread file (JSON)
        file: PathBuf,

        /// Main post time (YYYY-MM-DD HH:MM[:SS])
        #[arg(long)]
        root: String,

        /// Number of replies to start with
        #[arg(long, default_value = "0")]
        replies: usize,

        /// Main post text
        #[arg(long, default_value = "")]
        content: String,

        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },

    /// Print a thread's schedule
    Show {
        /// Thread file (JSON)
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Append a reply
    Add {
        /// Thread file (JSON)
        file: PathBuf,

        /// Reply text (defaults to mock content)
        #[arg(long, short)]
        content: Option<String>,
    },

    /// Delete a reply
    Remove {
        /// Thread file (JSON)
        file: PathBuf,

        /// Reply number, starting at 1
        number: usize,
    },

    /// Change a reply's time of day
    SetTime {
        /// Thread file (JSON)
        file: PathBuf,

        /// Reply number, starting at 1
        number: usize,

        /// HH:MM or HH:MM:SS
        time: String,
    },

    /// Change a reply's date, keeping its time of day
    SetDate {
        /// Thread file (JSON)
        file: PathBuf,

        /// Reply number, starting at 1
        number: usize,

        /// YYYY-MM-DD
        date: String,
    },

    /// Set a reply's full timestamp
    SetAt {
        /// Thread file (JSON)
        file: PathBuf,

        /// Reply number, starting at 1
        number: usize,

        /// YYYY-MM-DD HH:MM[:SS]
        at: String,
    },

    /// Move the main post and re-time every reply
    SetRoot {
        /// Thread file (JSON)
        file: PathBuf,

        /// YYYY-MM-DD HH:MM[:SS]
        at: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Campaign Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Content creation method
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MethodArg {
    Youtube,
    Ai,
    Custom,
}

/// Campaign generation options
#[derive(Parser, Debug)]
pub struct CampaignArgs {
    /// How content is created
    #[arg(long, value_enum)]
    pub method: MethodArg,

    /// Video URL (youtube)
    #[arg(long)]
    pub url: Option<String>,

    /// Skip thread replies for video posts (youtube)
    #[arg(long)]
    pub no_threads: bool,

    /// Niche (ai)
    #[arg(long)]
    pub niche: Option<String>,

    /// Content pillar, repeatable (ai)
    #[arg(long = "pillar")]
    pub pillars: Vec<String>,

    /// Tone (ai)
    #[arg(long, default_value = "educational")]
    pub tone: String,

    /// Post text (custom)
    #[arg(long)]
    pub content: Option<String>,

    /// Thread reply text, repeatable (custom)
    #[arg(long = "reply")]
    pub replies: Vec<String>,

    /// Campaign length in days: 7, 14 or 30
    #[arg(long, default_value = "7")]
    pub timeline: u32,

    /// Posting days, comma separated (e.g. mon,wed,fri); defaults to a suggestion
    #[arg(long, value_delimiter = ',')]
    pub days: Vec<String>,

    /// Posts per day (1-5)
    #[arg(long, default_value = "2")]
    pub posts_per_day: u8,

    /// Time slots, comma separated HH:MM; defaults per posts-per-day
    #[arg(long, value_delimiter = ',')]
    pub slots: Vec<String>,

    /// First day of the campaign (defaults to today)
    #[arg(long)]
    pub start: Option<String>,

    /// Seed for reproducible mock content
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration commands
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key
        key: ConfigKey,
        /// Value to set
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: ConfigKey,
    },
    /// Reset a configuration value to its default
    Remove {
        /// Configuration key
        key: ConfigKey,
    },
}

/// Configuration keys
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConfigKey {
    /// Seconds between thread replies
    ThreadGap,
    /// Time of day for new posts (HH:MM)
    DefaultTime,
    /// Post character limit
    MaxChars,
}

// ─────────────────────────────────────────────────────────────────────────────
// Account Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Account commands
#[derive(Parser, Debug)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// List accounts
    List,
    /// Switch the active account
    Use {
        /// Account handle, with or without '@'
        handle: String,
    },
    /// Add a placeholder account
    Add,
}

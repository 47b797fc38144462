//! threadline - weekly post and thread scheduler
//!
//! Run without arguments to launch the TUI board, or use subcommands for CLI mode.
//!
//! Available as the `tl` command.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use threadline::cli::commands::{Cli, Commands};
use threadline::cli::{account, board, campaign, config, thread};
use threadline::error::Result;
use threadline::tui::App;

#[tokio::main]
async fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // No subcommand - launch TUI mode
        None => run_tui().await,
        Some(Commands::Board(args)) => board::handle_board(args.command),
        Some(Commands::Thread(args)) => thread::handle_thread(args.command),
        Some(Commands::Campaign(args)) => campaign::handle_campaign(args),
        Some(Commands::Config(args)) => config::handle_config(args.command),
        Some(Commands::Account(args)) => account::handle_account(args.command),
    }
}

/// Run the TUI application
async fn run_tui() -> Result<()> {
    let mut app = App::new()?;
    app.run().await
}

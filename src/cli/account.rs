//! Account CLI command handlers

use crate::cli::commands::AccountCommand;
use crate::core::config::Config;
use crate::error::Result;

/// Handle account commands
pub fn handle_account(command: AccountCommand) -> Result<()> {
    match command {
        AccountCommand::List => handle_list(),
        AccountCommand::Use { handle } => handle_use(&handle),
        AccountCommand::Add => handle_add(),
    }
}

fn handle_list() -> Result<()> {
    let config = Config::load()?;
    let active = config.accounts.active().map(|a| a.handle.clone());

    for account in &config.accounts.accounts {
        let marker = if active.as_deref() == Some(account.handle.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{} {:<16} {}", marker, account.handle, account.name);
    }
    Ok(())
}

fn handle_use(handle: &str) -> Result<()> {
    let mut config = Config::load()?;
    let account = config.accounts.select(handle)?.clone();
    config.save()?;
    println!("✓ Now posting as {} ({})", account.handle, account.name);
    Ok(())
}

fn handle_add() -> Result<()> {
    let mut config = Config::load()?;
    let account = config.accounts.add_generated().clone();
    config.save()?;
    println!("✓ Added account {} ({})", account.handle, account.name);
    Ok(())
}

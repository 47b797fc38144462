//! Board CLI command handlers

use chrono::Local;

use crate::cli::commands::BoardCommand;
use crate::cli::thread::preview;
use crate::core::board::Board;
use crate::core::config::Config;
use crate::core::mock::MockContent;
use crate::core::thread;
use crate::error::Result;

/// Handle board commands
pub fn handle_board(command: BoardCommand) -> Result<()> {
    match command {
        BoardCommand::Show { week, seed, json } => handle_show(week, seed, json),
    }
}

fn handle_show(week: Option<String>, seed: Option<u64>, json: bool) -> Result<()> {
    let config = Config::load()?;
    let date = match week {
        Some(value) => thread::parse_date(&value)?,
        None => Local::now().date_naive(),
    };

    let mut content = match seed {
        Some(seed) => MockContent::seeded(seed),
        None => MockContent::new(),
    };
    let board = Board::mock(date, &mut content).with_gap(config.gap()?);

    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }

    print_board(&board);
    Ok(())
}

/// Print the board column by column
pub fn print_board(board: &Board) {
    println!();
    println!(
        "  Week of {}  ({} posts)",
        board.week_start.format("%b %-d %Y"),
        board.total_posts()
    );

    for column in &board.columns {
        println!();
        println!(
            "  {} · {} ({})",
            column.title(),
            column.date.format("%b %-d"),
            column.posts.len()
        );

        if column.posts.is_empty() {
            println!("    No posts scheduled.");
            continue;
        }

        for post in &column.posts {
            let thread_marker = if post.thread.is_empty() {
                String::new()
            } else {
                format!("  [+{} replies]", post.thread.len())
            };
            println!(
                "    {}  {:<14} {}{}",
                post.scheduled_at.format("%H:%M"),
                post.author.handle,
                preview(&post.content, 60),
                thread_marker
            );
        }
    }
}

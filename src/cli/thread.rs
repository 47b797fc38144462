//! Thread CLI command handlers
//!
//! A thread lives in a JSON file holding the main post time and its replies.
//! Every command loads the file, applies one timeline operation and writes
//! the result back.

use std::fs;
use std::path::Path;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::cli::commands::ThreadCommand;
use crate::core::config::Config;
use crate::core::mock::{ContentSource, MockContent};
use crate::core::thread::{self, ThreadItem};
use crate::error::{Result, ThreadlineError};

/// On-disk thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadDocument {
    /// Main post time
    pub root: NaiveDateTime,
    /// Main post text
    #[serde(default)]
    pub content: String,
    /// Spacing between replies in seconds
    #[serde(default = "default_gap_secs")]
    pub gap_secs: i64,
    /// Replies in order
    #[serde(default)]
    pub replies: Vec<ThreadItem>,
}

fn default_gap_secs() -> i64 {
    thread::DEFAULT_GAP_SECS
}

impl ThreadDocument {
    pub fn new(root: NaiveDateTime, content: String, gap_secs: i64) -> Self {
        Self {
            root,
            content,
            gap_secs,
            replies: Vec::new(),
        }
    }

    pub fn gap(&self) -> Result<Duration> {
        thread::gap_from_secs(self.gap_secs)
    }

    /// Read a thread file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let doc: ThreadDocument = serde_json::from_str(&contents)?;
        Ok(doc)
    }

    /// Write a thread file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

/// Handle thread commands
pub fn handle_thread(command: ThreadCommand) -> Result<()> {
    match command {
        ThreadCommand::New {
            file,
            root,
            replies,
            content,
            force,
        } => handle_new(&file, &root, replies, content, force),
        ThreadCommand::Show { file, json } => handle_show(&file, json),
        ThreadCommand::Add { file, content } => {
            update(&file, |doc, gap| {
                let text = content.unwrap_or_else(|| MockContent::new().next_reply());
                let id = thread::fresh_reply_id(&doc.replies);
                thread::insert(doc.root, &doc.replies, gap, id, text)
            })
        }
        ThreadCommand::Remove { file, number } => update(&file, |doc, gap| {
            thread::remove(doc.root, &doc.replies, gap, to_index(number)?)
        }),
        ThreadCommand::SetTime { file, number, time } => update(&file, |doc, gap| {
            thread::edit_item_clock(doc.root, &doc.replies, gap, to_index(number)?, &time)
        }),
        ThreadCommand::SetDate { file, number, date } => update(&file, |doc, gap| {
            let date = thread::parse_date(&date)?;
            thread::edit_item_date(doc.root, &doc.replies, gap, to_index(number)?, date)
        }),
        ThreadCommand::SetAt { file, number, at } => update(&file, |doc, gap| {
            let at = thread::parse_timestamp(&at)?;
            thread::edit_item_time(doc.root, &doc.replies, gap, to_index(number)?, at)
        }),
        ThreadCommand::SetRoot { file, at } => {
            let mut doc = ThreadDocument::load(&file)?;
            doc.root = thread::parse_timestamp(&at)?;
            doc.replies = thread::reroot(doc.root, &doc.replies, doc.gap()?)?;
            doc.save(&file)?;
            print_schedule(&doc)
        }
    }
}

fn handle_new(path: &Path, root: &str, replies: usize, content: String, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ThreadlineError::InvalidInput(format!(
            "'{}' already exists. Use --force to overwrite it.",
            path.display()
        )));
    }

    let config = Config::load()?;
    let root = thread::parse_timestamp(root)?;
    let mut doc = ThreadDocument::new(root, content, config.thread_gap_secs);
    let gap = doc.gap()?;

    let mut source = MockContent::new();
    for _ in 0..replies {
        let id = thread::fresh_reply_id(&doc.replies);
        doc.replies = thread::insert(doc.root, &doc.replies, gap, id, source.next_reply())?;
    }

    doc.save(path)?;
    println!("✓ Created thread: {}", path.display());
    print_schedule(&doc)
}

fn handle_show(path: &Path, json: bool) -> Result<()> {
    let doc = ThreadDocument::load(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    print_schedule(&doc)?;

    if let Some(index) = thread::first_violation(doc.root, &doc.replies, doc.gap()?) {
        println!();
        println!(
            "  ! Reply {} is closer than {}s to the one before it.",
            index + 1,
            doc.gap_secs
        );
        println!(
            "    (re-time it with 'tl thread set-at {} {} <time>', or re-space the whole thread",
            path.display(),
            index + 1
        );
        println!("     with 'tl thread set-root' at the same time)");
    }

    Ok(())
}

/// Load, apply one operation, save and print
fn update<F>(path: &Path, op: F) -> Result<()>
where
    F: FnOnce(&ThreadDocument, Duration) -> Result<Vec<ThreadItem>>,
{
    let mut doc = ThreadDocument::load(path)?;
    let gap = doc.gap()?;
    doc.replies = op(&doc, gap)?;
    doc.save(path)?;
    print_schedule(&doc)
}

/// Convert a 1-based reply number to an index
fn to_index(number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| ThreadlineError::InvalidInput("Reply numbers start at 1".to_string()))
}

fn print_schedule(doc: &ThreadDocument) -> Result<()> {
    let gap = doc.gap()?;

    println!();
    println!("  Main post  {}", doc.root.format("%a %b %-d %Y %H:%M:%S"));
    if !doc.content.is_empty() {
        println!("             {}", preview(&doc.content, 60));
    }

    if doc.replies.is_empty() {
        println!("  No replies.");
        return Ok(());
    }

    let label = if doc.replies.len() == 1 { "reply" } else { "replies" };
    println!("  Thread ({} {}):", doc.replies.len(), label);
    for (i, reply) in doc.replies.iter().enumerate() {
        println!(
            "  {:>3}. {}  {:<6} {}",
            i + 1,
            reply.scheduled_at.format("%b %-d %H:%M:%S"),
            thread::offset_label(i, gap),
            preview(&reply.content, 50)
        );
    }
    Ok(())
}

/// First `max` characters of a string with an ellipsis
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_document_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("thread.json");

        let root = thread::parse_timestamp("2026-10-19 12:00").unwrap();
        let mut doc = ThreadDocument::new(root, "main".to_string(), 30);
        doc.replies = thread::insert(root, &doc.replies, doc.gap().unwrap(), "reply-1", "one").unwrap();
        doc.save(&path).unwrap();

        let loaded = ThreadDocument::load(&path).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_minimal_document_defaults() {
        let doc: ThreadDocument = serde_json::from_str(r#"{"root":"2026-10-19T12:00:00"}"#).unwrap();
        assert_eq!(doc.gap_secs, 30);
        assert!(doc.replies.is_empty());
        assert!(doc.content.is_empty());
    }

    #[test]
    fn test_update_applies_operation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("thread.json");
        let root = thread::parse_timestamp("2026-10-19 12:00").unwrap();
        ThreadDocument::new(root, String::new(), 30).save(&path).unwrap();

        update(&path, |doc, gap| thread::insert(doc.root, &doc.replies, gap, "reply-1", "a")).unwrap();
        update(&path, |doc, gap| thread::insert(doc.root, &doc.replies, gap, "reply-2", "b")).unwrap();
        update(&path, |doc, gap| {
            thread::edit_item_time(doc.root, &doc.replies, gap, 0, thread::parse_timestamp("2026-10-19 12:05").unwrap())
        })
        .unwrap();

        let doc = ThreadDocument::load(&path).unwrap();
        assert_eq!(doc.replies[1].scheduled_at, thread::parse_timestamp("2026-10-19 12:05:30").unwrap());
    }

    #[test]
    fn test_out_of_range_gap_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("thread.json");
        let root = thread::parse_timestamp("2026-10-19 12:00").unwrap();
        ThreadDocument::new(root, String::new(), i64::MAX).save(&path).unwrap();

        let err = update(&path, |doc, gap| thread::insert(doc.root, &doc.replies, gap, "reply-1", "a")).unwrap_err();
        assert!(matches!(err, ThreadlineError::InvalidInput(_)));
        assert!(handle_show(&path, false).is_err());
        assert!(ThreadDocument::load(&path).unwrap().replies.is_empty());
    }

    #[test]
    fn test_to_index() {
        assert_eq!(to_index(1).unwrap(), 0);
        assert!(to_index(0).is_err());
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdefghijkl", 8), "abcde...");
    }
}

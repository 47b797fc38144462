//! Scheduled posts and the days they are grouped by

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::core::thread::{self, ThreadItem};
use crate::error::{Result, ThreadlineError};

/// Character limit of a single post
pub const DEFAULT_MAX_CHARS: usize = 280;

/// Counter for generated post ids
static POST_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a post identifier unique within this process
pub fn next_post_id(prefix: &str) -> String {
    let n = POST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", prefix, n)
}

/// Day of the week; weeks start on Monday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Get all days in board order
    pub fn all() -> &'static [DayOfWeek] {
        &[
            DayOfWeek::Monday,
            DayOfWeek::Tuesday,
            DayOfWeek::Wednesday,
            DayOfWeek::Thursday,
            DayOfWeek::Friday,
            DayOfWeek::Saturday,
            DayOfWeek::Sunday,
        ]
    }

    /// Zero-based position from Monday
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Day at a zero-based position from Monday
    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    /// Lowercase identifier
    pub fn id(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    /// Get a human-readable display name
    pub fn title(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    /// Parse from a full name or three-letter abbreviation
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|d| d.id() == lower || (lower.len() == 3 && d.id().starts_with(&lower)))
    }

    /// Day a calendar date falls on
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    /// Date of this day within the week starting at `week_start`
    pub fn date_in_week(&self, week_start: NaiveDate) -> NaiveDate {
        week_start + Duration::days(self.index() as i64)
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        DayOfWeek::all()[day.num_days_from_monday() as usize]
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Monday of the week containing `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Who a post is published as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub handle: String,
}

impl Author {
    pub fn new(name: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: handle.into(),
        }
    }
}

/// A scheduled post, optionally followed by a thread of replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub content: String,
    pub scheduled_at: NaiveDateTime,
    pub author: Author,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub retweets: u32,
    /// Replies, ordered by position
    #[serde(default)]
    pub thread: Vec<ThreadItem>,
}

impl Post {
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        scheduled_at: NaiveDateTime,
        author: Author,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            scheduled_at,
            author,
            likes: 0,
            retweets: 0,
            thread: Vec::new(),
        }
    }

    /// Day the post is scheduled on
    pub fn day(&self) -> DayOfWeek {
        DayOfWeek::of(self.scheduled_at.date())
    }

    /// Character count as shown to the user
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_over_limit(&self, max_chars: usize) -> bool {
        self.char_count() > max_chars
    }

    /// Move the post and re-time its thread against the new root.
    ///
    /// Replies are left as they are when the time does not change.
    pub fn reschedule(mut self, at: NaiveDateTime, gap: Duration) -> Result<Self> {
        if at != self.scheduled_at {
            self.thread = thread::reroot(at, &self.thread, gap)?;
            self.scheduled_at = at;
        }
        Ok(self)
    }

    /// Number of replies in the thread
    pub fn reply_count(&self) -> usize {
        self.thread.len()
    }
}

/// Reject blank content or content over the character limit
pub fn validate_content(content: &str, max_chars: usize) -> Result<()> {
    if content.trim().is_empty() {
        return Err(ThreadlineError::InvalidInput(
            "Post content cannot be empty".to_string(),
        ));
    }

    let len = content.chars().count();
    if len > max_chars {
        return Err(ThreadlineError::ContentTooLong { len, max: max_chars });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::thread::{default_gap, parse_timestamp};

    #[test]
    fn test_day_from_weekday() {
        assert_eq!(DayOfWeek::from(Weekday::Mon), DayOfWeek::Monday);
        assert_eq!(DayOfWeek::from(Weekday::Sun), DayOfWeek::Sunday);
        // 2026-10-19 is a Monday
        let date = NaiveDate::from_ymd_opt(2026, 10, 22).unwrap();
        assert_eq!(DayOfWeek::of(date), DayOfWeek::Thursday);
    }

    #[test]
    fn test_day_parse() {
        assert_eq!(DayOfWeek::parse("Monday"), Some(DayOfWeek::Monday));
        assert_eq!(DayOfWeek::parse("wed"), Some(DayOfWeek::Wednesday));
        assert_eq!(DayOfWeek::parse("sa"), None);
        assert_eq!(DayOfWeek::parse("funday"), None);
    }

    #[test]
    fn test_start_of_week() {
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 25).unwrap();
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(start_of_week(sunday), monday);
        assert_eq!(start_of_week(monday), monday);
        assert_eq!(
            DayOfWeek::Friday.date_in_week(monday),
            NaiveDate::from_ymd_opt(2026, 10, 23).unwrap()
        );
    }

    #[test]
    fn test_validate_content() {
        assert!(validate_content("hello", DEFAULT_MAX_CHARS).is_ok());
        assert!(matches!(
            validate_content("   ", DEFAULT_MAX_CHARS),
            Err(ThreadlineError::InvalidInput(_))
        ));
        let long = "x".repeat(281);
        assert!(matches!(
            validate_content(&long, DEFAULT_MAX_CHARS),
            Err(ThreadlineError::ContentTooLong { len: 281, max: 280 })
        ));
        // Counted in characters, not bytes
        assert!(validate_content(&"é".repeat(280), DEFAULT_MAX_CHARS).is_ok());
    }

    #[test]
    fn test_reschedule_reroots_thread() {
        let root = parse_timestamp("2026-10-19 09:00").unwrap();
        let mut post = Post::new("p", "main", root, Author::new("A", "@a"));
        post.thread = thread::insert(root, &post.thread, default_gap(), "reply-1", "one").unwrap();
        post.thread = thread::insert(root, &post.thread, default_gap(), "reply-2", "two").unwrap();

        let moved = post
            .reschedule(parse_timestamp("2026-10-21 15:00").unwrap(), default_gap())
            .unwrap();
        assert_eq!(moved.day(), DayOfWeek::Wednesday);
        assert_eq!(
            moved.thread[1].scheduled_at,
            parse_timestamp("2026-10-21 15:01:00").unwrap()
        );
    }

    #[test]
    fn test_reschedule_to_same_time_keeps_replies() {
        let root = parse_timestamp("2026-10-19 09:00").unwrap();
        let mut post = Post::new("p", "main", root, Author::new("A", "@a"));
        post.thread = thread::insert(root, &post.thread, default_gap(), "reply-1", "one").unwrap();
        post.thread = thread::insert(root, &post.thread, default_gap(), "reply-2", "two").unwrap();
        post.thread = thread::edit_item_time(
            root,
            &post.thread,
            default_gap(),
            0,
            parse_timestamp("2026-10-19 09:05").unwrap(),
        )
        .unwrap();
        let before = post.thread.clone();

        let same = post.reschedule(root, default_gap()).unwrap();
        assert_eq!(same.thread, before);
        assert_eq!(same.scheduled_at, root);
    }

    #[test]
    fn test_next_post_id_is_unique() {
        assert_ne!(next_post_id("post"), next_post_id("post"));
    }
}

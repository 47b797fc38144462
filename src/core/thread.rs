//! Thread timeline repair
//!
//! A thread is a main post (the root) followed by an ordered list of replies.
//! Every reply must be scheduled at least one gap after its predecessor, and
//! the first reply at least one gap after the root:
//!
//! ```text
//! t[0] >= root + gap
//! t[i] >= t[i-1] + gap
//! ```
//!
//! Position in the list is authoritative; the stored timestamps are derived
//! from it. All operations here are pure: they borrow the current replies and
//! return a new vector.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ThreadlineError};

/// Minimum spacing between thread items, in seconds
pub const DEFAULT_GAP_SECS: i64 = 30;

/// Largest accepted spacing: one day
pub const MAX_GAP_SECS: i64 = 86_400;

/// Prefix used for generated reply identifiers
const REPLY_ID_PREFIX: &str = "reply-";

/// A single reply in a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadItem {
    /// Stable identifier
    pub id: String,
    /// Reply text
    pub content: String,
    /// When the reply goes out
    pub scheduled_at: NaiveDateTime,
}

impl ThreadItem {
    pub fn new(id: impl Into<String>, content: impl Into<String>, scheduled_at: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            scheduled_at,
        }
    }
}

/// Build a gap from a number of seconds
///
/// ## Errors
///
/// - `InvalidInput` - the gap is not between 1 and [`MAX_GAP_SECS`] seconds
pub fn gap_from_secs(secs: i64) -> Result<Duration> {
    if !(1..=MAX_GAP_SECS).contains(&secs) {
        return Err(ThreadlineError::InvalidInput(format!(
            "Thread gap must be between 1 and {} seconds, got {}",
            MAX_GAP_SECS, secs
        )));
    }
    Duration::try_seconds(secs).ok_or_else(|| {
        ThreadlineError::InvalidInput(format!("Thread gap of {} seconds is out of range", secs))
    })
}

/// The default 30 second gap
pub fn default_gap() -> Duration {
    Duration::seconds(DEFAULT_GAP_SECS)
}

/// Re-time every item to sit exactly one gap after its predecessor.
///
/// Any slack between items is discarded. Calling this on its own output
/// returns the same values.
pub fn recalculate(root: NaiveDateTime, items: &[ThreadItem], gap: Duration) -> Result<Vec<ThreadItem>> {
    let mut out = items.to_vec();
    retime_from(root, &mut out, 0, gap)?;
    Ok(out)
}

/// Same as [`recalculate`], named for the case where the main post moved.
pub fn reroot(new_root: NaiveDateTime, items: &[ThreadItem], gap: Duration) -> Result<Vec<ThreadItem>> {
    debug!(root = %new_root, replies = items.len(), "re-rooting thread");
    recalculate(new_root, items, gap)
}

/// The earliest slot available after the last item (or the root).
pub fn next_slot(root: NaiveDateTime, items: &[ThreadItem], gap: Duration) -> Result<NaiveDateTime> {
    after(items.last().map_or(root, |item| item.scheduled_at), gap)
}

/// Append a reply one gap after the current last item.
///
/// Existing items are returned untouched.
pub fn insert(
    root: NaiveDateTime,
    items: &[ThreadItem],
    gap: Duration,
    id: impl Into<String>,
    content: impl Into<String>,
) -> Result<Vec<ThreadItem>> {
    let at = next_slot(root, items, gap)?;
    let mut out = Vec::with_capacity(items.len() + 1);
    out.extend_from_slice(items);
    out.push(ThreadItem::new(id, content, at));
    Ok(out)
}

/// Remove the reply at `index`.
///
/// Items before `index` keep their times. Items that follow are re-timed
/// from the item now preceding them (or the root).
pub fn remove(
    root: NaiveDateTime,
    items: &[ThreadItem],
    gap: Duration,
    index: usize,
) -> Result<Vec<ThreadItem>> {
    check_index(items, index)?;

    let mut out = items.to_vec();
    let removed = out.remove(index);
    debug!(id = %removed.id, index, "removed thread reply");

    let anchor = predecessor_time(root, &out, index);
    retime_from(anchor, &mut out, index, gap)?;
    Ok(out)
}

/// Set the absolute time of the reply at `index`.
///
/// Times earlier than `predecessor + gap` snap to that minimum. Every later
/// reply is then placed exactly one gap after its new predecessor.
pub fn edit_item_time(
    root: NaiveDateTime,
    items: &[ThreadItem],
    gap: Duration,
    index: usize,
    proposed: NaiveDateTime,
) -> Result<Vec<ThreadItem>> {
    check_index(items, index)?;

    let minimum = after(predecessor_time(root, items, index), gap)?;
    let at = proposed.max(minimum);
    if at != proposed {
        debug!(index, %proposed, %minimum, "clamped reply time to minimum");
    }

    let mut out = items.to_vec();
    out[index].scheduled_at = at;
    retime_from(at, &mut out, index + 1, gap)?;
    Ok(out)
}

/// Change only the calendar date of the reply at `index`, keeping its
/// time of day, then clamp and cascade like [`edit_item_time`].
pub fn edit_item_date(
    root: NaiveDateTime,
    items: &[ThreadItem],
    gap: Duration,
    index: usize,
    date: NaiveDate,
) -> Result<Vec<ThreadItem>> {
    check_index(items, index)?;
    let proposed = NaiveDateTime::new(date, items[index].scheduled_at.time());
    edit_item_time(root, items, gap, index, proposed)
}

/// Change only the time of day of the reply at `index`, keeping its date.
///
/// `clock` is `HH:MM` or `HH:MM:SS`.
pub fn edit_item_clock(
    root: NaiveDateTime,
    items: &[ThreadItem],
    gap: Duration,
    index: usize,
    clock: &str,
) -> Result<Vec<ThreadItem>> {
    check_index(items, index)?;
    let time = parse_clock(clock)?;
    let proposed = NaiveDateTime::new(items[index].scheduled_at.date(), time);
    edit_item_time(root, items, gap, index, proposed)
}

/// Index of the first reply that is closer than one gap to its predecessor.
pub fn first_violation(root: NaiveDateTime, items: &[ThreadItem], gap: Duration) -> Option<usize> {
    (0..items.len()).find(|&i| {
        predecessor_time(root, items, i)
            .checked_add_signed(gap)
            .map_or(true, |minimum| items[i].scheduled_at < minimum)
    })
}

/// Earliest time the reply at `index` may be scheduled at.
pub fn minimum_for(root: NaiveDateTime, items: &[ThreadItem], gap: Duration, index: usize) -> Result<NaiveDateTime> {
    after(predecessor_time(root, items, index), gap)
}

/// Label of a reply's nominal offset from the root, e.g. `+60s`.
pub fn offset_label(index: usize, gap: Duration) -> String {
    let steps = i64::try_from(index).unwrap_or(i64::MAX).saturating_add(1);
    let secs = gap.num_seconds().saturating_mul(steps);
    format!("+{}s", secs)
}

/// Generate an identifier that no existing reply uses.
pub fn fresh_reply_id(items: &[ThreadItem]) -> String {
    let next = items
        .iter()
        .filter_map(|item| item.id.strip_prefix(REPLY_ID_PREFIX))
        .filter_map(|n| n.parse::<u64>().ok())
        .max()
        .map_or(1, |n| n + 1);
    format!("{}{}", REPLY_ID_PREFIX, next)
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse `YYYY-MM-DD HH:MM[:SS]` (a `T` separator is also accepted).
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    let trimmed = input.trim();
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| {
            ThreadlineError::InvalidInput(format!(
                "Invalid timestamp '{}'. Expected YYYY-MM-DD HH:MM[:SS]",
                input
            ))
        })
}

/// Parse `YYYY-MM-DD`.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        ThreadlineError::InvalidInput(format!("Invalid date '{}'. Expected YYYY-MM-DD", input))
    })
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_clock(input: &str) -> Result<NaiveTime> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| {
            ThreadlineError::InvalidInput(format!(
                "Invalid time '{}'. Expected HH:MM or HH:MM:SS",
                input
            ))
        })
}

// ─────────────────────────────────────────────────────────────────────────────
// Internals
// ─────────────────────────────────────────────────────────────────────────────

fn check_index(items: &[ThreadItem], index: usize) -> Result<()> {
    if index >= items.len() {
        return Err(ThreadlineError::ReplyNotFound {
            index,
            len: items.len(),
        });
    }
    Ok(())
}

fn predecessor_time(root: NaiveDateTime, items: &[ThreadItem], index: usize) -> NaiveDateTime {
    if index == 0 {
        root
    } else {
        items[index - 1].scheduled_at
    }
}

/// `at + gap`, failing past the last representable time
fn after(at: NaiveDateTime, gap: Duration) -> Result<NaiveDateTime> {
    at.checked_add_signed(gap).ok_or_else(|| {
        ThreadlineError::InvalidInput(format!(
            "{} plus {}s is past the latest supported time",
            at,
            gap.num_seconds()
        ))
    })
}

/// Place `items[from..]` at exact gaps, starting one gap after `anchor`.
fn retime_from(anchor: NaiveDateTime, items: &mut [ThreadItem], from: usize, gap: Duration) -> Result<()> {
    let mut previous = anchor;
    for item in items.iter_mut().skip(from) {
        previous = after(previous, gap)?;
        item.scheduled_at = previous;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn root() -> NaiveDateTime {
        at("2026-10-19 12:00:00")
    }

    fn thread(times: &[&str]) -> Vec<ThreadItem> {
        times
            .iter()
            .enumerate()
            .map(|(i, t)| ThreadItem::new(format!("reply-{}", i + 1), format!("reply {}", i + 1), at(t)))
            .collect()
    }

    fn times(items: &[ThreadItem]) -> Vec<NaiveDateTime> {
        items.iter().map(|i| i.scheduled_at).collect()
    }

    #[test]
    fn test_recalculate_spaces_items_from_root() {
        let items = thread(&["2026-10-20 08:00:00", "2026-10-19 09:00:00", "2026-10-25 23:59:59"]);
        let out = recalculate(root(), &items, default_gap()).unwrap();

        assert_eq!(
            times(&out),
            vec![
                at("2026-10-19 12:00:30"),
                at("2026-10-19 12:01:00"),
                at("2026-10-19 12:01:30"),
            ]
        );
        // Identity and content ride along unchanged
        assert_eq!(out[1].id, "reply-2");
        assert_eq!(out[1].content, "reply 2");
    }

    #[test]
    fn test_recalculate_is_idempotent() {
        let items = thread(&["2026-10-19 13:00:00", "2026-10-19 14:00:00"]);
        let once = recalculate(root(), &items, default_gap()).unwrap();
        let twice = recalculate(root(), &once, default_gap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_recalculate_empty_thread() {
        assert!(recalculate(root(), &[], default_gap()).unwrap().is_empty());
    }

    #[test]
    fn test_insert_into_empty_thread() {
        let out = insert(root(), &[], default_gap(), "reply-1", "first").unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].scheduled_at, at("2026-10-19 12:00:30"));
    }

    #[test]
    fn test_insert_appends_after_last_without_touching_others() {
        let items = thread(&["2026-10-19 12:10:00", "2026-10-19 12:20:00"]);
        let out = insert(root(), &items, default_gap(), "reply-3", "third").unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(&out[..2], &items[..]);
        assert_eq!(out[2].scheduled_at, at("2026-10-19 12:20:30"));
        assert_eq!(out[2].id, "reply-3");
    }

    #[test]
    fn test_edit_item_time_cascades_forward() {
        let items = recalculate(root(), &thread(&["2026-10-19 12:00:00"; 3]), default_gap()).unwrap();
        let out = edit_item_time(root(), &items, default_gap(), 0, at("2026-10-19 12:05:00")).unwrap();

        assert_eq!(
            times(&out),
            vec![
                at("2026-10-19 12:05:00"),
                at("2026-10-19 12:05:30"),
                at("2026-10-19 12:06:00"),
            ]
        );
    }

    #[test]
    fn test_edit_item_time_snaps_to_minimum() {
        let items = recalculate(root(), &thread(&["2026-10-19 12:00:00"; 3]), default_gap()).unwrap();

        // Earlier than the root
        let out = edit_item_time(root(), &items, default_gap(), 0, at("2026-10-19 11:00:00")).unwrap();
        assert_eq!(out[0].scheduled_at, at("2026-10-19 12:00:30"));

        // Earlier than the predecessor of a middle item
        let out = edit_item_time(root(), &items, default_gap(), 1, at("2026-10-19 12:00:31")).unwrap();
        assert_eq!(out[1].scheduled_at, at("2026-10-19 12:01:00"));
        assert_eq!(out[2].scheduled_at, at("2026-10-19 12:01:30"));
    }

    #[test]
    fn test_edit_item_time_never_moves_earlier_items() {
        let items = thread(&["2026-10-19 12:10:00", "2026-10-19 12:20:00", "2026-10-19 12:30:00"]);
        let out = edit_item_time(root(), &items, default_gap(), 1, at("2026-10-19 13:00:00")).unwrap();

        assert_eq!(out[0], items[0]);
        assert_eq!(out[1].scheduled_at, at("2026-10-19 13:00:00"));
        // Slack after the edited item collapses to exactly one gap
        assert_eq!(out[2].scheduled_at, at("2026-10-19 13:00:30"));
    }

    #[test]
    fn test_edit_item_time_rejects_missing_index() {
        let items = thread(&["2026-10-19 12:00:30"]);
        let err = edit_item_time(root(), &items, default_gap(), 1, root()).unwrap_err();
        assert!(matches!(err, ThreadlineError::ReplyNotFound { index: 1, len: 1 }));
    }

    #[test]
    fn test_edit_item_date_keeps_time_of_day() {
        let items = recalculate(root(), &thread(&["2026-10-19 12:00:00"; 2]), default_gap()).unwrap();
        let date = parse_date("2026-10-21").unwrap();
        let out = edit_item_date(root(), &items, default_gap(), 0, date).unwrap();

        assert_eq!(out[0].scheduled_at, at("2026-10-21 12:00:30"));
        assert_eq!(out[1].scheduled_at, at("2026-10-21 12:01:00"));
    }

    #[test]
    fn test_edit_item_date_before_root_snaps() {
        let items = recalculate(root(), &thread(&["2026-10-19 12:00:00"]), default_gap()).unwrap();
        let date = parse_date("2026-10-01").unwrap();
        let out = edit_item_date(root(), &items, default_gap(), 0, date).unwrap();
        assert_eq!(out[0].scheduled_at, at("2026-10-19 12:00:30"));
    }

    #[test]
    fn test_edit_item_clock() {
        let items = recalculate(root(), &thread(&["2026-10-19 12:00:00"; 2]), default_gap()).unwrap();
        let out = edit_item_clock(root(), &items, default_gap(), 1, "18:15").unwrap();

        assert_eq!(out[0], items[0]);
        assert_eq!(out[1].scheduled_at, at("2026-10-19 18:15:00"));

        assert!(matches!(
            edit_item_clock(root(), &items, default_gap(), 0, "25:99"),
            Err(ThreadlineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_remove_keeps_prefix_and_retimes_suffix() {
        let items = thread(&[
            "2026-10-19 12:10:00",
            "2026-10-19 12:20:00",
            "2026-10-19 12:30:00",
            "2026-10-19 12:40:00",
        ]);
        let out = remove(root(), &items, default_gap(), 1).unwrap();

        assert_eq!(out.len(), 3);
        assert_eq!(out[0], items[0]);
        assert_eq!(out[1].id, "reply-3");
        assert_eq!(out[1].scheduled_at, at("2026-10-19 12:10:30"));
        assert_eq!(out[2].scheduled_at, at("2026-10-19 12:11:00"));
    }

    #[test]
    fn test_remove_first_retimes_from_root() {
        let items = recalculate(root(), &thread(&["2026-10-19 12:00:00"; 3]), default_gap()).unwrap();
        let out = remove(root(), &items, default_gap(), 0).unwrap();
        assert_eq!(
            times(&out),
            vec![at("2026-10-19 12:00:30"), at("2026-10-19 12:01:00")]
        );
    }

    #[test]
    fn test_remove_out_of_range() {
        assert!(remove(root(), &[], default_gap(), 0).is_err());
    }

    #[test]
    fn test_first_violation() {
        let ok = recalculate(root(), &thread(&["2026-10-19 12:00:00"; 3]), default_gap()).unwrap();
        assert_eq!(first_violation(root(), &ok, default_gap()), None);

        let bad = thread(&["2026-10-19 12:00:30", "2026-10-19 12:00:45"]);
        assert_eq!(first_violation(root(), &bad, default_gap()), Some(1));

        let before_root = thread(&["2026-10-19 11:59:00"]);
        assert_eq!(first_violation(root(), &before_root, default_gap()), Some(0));
    }

    #[test]
    fn test_custom_gap() {
        let gap = gap_from_secs(90).unwrap();
        let out = recalculate(root(), &thread(&["2026-10-19 12:00:00"; 2]), gap).unwrap();
        assert_eq!(
            times(&out),
            vec![at("2026-10-19 12:01:30"), at("2026-10-19 12:03:00")]
        );
        assert!(gap_from_secs(0).is_err());
        assert!(gap_from_secs(-5).is_err());
    }

    #[test]
    fn test_offset_label() {
        assert_eq!(offset_label(0, default_gap()), "+30s");
        assert_eq!(offset_label(2, default_gap()), "+90s");
    }

    #[test]
    fn test_offset_label_saturates() {
        let gap = gap_from_secs(MAX_GAP_SECS).unwrap();
        assert_eq!(offset_label(usize::MAX, gap), format!("+{}s", i64::MAX));
    }

    #[test]
    fn test_gap_bounds() {
        assert_eq!(gap_from_secs(MAX_GAP_SECS).unwrap(), Duration::days(1));
        assert!(matches!(
            gap_from_secs(MAX_GAP_SECS + 1),
            Err(ThreadlineError::InvalidInput(_))
        ));
        assert!(matches!(
            gap_from_secs(9_000_000_000_000),
            Err(ThreadlineError::InvalidInput(_))
        ));
        assert!(matches!(gap_from_secs(i64::MAX), Err(ThreadlineError::InvalidInput(_))));
    }

    #[test]
    fn test_overflowing_timestamp_is_an_error() {
        let last = NaiveDateTime::MAX;
        let gap = default_gap();

        assert!(matches!(
            insert(last, &[], gap, "reply-1", "late"),
            Err(ThreadlineError::InvalidInput(_))
        ));
        assert!(matches!(
            recalculate(last, &thread(&["2026-10-19 12:00:00"]), gap),
            Err(ThreadlineError::InvalidInput(_))
        ));
        assert!(matches!(next_slot(last, &[], gap), Err(ThreadlineError::InvalidInput(_))));

        // A reply that cannot be followed by another
        let items = vec![ThreadItem::new("reply-1", "a", root()), ThreadItem::new("reply-2", "b", root())];
        assert!(matches!(
            edit_item_time(root(), &items, gap, 0, last),
            Err(ThreadlineError::InvalidInput(_))
        ));
        assert_eq!(first_violation(last, &items, gap), Some(0));
    }

    #[test]
    fn test_fresh_reply_id() {
        assert_eq!(fresh_reply_id(&[]), "reply-1");
        let mut items = thread(&["2026-10-19 12:00:30", "2026-10-19 12:01:00"]);
        items[0].id = "reply-7".to_string();
        items[1].id = "custom".to_string();
        assert_eq!(fresh_reply_id(&items), "reply-8");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2026-10-19 12:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2026-10-19T12:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp(" 2026-10-19 12:00:00 ").unwrap(), expected);
        assert!(matches!(
            parse_timestamp("tomorrow"),
            Err(ThreadlineError::InvalidInput(_))
        ));
        assert!(parse_date("2026-13-01").is_err());
    }
}

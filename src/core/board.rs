//! Weekly scheduling board
//!
//! Seven columns, Monday through Sunday, each holding the posts scheduled on
//! that day. Every operation takes the board by value and returns the
//! updated board.

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::mock::{ContentSource, MockContent};
use crate::core::post::{next_post_id, start_of_week, Author, DayOfWeek, Post};
use crate::core::thread;
use crate::error::{Result, ThreadlineError};

/// One day of the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub day: DayOfWeek,
    pub date: NaiveDate,
    pub posts: Vec<Post>,
}

impl Column {
    /// Display title, e.g. "Monday"
    pub fn title(&self) -> &'static str {
        self.day.title()
    }
}

/// The week's board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Monday of the displayed week
    pub week_start: NaiveDate,
    pub columns: Vec<Column>,
    /// Spacing applied when re-timing threads
    #[serde(skip, default = "thread::default_gap")]
    pub gap: Duration,
}

impl Board {
    /// Create an empty board for the week containing `date`
    pub fn empty(date: NaiveDate) -> Self {
        let week_start = start_of_week(date);
        let columns = DayOfWeek::all()
            .iter()
            .map(|&day| Column {
                day,
                date: day.date_in_week(week_start),
                posts: Vec::new(),
            })
            .collect();

        Self {
            week_start,
            columns,
            gap: thread::default_gap(),
        }
    }

    /// Create a board filled with mock posts
    pub fn mock(date: NaiveDate, content: &mut MockContent) -> Self {
        let mut board = Self::empty(date);
        for (day, posts) in content.week(board.week_start) {
            board.columns[day.index()].posts = posts;
        }
        board
    }

    /// Set the spacing used for thread re-timing
    pub fn with_gap(mut self, gap: Duration) -> Self {
        self.gap = gap;
        self
    }

    pub fn column(&self, day: DayOfWeek) -> &Column {
        &self.columns[day.index()]
    }

    /// Total posts across all days
    pub fn total_posts(&self) -> usize {
        self.columns.iter().map(|c| c.posts.len()).sum()
    }

    /// Total thread replies across all posts
    pub fn total_replies(&self) -> usize {
        self.columns
            .iter()
            .flat_map(|c| c.posts.iter())
            .map(Post::reply_count)
            .sum()
    }

    /// Find a post by id
    pub fn find_post(&self, id: &str) -> Option<(DayOfWeek, usize, &Post)> {
        self.columns.iter().find_map(|c| {
            c.posts
                .iter()
                .position(|p| p.id == id)
                .map(|i| (c.day, i, &c.posts[i]))
        })
    }

    /// Move a post from one position to another, possibly across days.
    ///
    /// The post keeps its hour and minute and takes the date of the target
    /// column. Its thread is re-timed only if that changes the post's time.
    pub fn move_post(
        mut self,
        from: DayOfWeek,
        from_index: usize,
        to: DayOfWeek,
        to_index: usize,
    ) -> Result<Self> {
        if from == to && from_index == to_index {
            return Ok(self);
        }

        let source = &mut self.columns[from.index()].posts;
        if from_index >= source.len() {
            return Err(ThreadlineError::PostIndexOutOfRange {
                day: from,
                index: from_index,
            });
        }
        let post = source.remove(from_index);

        let target_date = to.date_in_week(self.week_start);
        let time = NaiveTime::from_hms_opt(post.scheduled_at.hour(), post.scheduled_at.minute(), 0)
            .unwrap_or(NaiveTime::MIN);
        let post = post.reschedule(target_date.and_time(time), self.gap)?;

        debug!(id = %post.id, %from, %to, to_index, "moved post");

        let target = &mut self.columns[to.index()].posts;
        let index = to_index.min(target.len());
        target.insert(index, post);
        Ok(self)
    }

    /// Store an edited post on `day`.
    ///
    /// Any previous copy is removed from every column. The post is placed on
    /// that day's date at its edited time of day, its thread re-timed, and
    /// the column sorted latest first. Replies keep their times unless the
    /// post's time changed.
    pub fn save_post(mut self, post: Post, day: DayOfWeek) -> Result<Self> {
        for column in &mut self.columns {
            column.posts.retain(|p| p.id != post.id);
        }

        let at = day
            .date_in_week(self.week_start)
            .and_time(post.scheduled_at.time());
        let post = post.reschedule(at, self.gap)?;
        debug!(id = %post.id, %day, "saved post");

        let column = &mut self.columns[day.index()];
        column.posts.push(post);
        sort_latest_first(&mut column.posts);
        Ok(self)
    }

    /// Remove a post from a day
    pub fn delete_post(mut self, id: &str, day: DayOfWeek) -> Result<Self> {
        let posts = &mut self.columns[day.index()].posts;
        let before = posts.len();
        posts.retain(|p| p.id != id);

        if posts.len() == before {
            return Err(ThreadlineError::PostNotFound(id.to_string()));
        }

        debug!(id, %day, "deleted post");
        Ok(self)
    }

    /// Replace a post's text with fresh content
    pub fn regenerate_content(
        mut self,
        id: &str,
        day: DayOfWeek,
        source: &mut dyn ContentSource,
    ) -> Result<Self> {
        let post = self.columns[day.index()]
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ThreadlineError::PostNotFound(id.to_string()))?;

        post.content = source.next_post();
        Ok(self)
    }

    /// Add a new post on `day` at `time`; returns the board and the new id.
    pub fn add_post(
        mut self,
        day: DayOfWeek,
        time: NaiveTime,
        author: Author,
        source: &mut dyn ContentSource,
    ) -> (Self, String) {
        let at = day.date_in_week(self.week_start).and_time(time);
        let post = Post::new(next_post_id("post-new"), source.next_post(), at, author);
        let id = post.id.clone();

        let column = &mut self.columns[day.index()];
        column.posts.push(post);
        sort_latest_first(&mut column.posts);

        debug!(%id, %day, "added post");
        (self, id)
    }

    /// Replace a post's thread, re-timing it against the post
    pub fn set_thread(mut self, id: &str, replies: Vec<thread::ThreadItem>) -> Result<Self> {
        let gap = self.gap;
        let post = self
            .columns
            .iter_mut()
            .flat_map(|c| c.posts.iter_mut())
            .find(|p| p.id == id)
            .ok_or_else(|| ThreadlineError::PostNotFound(id.to_string()))?;

        post.thread = match thread::first_violation(post.scheduled_at, &replies, gap) {
            Some(_) => thread::recalculate(post.scheduled_at, &replies, gap)?,
            None => replies,
        };
        Ok(self)
    }

    /// Place posts that fall inside this week; returns how many were placed
    pub fn place_posts(mut self, posts: Vec<Post>) -> (Self, usize) {
        let week_end = self.week_start + Duration::days(7);
        let mut placed = 0;

        for post in posts {
            let date = post.scheduled_at.date();
            if date < self.week_start || date >= week_end {
                continue;
            }
            let day = post.day();
            self.columns[day.index()].posts.push(post);
            placed += 1;
        }

        for column in &mut self.columns {
            column.posts.sort_by_key(|p| p.scheduled_at);
        }
        (self, placed)
    }
}

fn sort_latest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::MockContentSource;
    use crate::core::thread::parse_timestamp;
    use chrono::NaiveDateTime;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn author() -> Author {
        Author::new("Tester", "@tester")
    }

    fn post(id: &str, at: &str) -> Post {
        Post::new(id, format!("content of {}", id), parse_timestamp(at).unwrap(), author())
    }

    fn board_with(posts: Vec<Post>) -> Board {
        Board::empty(monday()).place_posts(posts).0
    }

    #[test]
    fn test_empty_board_has_seven_dated_columns() {
        let board = Board::empty(NaiveDate::from_ymd_opt(2026, 10, 22).unwrap());
        assert_eq!(board.week_start, monday());
        assert_eq!(board.columns.len(), 7);
        assert_eq!(board.column(DayOfWeek::Sunday).date, NaiveDate::from_ymd_opt(2026, 10, 25).unwrap());
        assert_eq!(board.total_posts(), 0);
    }

    #[test]
    fn test_move_post_across_days_keeps_time_of_day() {
        let mut p = post("a", "2026-10-19 14:45:20");
        p.thread = thread::insert(p.scheduled_at, &p.thread, thread::default_gap(), "reply-1", "r").unwrap();
        let board = board_with(vec![p, post("b", "2026-10-21 09:00")]);

        let board = board
            .move_post(DayOfWeek::Monday, 0, DayOfWeek::Wednesday, 0)
            .unwrap();

        assert!(board.column(DayOfWeek::Monday).posts.is_empty());
        let wednesday = &board.column(DayOfWeek::Wednesday).posts;
        assert_eq!(wednesday[0].id, "a");
        assert_eq!(wednesday[0].scheduled_at, parse_timestamp("2026-10-21 14:45:00").unwrap());
        assert_eq!(
            wednesday[0].thread[0].scheduled_at,
            parse_timestamp("2026-10-21 14:45:30").unwrap()
        );
        assert_eq!(wednesday[1].id, "b");
    }

    #[test]
    fn test_move_post_within_column_reorders() {
        let board = board_with(vec![
            post("a", "2026-10-19 09:00"),
            post("b", "2026-10-19 10:00"),
            post("c", "2026-10-19 11:00"),
        ]);

        let board = board
            .move_post(DayOfWeek::Monday, 0, DayOfWeek::Monday, 2)
            .unwrap();
        let ids: Vec<_> = board.column(DayOfWeek::Monday).posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_post_same_position_is_noop() {
        let board = board_with(vec![post("a", "2026-10-19 09:00:15")]);
        let moved = board.clone().move_post(DayOfWeek::Monday, 0, DayOfWeek::Monday, 0).unwrap();
        assert_eq!(board, moved);
    }

    #[test]
    fn test_move_post_missing_source() {
        let board = Board::empty(monday());
        let err = board
            .move_post(DayOfWeek::Friday, 3, DayOfWeek::Monday, 0)
            .unwrap_err();
        assert!(matches!(err, ThreadlineError::PostIndexOutOfRange { index: 3, .. }));
    }

    #[test]
    fn test_save_post_moves_and_sorts_latest_first() {
        let board = board_with(vec![
            post("a", "2026-10-19 09:00"),
            post("b", "2026-10-20 08:00"),
            post("c", "2026-10-20 20:00"),
        ]);

        let (_, _, original) = board.find_post("a").unwrap();
        let mut edited = original.clone();
        edited.content = "edited".to_string();
        edited.scheduled_at = parse_timestamp("2026-10-19 12:30").unwrap();

        let board = board.save_post(edited, DayOfWeek::Tuesday).unwrap();

        assert!(board.column(DayOfWeek::Monday).posts.is_empty());
        let tuesday: Vec<_> = board.column(DayOfWeek::Tuesday).posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(tuesday, vec!["c", "a", "b"]);

        let (day, _, saved) = board.find_post("a").unwrap();
        assert_eq!(day, DayOfWeek::Tuesday);
        assert_eq!(saved.content, "edited");
        assert_eq!(saved.scheduled_at, parse_timestamp("2026-10-20 12:30").unwrap());
    }

    /// A post at 09:00 whose first reply was pushed to 09:05
    fn post_with_edited_thread() -> Post {
        let mut p = post("a", "2026-10-19 09:00");
        let gap = thread::default_gap();
        p.thread = thread::insert(p.scheduled_at, &p.thread, gap, "reply-1", "one").unwrap();
        p.thread = thread::insert(p.scheduled_at, &p.thread, gap, "reply-2", "two").unwrap();
        p.thread = thread::edit_item_time(
            p.scheduled_at,
            &p.thread,
            gap,
            0,
            parse_timestamp("2026-10-19 09:05").unwrap(),
        )
        .unwrap();
        p
    }

    fn reply_times(board: &Board, id: &str) -> Vec<NaiveDateTime> {
        board
            .find_post(id)
            .unwrap()
            .2
            .thread
            .iter()
            .map(|r| r.scheduled_at)
            .collect()
    }

    #[test]
    fn test_save_content_only_keeps_reply_times() {
        let board = board_with(vec![post_with_edited_thread()]);
        let before = reply_times(&board, "a");
        assert_eq!(
            before,
            vec![
                parse_timestamp("2026-10-19 09:05:00").unwrap(),
                parse_timestamp("2026-10-19 09:05:30").unwrap(),
            ]
        );

        let mut edited = board.find_post("a").unwrap().2.clone();
        edited.content = "new wording".to_string();
        let board = board.save_post(edited, DayOfWeek::Monday).unwrap();

        assert_eq!(reply_times(&board, "a"), before);
        assert_eq!(board.find_post("a").unwrap().2.content, "new wording");
    }

    #[test]
    fn test_reorder_within_column_keeps_reply_times() {
        let board = board_with(vec![post_with_edited_thread(), post("b", "2026-10-19 10:00")]);
        let before = reply_times(&board, "a");

        let board = board
            .move_post(DayOfWeek::Monday, 0, DayOfWeek::Monday, 1)
            .unwrap();

        assert_eq!(board.column(DayOfWeek::Monday).posts[1].id, "a");
        assert_eq!(reply_times(&board, "a"), before);
    }

    #[test]
    fn test_save_with_new_time_reroots_replies() {
        let board = board_with(vec![post_with_edited_thread()]);
        let mut edited = board.find_post("a").unwrap().2.clone();
        edited.scheduled_at = parse_timestamp("2026-10-19 10:00").unwrap();

        let board = board.save_post(edited, DayOfWeek::Monday).unwrap();
        assert_eq!(
            reply_times(&board, "a"),
            vec![
                parse_timestamp("2026-10-19 10:00:30").unwrap(),
                parse_timestamp("2026-10-19 10:01:00").unwrap(),
            ]
        );
    }

    #[test]
    fn test_delete_post() {
        let board = board_with(vec![post("a", "2026-10-19 09:00")]);
        let board = board.delete_post("a", DayOfWeek::Monday).unwrap();
        assert_eq!(board.total_posts(), 0);

        assert!(matches!(
            board.delete_post("a", DayOfWeek::Monday),
            Err(ThreadlineError::PostNotFound(_))
        ));
    }

    #[test]
    fn test_regenerate_content_uses_source() {
        let mut source = MockContentSource::new();
        source
            .expect_next_post()
            .times(1)
            .returning(|| "fresh take".to_string());

        let board = board_with(vec![post("a", "2026-10-23 09:00")]);
        let board = board
            .regenerate_content("a", DayOfWeek::Friday, &mut source)
            .unwrap();
        assert_eq!(board.find_post("a").unwrap().2.content, "fresh take");
    }

    #[test]
    fn test_regenerate_wrong_day() {
        let mut source = MockContentSource::new();
        source.expect_next_post().never();

        let board = board_with(vec![post("a", "2026-10-23 09:00")]);
        assert!(board
            .regenerate_content("a", DayOfWeek::Monday, &mut source)
            .is_err());
    }

    #[test]
    fn test_add_post_at_default_time() {
        let mut source = MockContentSource::new();
        source.expect_next_post().returning(|| "hello".to_string());

        let board = board_with(vec![post("early", "2026-10-22 08:00")]);
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        let (board, id) = board.add_post(DayOfWeek::Thursday, noon, author(), &mut source);

        let thursday = &board.column(DayOfWeek::Thursday).posts;
        assert_eq!(thursday.len(), 2);
        assert_eq!(thursday[0].id, id);
        assert_eq!(thursday[0].scheduled_at, parse_timestamp("2026-10-22 12:00").unwrap());
        assert_eq!(thursday[0].content, "hello");
    }

    #[test]
    fn test_set_thread_repairs_invalid_spacing() {
        let board = board_with(vec![post("a", "2026-10-19 09:00")]);
        let replies = vec![
            thread::ThreadItem::new("reply-1", "x", parse_timestamp("2026-10-19 08:00").unwrap()),
            thread::ThreadItem::new("reply-2", "y", parse_timestamp("2026-10-19 08:00").unwrap()),
        ];

        let board = board.set_thread("a", replies).unwrap();
        let saved = &board.find_post("a").unwrap().2.thread;
        assert_eq!(saved[0].scheduled_at, parse_timestamp("2026-10-19 09:00:30").unwrap());
        assert_eq!(saved[1].scheduled_at, parse_timestamp("2026-10-19 09:01:00").unwrap());
        assert_eq!(board.total_replies(), 2);
    }

    #[test]
    fn test_place_posts_skips_other_weeks() {
        let (board, placed) = Board::empty(monday()).place_posts(vec![
            post("in", "2026-10-25 23:59"),
            post("before", "2026-10-18 12:00"),
            post("after", "2026-10-26 00:00"),
        ]);
        assert_eq!(placed, 1);
        assert_eq!(board.column(DayOfWeek::Sunday).posts[0].id, "in");
    }

    #[test]
    fn test_mock_board() {
        let board = Board::mock(monday(), &mut MockContent::seeded(3));
        assert!(board.total_posts() >= 7);
        assert!(board.columns.iter().all(|c| !c.posts.is_empty()));
    }
}

//! Mock content and board generation
//!
//! Stands in for a real content backend: picks canned post and reply text,
//! random authors and random quarter-hour schedule times.

use chrono::{NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::post::{next_post_id, Author, DayOfWeek, Post};

const MOCK_AUTHORS: [(&str, &str); 4] = [
    ("Sarah Chen", "@sarahcodes"),
    ("Alex Rivera", "@alexr_dev"),
    ("Jordan Park", "@jordanbuilds"),
    ("Taylor Swift", "@taylortech"),
];

const POST_CONTENTS: [&str; 14] = [
    "🚀 Just shipped a new feature! The drag-and-drop experience is *chef's kiss*. What's everyone building today?",
    "Hot take: TypeScript isn't optional anymore. It's essential for any serious project. Fight me 😄",
    "Pro tip: Use CSS Grid for complex layouts. Flexbox is great, but Grid is a game-changer for 2D layouts! 📐",
    "Morning coffee ☕ + good music 🎵 + clean code = perfect workday. What's your productivity stack?",
    "Just discovered a bug that's been in production for 3 months. Nobody noticed. Is this good or bad? 🤔",
    "Reminder: Take breaks! Your brain needs rest to solve complex problems. 🧠💪",
    "The new React 19 features are incredible. Server components are changing how we think about architecture.",
    "Unpopular opinion: Dark mode shouldn't be the default. Fight me in the comments! 🌙☀️",
    "Celebrating 1000 followers! 🎉 Thank you all for the support. More great content coming soon!",
    "Today's goal: Zero meetings. Just deep work on the new dashboard. Wish me luck! 🤞",
    "AI is not replacing developers. It's making us 10x more productive. Embrace the tools! 🤖",
    "Just refactored 2000 lines of code into 200. Feels amazing. Clean code is happy code! ✨",
    "Weekend project: Building a CLI tool in Rust. Wish me luck! 🦀",
    "Best investment in 2024: A good mechanical keyboard. My WPM went up by 20! ⌨️",
];

const REPLY_CONTENTS: [&str; 8] = [
    "Here's the thing most people miss: consistency beats intensity every time. 🧵",
    "Step two: write it down. If it isn't documented, it doesn't exist.",
    "The results after 30 days surprised even me. Numbers below 👇",
    "What I'd do differently: start smaller and ship sooner.",
    "Bonus tip: automate the boring parts first. Your future self will thank you.",
    "If you found this useful, a repost helps more people see it 🙏",
    "Questions? Drop them below and I'll answer every one.",
    "TL;DR: pick one thing, do it daily, measure it weekly.",
];

/// Source of post and reply text
#[cfg_attr(test, mockall::automock)]
pub trait ContentSource {
    /// Text for a new top-level post
    fn next_post(&mut self) -> String;

    /// Text for a new thread reply
    fn next_reply(&mut self) -> String;
}

/// Canned content picked at random
pub struct MockContent {
    rng: StdRng,
}

impl MockContent {
    /// Create a generator seeded from the OS
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator with reproducible output
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick a random mock author
    pub fn author(&mut self) -> Author {
        let (name, handle) = MOCK_AUTHORS[self.rng.gen_range(0..MOCK_AUTHORS.len())];
        Author::new(name, handle)
    }

    /// Random time between 08:00 and 19:45 on a quarter hour
    pub fn quarter_hour(&mut self) -> NaiveTime {
        let hour = self.rng.gen_range(8..20);
        let minute = self.rng.gen_range(0..4) * 15;
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Generate the posts for one week, keyed by day.
    ///
    /// Each day gets one to three posts sorted earliest first.
    pub fn week(&mut self, week_start: NaiveDate) -> Vec<(DayOfWeek, Vec<Post>)> {
        DayOfWeek::all()
            .iter()
            .map(|&day| {
                let date = day.date_in_week(week_start);
                let count = self.rng.gen_range(1..=3);
                let mut posts: Vec<Post> = (0..count)
                    .map(|i| {
                        let content = POST_CONTENTS[(day.index() * 2 + i) % POST_CONTENTS.len()];
                        let at = date.and_time(self.quarter_hour());
                        let author = self.author();
                        let mut post = Post::new(next_post_id("post"), content, at, author);
                        post.likes = self.rng.gen_range(10..510);
                        post.retweets = self.rng.gen_range(5..105);
                        post
                    })
                    .collect();
                posts.sort_by_key(|p| p.scheduled_at);
                (day, posts)
            })
            .collect()
    }
}

impl Default for MockContent {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSource for MockContent {
    fn next_post(&mut self) -> String {
        POST_CONTENTS[self.rng.gen_range(0..POST_CONTENTS.len())].to_string()
    }

    fn next_reply(&mut self) -> String {
        REPLY_CONTENTS[self.rng.gen_range(0..REPLY_CONTENTS.len())].to_string()
    }
}

/// All mock authors
pub fn mock_authors() -> Vec<Author> {
    MOCK_AUTHORS
        .iter()
        .map(|(name, handle)| Author::new(*name, *handle))
        .collect()
}

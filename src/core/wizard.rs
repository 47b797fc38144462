//! Campaign creation wizard
//!
//! Three steps: choose how content is created, configure the campaign
//! schedule, then review and generate the posts. The state is a plain value;
//! every update consumes it and returns the next state.

use chrono::{Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::mock::ContentSource;
use crate::core::post::{next_post_id, validate_content, Author, DayOfWeek, Post};
use crate::core::thread;
use crate::error::{Result, ThreadlineError};

/// Niches offered by the AI creation method
pub const DEFAULT_NICHES: [&str; 10] = [
    "Tech & SaaS",
    "Personal Finance",
    "Health & Fitness",
    "Marketing",
    "Entrepreneurship",
    "Productivity",
    "AI & Machine Learning",
    "Web Development",
    "Crypto & Web3",
    "Career Growth",
];

/// Content pillars offered by the AI creation method
pub const DEFAULT_CONTENT_PILLARS: [&str; 10] = [
    "Tips & How-tos",
    "Industry News",
    "Personal Stories",
    "Case Studies",
    "Opinions & Hot Takes",
    "Tutorials",
    "Motivation",
    "Behind the Scenes",
    "Tools & Resources",
    "Q&A",
];

/// Slots handed out, in order, when the posts-per-day count changes
const DEFAULT_TIME_SLOTS: [&str; 5] = ["09:00", "12:00", "15:00", "18:00", "21:00"];

/// Maximum posts per day a campaign may schedule
pub const MAX_POSTS_PER_DAY: u8 = 5;

/// Replies attached to each post generated from a video
const VIDEO_THREAD_REPLIES: usize = 3;

/// Wizard steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WizardStep {
    #[default]
    CreateContent,
    CampaignSettings,
    Review,
}

impl WizardStep {
    /// One-based step number
    pub fn number(&self) -> usize {
        match self {
            WizardStep::CreateContent => 1,
            WizardStep::CampaignSettings => 2,
            WizardStep::Review => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::CreateContent => "Create Content",
            WizardStep::CampaignSettings => "Campaign Settings",
            WizardStep::Review => "Review & Generate",
        }
    }
}

/// Voice used for AI generated posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Educational,
    Professional,
    Casual,
    Humorous,
    Inspirational,
    Controversial,
}

impl Tone {
    pub fn all() -> &'static [Tone] {
        &[
            Tone::Educational,
            Tone::Professional,
            Tone::Casual,
            Tone::Humorous,
            Tone::Inspirational,
            Tone::Controversial,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tone::Educational => "Educational",
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Humorous => "Humorous",
            Tone::Inspirational => "Inspirational",
            Tone::Controversial => "Controversial",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tone::Educational => "Teach and inform",
            Tone::Professional => "Business-focused",
            Tone::Casual => "Friendly & relaxed",
            Tone::Humorous => "Fun & witty",
            Tone::Inspirational => "Motivating",
            Tone::Controversial => "Bold opinions",
        }
    }
}

/// Which creation method is selected, without its settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    YouTube,
    Ai,
    Custom,
}

/// How the campaign's content is produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum CreationMethod {
    /// Repurpose a video
    YouTube { url: String, include_threads: bool },
    /// Generate from a niche and content pillars
    Ai {
        niche: String,
        custom_niche: String,
        content_pillars: Vec<String>,
        tone: Tone,
    },
    /// Hand-written post with optional thread replies
    Custom { content: String, threads: Vec<String> },
}

impl CreationMethod {
    /// Fresh settings for a method
    pub fn blank(kind: MethodKind) -> Self {
        match kind {
            MethodKind::YouTube => CreationMethod::YouTube {
                url: String::new(),
                include_threads: true,
            },
            MethodKind::Ai => CreationMethod::Ai {
                niche: String::new(),
                custom_niche: String::new(),
                content_pillars: Vec::new(),
                tone: Tone::default(),
            },
            MethodKind::Custom => CreationMethod::Custom {
                content: String::new(),
                threads: Vec::new(),
            },
        }
    }

    pub fn kind(&self) -> MethodKind {
        match self {
            CreationMethod::YouTube { .. } => MethodKind::YouTube,
            CreationMethod::Ai { .. } => MethodKind::Ai,
            CreationMethod::Custom { .. } => MethodKind::Custom,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CreationMethod::YouTube { .. } => "From YouTube Video",
            CreationMethod::Ai { .. } => "AI Generated",
            CreationMethod::Custom { .. } => "Custom Tweet",
        }
    }

    /// Explain why the settings are incomplete, if they are
    fn missing(&self) -> Option<&'static str> {
        match self {
            CreationMethod::YouTube { url, .. } if url.trim().is_empty() => {
                Some("enter a YouTube video URL")
            }
            CreationMethod::Ai {
                niche,
                custom_niche,
                ..
            } if niche.trim().is_empty() && custom_niche.trim().is_empty() => {
                Some("choose a niche")
            }
            CreationMethod::Ai {
                content_pillars, ..
            } if content_pillars.is_empty() => Some("pick at least one content pillar"),
            CreationMethod::Custom { content, .. } if content.trim().is_empty() => {
                Some("write the post content")
            }
            _ => None,
        }
    }
}

/// Campaign length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timeline {
    #[default]
    OneWeek,
    TwoWeeks,
    OneMonth,
}

impl Timeline {
    pub fn days(&self) -> i64 {
        match self {
            Timeline::OneWeek => 7,
            Timeline::TwoWeeks => 14,
            Timeline::OneMonth => 30,
        }
    }

    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            7 => Some(Timeline::OneWeek),
            14 => Some(Timeline::TwoWeeks),
            30 => Some(Timeline::OneMonth),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Timeline::OneWeek => "1 Week",
            Timeline::TwoWeeks => "2 Weeks",
            Timeline::OneMonth => "1 Month",
        }
    }
}

/// When and how often to post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignConfig {
    pub timeline: Timeline,
    pub posting_days: Vec<DayOfWeek>,
    pub posts_per_day: u8,
    /// `HH:MM`, one per post each day
    pub time_slots: Vec<String>,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            timeline: Timeline::default(),
            posting_days: Vec::new(),
            posts_per_day: 2,
            time_slots: vec!["09:00".to_string(), "18:00".to_string()],
        }
    }
}

impl CampaignConfig {
    fn missing(&self) -> Option<String> {
        if self.posting_days.is_empty() {
            return Some("select at least one posting day".to_string());
        }
        if self.time_slots.len() != self.posts_per_day as usize {
            return Some(format!(
                "set {} time slots (found {})",
                self.posts_per_day,
                self.time_slots.len()
            ));
        }
        self.time_slots
            .iter()
            .find(|slot| thread::parse_clock(slot).is_err())
            .map(|slot| format!("fix time slot '{}'", slot))
    }
}

/// The first `count` default slots
pub fn default_time_slots(count: u8) -> Vec<String> {
    DEFAULT_TIME_SLOTS
        .iter()
        .take(count as usize)
        .map(|s| s.to_string())
        .collect()
}

/// Suggested posting days for a campaign created on `today`.
///
/// Prefers Monday and Wednesday while they are still ahead this week, then
/// Thursday and Friday, and otherwise next week's Monday and Wednesday.
pub fn default_posting_days(today: Weekday) -> Vec<DayOfWeek> {
    // 0 = Sunday
    let today = today.num_days_from_sunday();
    let mut days = Vec::new();

    if today < 1 {
        days.push(DayOfWeek::Monday);
    }
    if today < 3 {
        days.push(DayOfWeek::Wednesday);
    }

    if days.is_empty() {
        if today < 4 {
            days.push(DayOfWeek::Thursday);
        }
        if today < 5 {
            days.push(DayOfWeek::Friday);
        }
        if days.is_empty() {
            days.extend([DayOfWeek::Monday, DayOfWeek::Wednesday]);
        }
    }

    days
}

/// Full wizard state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WizardState {
    pub step: WizardStep,
    pub method: Option<CreationMethod>,
    pub campaign: CampaignConfig,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a creation method, keeping its settings if already selected
    pub fn select_method(mut self, kind: MethodKind) -> Self {
        if self.method.as_ref().map(CreationMethod::kind) != Some(kind) {
            self.method = Some(CreationMethod::blank(kind));
        }
        self
    }

    /// Replace the creation method and its settings
    pub fn with_method(mut self, method: CreationMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Pick a niche from the list, clearing any custom niche
    pub fn select_niche(mut self, selected: &str) -> Self {
        if let Some(CreationMethod::Ai {
            niche,
            custom_niche,
            ..
        }) = &mut self.method
        {
            *niche = selected.to_string();
            custom_niche.clear();
        }
        self
    }

    /// Add or remove a content pillar
    pub fn toggle_pillar(mut self, pillar: &str) -> Self {
        if let Some(CreationMethod::Ai {
            content_pillars, ..
        }) = &mut self.method
        {
            toggle(content_pillars, pillar.to_string());
        }
        self
    }

    pub fn set_timeline(mut self, timeline: Timeline) -> Self {
        self.campaign.timeline = timeline;
        self
    }

    /// Add or remove a posting day
    pub fn toggle_day(mut self, day: DayOfWeek) -> Self {
        toggle(&mut self.campaign.posting_days, day);
        self
    }

    /// Fill in suggested posting days if none are chosen yet
    pub fn with_default_days(mut self, today: Weekday) -> Self {
        if self.campaign.posting_days.is_empty() {
            self.campaign.posting_days = default_posting_days(today);
        }
        self
    }

    /// Change the number of posts per day; time slots reset to defaults
    pub fn set_posts_per_day(mut self, count: u8) -> Result<Self> {
        if count == 0 || count > MAX_POSTS_PER_DAY {
            return Err(ThreadlineError::InvalidInput(format!(
                "Posts per day must be between 1 and {}, got {}",
                MAX_POSTS_PER_DAY, count
            )));
        }
        self.campaign.posts_per_day = count;
        self.campaign.time_slots = default_time_slots(count);
        Ok(self)
    }

    /// Change one time slot
    pub fn set_time_slot(mut self, index: usize, value: &str) -> Result<Self> {
        let time = thread::parse_clock(value)?;
        let slot = self
            .campaign
            .time_slots
            .get_mut(index)
            .ok_or_else(|| ThreadlineError::InvalidInput(format!("No time slot #{}", index + 1)))?;
        *slot = time.format("%H:%M").to_string();
        Ok(self)
    }

    /// Check the current step can be completed
    pub fn validate_step(&self) -> Result<()> {
        let missing = match self.step {
            WizardStep::CreateContent => match &self.method {
                None => Some("choose a creation method".to_string()),
                Some(method) => method.missing().map(str::to_string),
            },
            WizardStep::CampaignSettings => self.campaign.missing(),
            WizardStep::Review => None,
        };

        match missing {
            Some(reason) => Err(ThreadlineError::IncompleteStep(reason)),
            None => Ok(()),
        }
    }

    pub fn is_step_valid(&self) -> bool {
        self.validate_step().is_ok()
    }

    /// Advance to the next step if the current one is complete
    pub fn next(mut self) -> Result<Self> {
        self.validate_step()?;
        self.step = match self.step {
            WizardStep::CreateContent => WizardStep::CampaignSettings,
            WizardStep::CampaignSettings | WizardStep::Review => WizardStep::Review,
        };
        Ok(self)
    }

    /// Return to the previous step
    pub fn back(mut self) -> Self {
        self.step = match self.step {
            WizardStep::CreateContent | WizardStep::CampaignSettings => WizardStep::CreateContent,
            WizardStep::Review => WizardStep::CampaignSettings,
        };
        self
    }

    /// Rough post count shown before generating
    pub fn estimated_total_posts(&self) -> usize {
        let weeks = (self.campaign.timeline.days() as usize).div_ceil(7);
        weeks * self.campaign.posting_days.len() * self.campaign.posts_per_day as usize
    }

    /// Day after the campaign's last day
    pub fn end_date(&self, start: NaiveDate) -> NaiveDate {
        start + Duration::days(self.campaign.timeline.days())
    }

    /// Produce the campaign's posts starting on `start`.
    ///
    /// One post per time slot on every posting day within the timeline.
    pub fn generate(
        &self,
        start: NaiveDate,
        source: &mut dyn ContentSource,
        author: &Author,
        gap: Duration,
        max_chars: usize,
    ) -> Result<Vec<Post>> {
        let method = self.method.as_ref().ok_or_else(|| {
            ThreadlineError::IncompleteStep("choose a creation method".to_string())
        })?;
        if let Some(reason) = method.missing() {
            return Err(ThreadlineError::IncompleteStep(reason.to_string()));
        }
        if let Some(reason) = self.campaign.missing() {
            return Err(ThreadlineError::IncompleteStep(reason));
        }
        if let CreationMethod::Custom { content, threads } = method {
            validate_content(content, max_chars)?;
            for reply in threads {
                validate_content(reply, max_chars)?;
            }
        }

        let mut slots = self
            .campaign
            .time_slots
            .iter()
            .map(|s| thread::parse_clock(s))
            .collect::<Result<Vec<_>>>()?;
        slots.sort();

        let mut posts = Vec::new();
        for offset in 0..self.campaign.timeline.days() {
            let date = start + Duration::days(offset);
            if !self.campaign.posting_days.contains(&DayOfWeek::of(date)) {
                continue;
            }

            for &time in &slots {
                let at = date.and_time(time);
                let (content, replies) = match method {
                    CreationMethod::Custom { content, threads } => (content.clone(), threads.clone()),
                    CreationMethod::YouTube {
                        include_threads: true,
                        ..
                    } => (
                        source.next_post(),
                        (0..VIDEO_THREAD_REPLIES).map(|_| source.next_reply()).collect(),
                    ),
                    _ => (source.next_post(), Vec::new()),
                };

                let mut post = Post::new(next_post_id("campaign"), content, at, author.clone());
                for reply in replies {
                    let id = thread::fresh_reply_id(&post.thread);
                    post.thread = thread::insert(at, &post.thread, gap, id, reply)?;
                }
                posts.push(post);
            }
        }

        debug!(count = posts.len(), method = method.label(), "generated campaign");
        Ok(posts)
    }
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, value: T) {
    if let Some(pos) = items.iter().position(|v| *v == value) {
        items.remove(pos);
    } else {
        items.push(value);
    }
}

//! Campaign CLI command handler
//!
//! Runs the creation wizard non-interactively: the flags fill in each step,
//! each step is validated before moving on, and the review step generates
//! the posts.

use chrono::{Datelike, Local};

use crate::cli::commands::{CampaignArgs, MethodArg};
use crate::cli::thread::preview;
use crate::core::config::Config;
use crate::core::mock::MockContent;
use crate::core::post::{validate_content, DayOfWeek};
use crate::core::thread;
use crate::core::wizard::{CreationMethod, Timeline, Tone, WizardState};
use crate::error::{Result, ThreadlineError};

/// Handle the campaign command
pub fn handle_campaign(args: CampaignArgs) -> Result<()> {
    let config = Config::load()?;
    let start = match &args.start {
        Some(value) => thread::parse_date(value)?,
        None => Local::now().date_naive(),
    };

    let state = build_state(&args, start.weekday(), config.max_chars)?;

    // Step 1 → Step 2 → Review
    let state = state.next()?;
    let state = state.next()?;

    let author = config
        .accounts
        .active()
        .map(|a| a.author())
        .ok_or_else(|| ThreadlineError::Config("No posting accounts configured".to_string()))?;

    let mut source = match args.seed {
        Some(seed) => MockContent::seeded(seed),
        None => MockContent::new(),
    };
    let posts = state.generate(start, &mut source, &author, config.gap()?, config.max_chars)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    let method = state.method.as_ref().map_or("", CreationMethod::label);
    println!();
    println!("  Campaign: {} · {}", method, state.campaign.timeline.label());
    println!(
        "  {} → {}  ({} posts, estimated {})",
        start.format("%b %-d"),
        state.end_date(start).format("%b %-d %Y"),
        posts.len(),
        state.estimated_total_posts()
    );
    println!("  Posting as {}", author.handle);
    println!();

    for post in &posts {
        println!(
            "  {}  {}",
            post.scheduled_at.format("%a %b %-d %H:%M"),
            preview(&post.content, 60)
        );
        for reply in &post.thread {
            println!(
                "      ↳ {}  {}",
                reply.scheduled_at.format("%H:%M:%S"),
                preview(&reply.content, 54)
            );
        }
    }

    Ok(())
}

/// Fill in the wizard from command-line flags
fn build_state(args: &CampaignArgs, today: chrono::Weekday, max_chars: usize) -> Result<WizardState> {
    let method = match args.method {
        MethodArg::Youtube => CreationMethod::YouTube {
            url: args.url.clone().unwrap_or_default(),
            include_threads: !args.no_threads,
        },
        MethodArg::Ai => {
            let tone = parse_tone(&args.tone)?;
            CreationMethod::Ai {
                niche: args.niche.clone().unwrap_or_default(),
                custom_niche: String::new(),
                content_pillars: args.pillars.clone(),
                tone,
            }
        }
        MethodArg::Custom => {
            let content = args.content.clone().unwrap_or_default();
            if !content.trim().is_empty() {
                validate_content(&content, max_chars)?;
            }
            CreationMethod::Custom {
                content,
                threads: args.replies.clone(),
            }
        }
    };

    let timeline = Timeline::from_days(args.timeline).ok_or_else(|| {
        ThreadlineError::InvalidInput(format!(
            "Timeline must be 7, 14 or 30 days, got {}",
            args.timeline
        ))
    })?;

    let mut state = WizardState::new()
        .with_method(method)
        .set_timeline(timeline)
        .set_posts_per_day(args.posts_per_day)?;

    for day in &args.days {
        let day = DayOfWeek::parse(day)
            .ok_or_else(|| ThreadlineError::InvalidInput(format!("Unknown day '{}'", day)))?;
        if !state.campaign.posting_days.contains(&day) {
            state = state.toggle_day(day);
        }
    }
    state = state.with_default_days(today);

    for (i, slot) in args.slots.iter().enumerate() {
        if i >= state.campaign.time_slots.len() {
            return Err(ThreadlineError::InvalidInput(format!(
                "Got {} time slots for {} posts per day",
                args.slots.len(),
                args.posts_per_day
            )));
        }
        state = state.set_time_slot(i, slot)?;
    }

    Ok(state)
}

fn parse_tone(value: &str) -> Result<Tone> {
    Tone::all()
        .iter()
        .copied()
        .find(|t| t.label().eq_ignore_ascii_case(value.trim()))
        .ok_or_else(|| {
            ThreadlineError::InvalidInput(format!(
                "Invalid tone '{}'. Available tones: {}",
                value,
                Tone::all()
                    .iter()
                    .map(|t| t.label().to_lowercase())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tone() {
        assert_eq!(parse_tone("casual").unwrap(), Tone::Casual);
        assert_eq!(parse_tone("Humorous").unwrap(), Tone::Humorous);
        assert!(parse_tone("angry").is_err());
    }
}

//! Study plan generation.
//!
//! Splits a study session into fixed focus blocks with short breaks. The
//! rendered text is part of the transcript format, so its wording is stable.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::knowledge::Subject;

pub const BLOCK_MINUTES: u64 = 25;
pub const SHORT_BREAK_MINUTES: u64 = 5;
pub const DEFAULT_TOTAL_MINUTES: u64 = 120;

/// Longest plan we render, in hours. Bounds the reply at 2000 block lines.
pub const MAX_HOURS: u64 = 1000;

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfor\s+(\d+)\s*(?:hours?|hrs?|h)\b").expect("Invalid regex: plan duration")
});

static TRAILING_TOPIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfor\s+([a-z]+)[.!?]*$").expect("Invalid regex: plan topic")
});

/// A parsed study plan, ready to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub total_minutes: u64,
    pub blocks: u64,
    pub focus: Option<Subject>,
}

impl StudyPlan {
    /// Build a plan from the free-text request.
    pub fn from_request(text: &str) -> Self {
        let total_minutes = parse_hours(text)
            .map(|hours| hours * 60)
            .unwrap_or(DEFAULT_TOTAL_MINUTES);

        Self::with_total(total_minutes, parse_focus(text))
    }

    pub fn with_total(total_minutes: u64, focus: Option<Subject>) -> Self {
        let blocks = (total_minutes / (BLOCK_MINUTES + SHORT_BREAK_MINUTES)).max(1);
        Self {
            total_minutes,
            blocks,
            focus,
        }
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.blocks as usize + 4);
        lines.push(format!("Study Plan (~{} minutes):", self.total_minutes));
        for i in 1..=self.blocks {
            lines.push(format!(
                "• Block {}: {} min focused study + {} min break",
                i, BLOCK_MINUTES, SHORT_BREAK_MINUTES
            ));
        }
        lines.push("• After 3–4 blocks take a longer 20–30 min break.".to_string());
        if let Some(subject) = self.focus {
            lines.push(format!(
                "Focus topic: {}. Try to divide the topic into 3 subtopics.",
                subject.display_name()
            ));
        }
        lines.push("Tip: Remove distractions, set a clear goal for each block.".to_string());
        lines.join("\n")
    }
}

/// Explicit "for N hours" duration. Zero counts as no duration.
fn parse_hours(text: &str) -> Option<u64> {
    let caps = DURATION_PATTERN.captures(text)?;
    let hours = match caps[1].parse::<u64>() {
        Ok(hours) => hours,
        // more digits than fit in a u64, clamp like any other long plan
        Err(_) => MAX_HOURS,
    };
    (hours > 0).then(|| hours.min(MAX_HOURS))
}

/// Trailing "for <subject>" at the very end of the request.
fn parse_focus(text: &str) -> Option<Subject> {
    let caps = TRAILING_TOPIC_PATTERN.captures(text.trim())?;
    Subject::from_key(&caps[1])
}

pub fn generate_study_plan(text: &str) -> String {
    StudyPlan::from_request(text).render()
}

//! Knowledge Tables - static study tips and canned phrases.
//!
//! Both tables are closed sets known at build time, so every lookup is total.
//! Each list holds at least one entry; callers pick uniformly among them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Study subject recognized by the classifier and the study-plan generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Math,
    Physics,
    Chemistry,
    History,
    Programming,
}

impl Subject {
    /// All subjects in table order. Keyword matching walks this order.
    pub const ALL: [Subject; 5] = [
        Subject::Math,
        Subject::Physics,
        Subject::Chemistry,
        Subject::History,
        Subject::Programming,
    ];

    /// Lowercase key as it appears in user text.
    pub fn key(&self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
            Subject::History => "history",
            Subject::Programming => "programming",
        }
    }

    /// Capitalized name used in replies ("Math", "Physics", ...).
    pub fn display_name(&self) -> &'static str {
        match self {
            Subject::Math => "Math",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::History => "History",
            Subject::Programming => "Programming",
        }
    }

    /// Case-insensitive lookup by exact key.
    pub fn from_key(word: &str) -> Option<Subject> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.key().eq_ignore_ascii_case(word))
    }

    pub fn tips(&self) -> &'static [&'static str] {
        match self {
            Subject::Math => MATH_TIPS,
            Subject::Physics => PHYSICS_TIPS,
            Subject::Chemistry => CHEMISTRY_TIPS,
            Subject::History => HISTORY_TIPS,
            Subject::Programming => PROGRAMMING_TIPS,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

const MATH_TIPS: &[&str] = &[
    "Basic algebra tip: isolate the variable by moving other terms to the other side.",
    "To solve quadratic ax^2+bx+c=0 use the quadratic formula: x = (-b ± sqrt(b^2-4ac)) / (2a).",
    "For geometry, remember: area of a circle = πr², circumference = 2πr.",
];

const PHYSICS_TIPS: &[&str] = &[
    "Newton's 2nd law: F = ma (force = mass × acceleration).",
    "Energy types: kinetic (motion) and potential (position).",
    "Ohm's law for circuits: V = I × R (voltage = current × resistance).",
];

const CHEMISTRY_TIPS: &[&str] = &[
    "The periodic table groups elements with similar properties. Alkali metals are in group 1.",
    "pH < 7 is acidic, pH = 7 neutral, pH > 7 basic.",
    "Common reaction types: synthesis, decomposition, single replacement, double replacement, combustion.",
];

const HISTORY_TIPS: &[&str] = &[
    "When studying history, timeline and cause-effect are most important — link events to outcomes.",
    "Tip: make short notes on 'who, when, where, why' for every historical event.",
];

const PROGRAMMING_TIPS: &[&str] = &[
    "Practice by building small projects. Break problems into functions and test each part.",
    "Common Python tip: use list comprehensions for concise loops, but prefer readability for complex logic.",
];

/// Canned phrase sets for the non-subject intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Greeting,
    Thanks,
    Bye,
    Motivation,
    Fallback,
}

impl ReplyKind {
    pub fn phrases(&self) -> &'static [&'static str] {
        match self {
            ReplyKind::Greeting => GREETING_PHRASES,
            ReplyKind::Thanks => THANKS_PHRASES,
            ReplyKind::Bye => BYE_PHRASES,
            ReplyKind::Motivation => MOTIVATION_PHRASES,
            ReplyKind::Fallback => FALLBACK_PHRASES,
        }
    }
}

const GREETING_PHRASES: &[&str] = &[
    "Hi! I'm StudyBuddy — your study assistant. How can I help you today?",
    "Hello! Ready to study? Ask me for a study plan, explanations, or motivation.",
];

const THANKS_PHRASES: &[&str] = &["You're welcome! 😊", "Anytime — glad to help."];

const BYE_PHRASES: &[&str] = &[
    "Goodbye! Study smart.",
    "Take care — good luck with your studies!",
];

const MOTIVATION_PHRASES: &[&str] = &[
    "Small steps every day lead to big results. Start with 25 minutes focused work.",
    "Remember: consistency beats intensity. Keep going — you’re doing fine!",
];

const FALLBACK_PHRASES: &[&str] = &[
    "Hmm, I didn't quite get that. Try asking for a study plan, a quick explanation, or a motivational tip.",
    "I can help with study plans, summaries, and subject tips. Try: 'Give me a 2-hour study plan for physics.'",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_is_non_empty() {
        for subject in Subject::ALL {
            assert!(!subject.tips().is_empty(), "{} has no tips", subject);
        }
        for kind in [
            ReplyKind::Greeting,
            ReplyKind::Thanks,
            ReplyKind::Bye,
            ReplyKind::Motivation,
            ReplyKind::Fallback,
        ] {
            assert!(!kind.phrases().is_empty(), "{:?} has no phrases", kind);
        }
    }

    #[test]
    fn test_subject_from_key() {
        assert_eq!(Subject::from_key("math"), Some(Subject::Math));
        assert_eq!(Subject::from_key("PHYSICS"), Some(Subject::Physics));
        assert_eq!(Subject::from_key("biology"), None);
        assert_eq!(Subject::from_key("maths"), None);
    }
}

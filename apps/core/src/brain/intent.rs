//! Intent Classification using regex patterns.
//!
//! An ordered rule list is evaluated top to bottom and the first rule that
//! matches decides the intent. Order is the tie-break policy: administrative
//! intents come first, then the subject keyword catch, then calculation.
//! New rules are appended to the list without touching earlier ones.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::trace;

use super::knowledge::Subject;

/// Detected intent type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Greeting (hi, hello, hola, etc.)
    Greeting,
    /// Thanks (thank, thx, etc.)
    Thanks,
    /// Farewell (bye, goodbye, see you)
    Bye,
    /// Request for encouragement
    Motivation,
    /// Study plan / timetable request
    StudyPlan,
    /// Bare subject mention, carries the first subject found
    Subject(Subject),
    /// Explanation request (explain, what is, define, etc.)
    Explain,
    /// Arithmetic request (solve, calculate)
    Calculate,
    /// Nothing matched, handled as small talk
    Unknown,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Intent {
    /// Returns a stable label for the intent
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Thanks => "thanks",
            Intent::Bye => "bye",
            Intent::Motivation => "motivation",
            Intent::StudyPlan => "study_plan",
            Intent::Subject(_) => "subject",
            Intent::Explain => "explain",
            Intent::Calculate => "calculate",
            Intent::Unknown => "none",
        }
    }
}

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentResult {
    /// Detected intent
    pub intent: Intent,
    /// Text fragment that triggered the rule, if any
    pub matched: Option<String>,
}

impl IntentResult {
    fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            matched: None,
        }
    }
}

/// How a single rule recognizes its intent
enum RuleMatcher {
    /// One pattern mapped to a fixed intent
    Pattern { intent: Intent, pattern: Regex },
    /// Whole-word subject keys, tried in table order
    SubjectKeyword(Vec<(Subject, Regex)>),
}

/// Rule definition for intent matching
struct IntentRule {
    name: &'static str,
    matcher: RuleMatcher,
}

impl IntentRule {
    fn pattern(name: &'static str, intent: Intent, pattern: &Regex) -> Self {
        Self {
            name,
            matcher: RuleMatcher::Pattern {
                intent,
                pattern: pattern.clone(),
            },
        }
    }

    fn apply(&self, text: &str) -> Option<IntentResult> {
        match &self.matcher {
            RuleMatcher::Pattern { intent, pattern } => pattern.find(text).map(|m| IntentResult {
                intent: *intent,
                matched: Some(m.as_str().to_string()),
            }),
            RuleMatcher::SubjectKeyword(subjects) => {
                subjects.iter().find_map(|(subject, pattern)| {
                    pattern.find(text).map(|m| IntentResult {
                        intent: Intent::Subject(*subject),
                        matched: Some(m.as_str().to_string()),
                    })
                })
            }
        }
    }
}

// Compile patterns once at startup
// NOTE: the patterns are literals, expect() only fires on a typo caught by the tests.
static GREETING_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(hi|hello|hey|hii|hola)\b").expect("Invalid regex: greeting words")
});

static THANKS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(thank|thanks|thx|thnks)\b").expect("Invalid regex: thanks words")
});

static BYE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(bye|goodbye|see you)\b").expect("Invalid regex: farewell words")
});

static MOTIVATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(motivat\w*|i am lazy|i feel lazy|encourag\w*)\b")
        .expect("Invalid regex: motivation phrases")
});

static STUDY_PLAN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(study plan|timetable|study schedule|plan for)\b")
        .expect("Invalid regex: study plan phrases")
});

static EXPLAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(explain|what is|define|why is|how to)\b")
        .expect("Invalid regex: explanation phrases")
});

static CALCULATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(solve|calculate|what is the value of)\b")
        .expect("Invalid regex: calculation verbs")
});

static SUBJECT_PATTERNS: LazyLock<Vec<(Subject, Regex)>> = LazyLock::new(|| {
    Subject::ALL
        .into_iter()
        .map(|subject| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(subject.key()));
            let regex = Regex::new(&pattern).expect("Invalid regex: subject keyword");
            (subject, regex)
        })
        .collect()
});

/// Whole-word search for the first subject key in table order.
pub fn find_subject(text: &str) -> Option<Subject> {
    SUBJECT_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(subject, _)| *subject)
}

/// Intent classifier using an ordered list of regex rules
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a new intent classifier with the standard rule order
    pub fn new() -> Self {
        let rules = vec![
            IntentRule::pattern("greeting", Intent::Greeting, &GREETING_PATTERN),
            IntentRule::pattern("thanks", Intent::Thanks, &THANKS_PATTERN),
            IntentRule::pattern("bye", Intent::Bye, &BYE_PATTERN),
            IntentRule::pattern("motivation", Intent::Motivation, &MOTIVATION_PATTERN),
            IntentRule::pattern("study_plan", Intent::StudyPlan, &STUDY_PLAN_PATTERN),
            IntentRule::pattern("explain", Intent::Explain, &EXPLAIN_PATTERN),
            IntentRule {
                name: "subject",
                matcher: RuleMatcher::SubjectKeyword(SUBJECT_PATTERNS.clone()),
            },
            IntentRule::pattern("calculate", Intent::Calculate, &CALCULATE_PATTERN),
        ];

        Self { rules }
    }

    /// Rule names in evaluation order
    #[cfg(test)]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }

    /// Classify the intent of a text
    pub fn classify(&self, text: &str) -> IntentResult {
        let text = text.trim();

        if text.is_empty() {
            return IntentResult::unknown();
        }

        for rule in &self.rules {
            if let Some(result) = rule.apply(text) {
                trace!(rule = rule.name, "Intent rule matched");
                return result;
            }
        }
        IntentResult::unknown()
    }
}

//! Reply generators, one per intent.
//!
//! Every generator returns a plain string and has a terminal fallback on
//! each branch. Randomness always comes from the caller's `Rng`.

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

use super::intent::find_subject;
use super::knowledge::{ReplyKind, Subject};

pub const PYTHAGORAS_REPLY: &str =
    "Pythagoras theorem: in a right triangle, a² + b² = c² (c is the hypotenuse).";
pub const MOLECULE_REPLY: &str = "A molecule is two or more atoms chemically bonded together.";
pub const GENERIC_EXPLANATION: &str = "Here's a short explanation: break the topic into smaller parts, understand definitions, then practice examples.";

pub const HOW_ARE_YOU_REPLY: &str =
    "I'm StudyBuddy — ready and eager to help! How are your studies going?";
pub const CAPABILITIES_REPLY: &str = "I can create study plans, give quick subject tips (math, physics, chemistry, history, programming), motivate you, and answer simple calculation or explanation requests.";

const LAST_RESORT: &str = "Try asking for a study plan, a quick explanation, or a motivational tip.";

static HOW_ARE_YOU_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bhow are you\b").expect("Invalid regex: how are you")
});

static WHAT_CAN_YOU_DO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bwhat can you do\b").expect("Invalid regex: what can you do")
});

fn pick<R: Rng + ?Sized>(table: &'static [&'static str], rng: &mut R) -> Option<&'static str> {
    table.choose(rng).copied()
}

/// Uniform pick from one of the canned phrase tables.
pub fn canned_reply<R: Rng + ?Sized>(kind: ReplyKind, rng: &mut R) -> String {
    pick(kind.phrases(), rng).unwrap_or(LAST_RESORT).to_string()
}

/// Uniform pick from a subject's tips.
pub fn subject_tip<R: Rng + ?Sized>(subject: Subject, rng: &mut R) -> String {
    pick(subject.tips(), rng)
        .unwrap_or("Try to practice examples.")
        .to_string()
}

/// Reply for a bare subject mention: name header plus one tip.
pub fn subject_reply<R: Rng + ?Sized>(subject: Subject, rng: &mut R) -> String {
    format!("Subject: {}\n{}", subject.display_name(), subject_tip(subject, rng))
}

pub fn provide_explanation<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    if let Some(subject) = find_subject(text) {
        return subject_tip(subject, rng);
    }

    let lowered = text.to_lowercase();
    if lowered.contains("pythagoras") {
        PYTHAGORAS_REPLY.to_string()
    } else if lowered.contains("molecule") {
        MOLECULE_REPLY.to_string()
    } else {
        GENERIC_EXPLANATION.to_string()
    }
}

/// Reply when no intent matched.
pub fn small_talk<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    if HOW_ARE_YOU_PATTERN.is_match(text) {
        HOW_ARE_YOU_REPLY.to_string()
    } else if WHAT_CAN_YOU_DO_PATTERN.is_match(text) {
        CAPABILITIES_REPLY.to_string()
    } else {
        canned_reply(ReplyKind::Fallback, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_canned_reply_membership() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let reply = canned_reply(ReplyKind::Thanks, &mut rng);
            assert!(ReplyKind::Thanks.phrases().contains(&reply.as_str()));
        }
    }

    #[test]
    fn test_subject_reply_format() {
        let mut rng = StdRng::seed_from_u64(1);
        let reply = subject_reply(Subject::History, &mut rng);
        let (header, tip) = reply.split_once('\n').unwrap();
        assert_eq!(header, "Subject: History");
        assert!(Subject::History.tips().contains(&tip));
    }

    #[test]
    fn test_explanation_special_cases() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            provide_explanation("explain Pythagoras", &mut rng),
            PYTHAGORAS_REPLY
        );
        assert_eq!(
            provide_explanation("what is a molecule", &mut rng),
            MOLECULE_REPLY
        );
        assert_eq!(
            provide_explanation("pythagoras or molecule", &mut rng),
            PYTHAGORAS_REPLY
        );
        assert_eq!(
            provide_explanation("explain gravity", &mut rng),
            GENERIC_EXPLANATION
        );
    }

    #[test]
    fn test_explanation_prefers_subject() {
        let mut rng = StdRng::seed_from_u64(3);
        let reply = provide_explanation("explain a molecule in chemistry", &mut rng);
        assert!(Subject::Chemistry.tips().contains(&reply.as_str()));
    }

    #[test]
    fn test_small_talk() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(small_talk("How are you doing?", &mut rng), HOW_ARE_YOU_REPLY);
        assert_eq!(small_talk("so what can you do", &mut rng), CAPABILITIES_REPLY);

        let reply = small_talk("blorp", &mut rng);
        assert!(ReplyKind::Fallback.phrases().contains(&reply.as_str()));
    }
}

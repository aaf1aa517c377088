//! Brain Module Tests
//!
//! Intent rule ordering and the reply contract of every generator.

use crate::brain::calculator::PARSE_FAILURE_REPLY;
use crate::brain::replies::{GENERIC_EXPLANATION, MOLECULE_REPLY, PYTHAGORAS_REPLY};
use crate::brain::{Intent, IntentClassifier, ReplyKind, Responder, Subject};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(test)]
mod intent_classifier_tests {
    use super::*;

    fn assert_intent(classifier: &IntentClassifier, inputs: &[&str], expected: Intent) {
        for input in inputs {
            assert_eq!(
                classifier.classify(input).intent,
                expected,
                "Expected {:?} for '{}'",
                expected,
                input
            );
        }
    }

    #[test]
    fn test_each_rule_in_isolation() {
        let classifier = IntentClassifier::new();

        assert_intent(&classifier, &["hi", "Hello!", "hey there", "hii", "Hola"], Intent::Greeting);
        assert_intent(&classifier, &["thanks a lot", "thank you", "thx", "THNKS"], Intent::Thanks);
        assert_intent(&classifier, &["bye", "Goodbye now", "see you tomorrow"], Intent::Bye);
        assert_intent(
            &classifier,
            &["motivate me", "I am lazy", "i feel lazy", "need encouragement"],
            Intent::Motivation,
        );
        assert_intent(
            &classifier,
            &["make me a study plan", "my timetable", "study schedule please", "plan for tomorrow"],
            Intent::StudyPlan,
        );
        assert_intent(
            &classifier,
            &["explain gravity", "what is a molecule", "define entropy", "why is the sky blue", "how to focus"],
            Intent::Explain,
        );
        assert_intent(&classifier, &["solve 2 + 2", "Calculate 12 + 7"], Intent::Calculate);
    }

    #[test]
    fn test_first_match_wins() {
        let classifier = IntentClassifier::new();

        // greeting beats everything after it
        assert_intent(&classifier, &["hi, explain math", "hello, calculate 1 + 1"], Intent::Greeting);
        // thanks beats bye
        assert_intent(&classifier, &["thanks and bye"], Intent::Thanks);
        // study plan beats explain and subject
        assert_intent(&classifier, &["what is a good study plan for physics"], Intent::StudyPlan);
        // explain beats subject
        assert_intent(&classifier, &["explain chemistry"], Intent::Explain);
        // subject beats calculate
        assert_intent(&classifier, &["solve this math problem"], Intent::Subject(Subject::Math));
        // "what is the value of" is caught by the earlier "what is" rule
        assert_intent(&classifier, &["what is the value of 3 + 4"], Intent::Explain);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let classifier = IntentClassifier::new();
        for input in ["hello", "plan for math", "physics", "Calculate 1 + 2", "blorp"] {
            assert_eq!(classifier.classify(input), classifier.classify(input));
        }
    }
}

#[cfg(test)]
mod reply_tests {
    use super::*;

    fn reply(message: &str, seed: u64) -> String {
        let mut rng = StdRng::seed_from_u64(seed);
        Responder::new().respond(message, &mut rng).text
    }

    #[test]
    fn test_canned_replies_come_from_tables() {
        let cases = [
            ("hello", ReplyKind::Greeting),
            ("thanks!", ReplyKind::Thanks),
            ("bye", ReplyKind::Bye),
            ("motivate me", ReplyKind::Motivation),
            ("zzz", ReplyKind::Fallback),
        ];
        for seed in 0..10 {
            for (message, kind) in cases {
                let text = reply(message, seed);
                assert!(
                    kind.phrases().contains(&text.as_str()),
                    "'{}' is not a {:?} phrase",
                    text,
                    kind
                );
            }
        }
    }

    #[test]
    fn test_explanation_uses_subject_tips() {
        for seed in 0..10 {
            let text = reply("explain physics to me", seed);
            assert!(Subject::Physics.tips().contains(&text.as_str()));
        }
        assert_eq!(reply("what is pythagoras", 0), PYTHAGORAS_REPLY);
        assert_eq!(reply("define molecule", 0), MOLECULE_REPLY);
        assert_eq!(reply("explain love", 0), GENERIC_EXPLANATION);
    }

    #[test]
    fn test_subject_reply_has_header() {
        let text = reply("programming", 3);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Subject: Programming"));
        let tip = lines.next().unwrap();
        assert!(Subject::Programming.tips().contains(&tip));
    }

    #[test]
    fn test_two_hour_study_plan() {
        let text = reply("Give me a 2 hour study plan", 0);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Study Plan (~120 minutes):");
        for i in 1..=4 {
            assert_eq!(
                lines[i],
                format!("• Block {}: 25 min focused study + 5 min break", i)
            );
        }
        assert_eq!(lines[5], "• After 3–4 blocks take a longer 20–30 min break.");
        assert_eq!(lines[6], "Tip: Remove distractions, set a clear goal for each block.");
        assert_eq!(lines.len(), 7);
        assert!(!text.contains("Focus topic"));
    }

    #[test]
    fn test_plan_for_subject() {
        let text = reply("plan for math", 0);
        assert!(text.starts_with("Study Plan (~120 minutes):"));
        assert!(text.contains("Focus topic: Math. Try to divide the topic into 3 subtopics."));
    }

    #[test]
    fn test_calculations() {
        assert_eq!(reply("Calculate 12 + 7", 0), "The answer is: 19");
        assert_eq!(reply("Calculate 10 / 0", 0), PARSE_FAILURE_REPLY);
        assert_eq!(reply("Calculate nonsense", 0), PARSE_FAILURE_REPLY);
        assert_eq!(reply("solve 2 + 3 * 4 - 1", 0), "The answer is: 13");
    }

    #[test]
    fn test_small_talk() {
        assert!(reply("how are you?", 0).starts_with("I'm StudyBuddy"));
        assert!(reply("what can you do", 0).starts_with("I can create study plans"));
    }
}

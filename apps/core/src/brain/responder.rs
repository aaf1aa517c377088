//! Responder - classifies a message and dispatches to the matching generator.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::calculator::calculate_answer;
use super::intent::{Intent, IntentClassifier, IntentResult};
use super::knowledge::ReplyKind;
use super::replies::{canned_reply, provide_explanation, small_talk, subject_reply};
use super::study_plan::generate_study_plan;

/// A generated reply together with the intent that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub intent: IntentResult,
    pub text: String,
}

/// Main entry point of the brain: message in, reply out
pub struct Responder {
    classifier: IntentClassifier,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new()
    }
}

impl Responder {
    pub fn new() -> Self {
        Self {
            classifier: IntentClassifier::new(),
        }
    }

    pub fn classify(&self, message: &str) -> IntentResult {
        self.classifier.classify(message)
    }

    /// Produce the reply for an already trimmed, non-empty message.
    pub fn respond<R: Rng + ?Sized>(&self, message: &str, rng: &mut R) -> Reply {
        let start = Instant::now();
        let intent = self.classify(message);

        let text = match intent.intent {
            Intent::Greeting => canned_reply(ReplyKind::Greeting, rng),
            Intent::Thanks => canned_reply(ReplyKind::Thanks, rng),
            Intent::Bye => canned_reply(ReplyKind::Bye, rng),
            Intent::Motivation => canned_reply(ReplyKind::Motivation, rng),
            Intent::StudyPlan => generate_study_plan(message),
            Intent::Subject(subject) => subject_reply(subject, rng),
            Intent::Explain => provide_explanation(message, rng),
            Intent::Calculate => calculate_answer(message),
            Intent::Unknown => small_talk(message, rng),
        };

        debug!(
            intent = %intent.intent,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Reply generated"
        );

        Reply { intent, text }
    }
}

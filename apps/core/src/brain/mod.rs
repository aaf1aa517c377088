//! # Brain Module
//!
//! Rule-based reply engine for StudyBuddy. No model, no learning: regex
//! intent rules plus templated and canned replies.
//!
//! ## Components
//! - `knowledge`: static subject tips and canned phrases
//! - `intent`: ordered regex intent rules (first match wins)
//! - `replies`: canned, subject, explanation and small-talk generators
//! - `study_plan`: focus-block study plan generator
//! - `calculator`: whitelisted arithmetic evaluator
//! - `responder`: classify + dispatch

pub mod calculator;
pub mod intent;
pub mod knowledge;
pub mod replies;
pub mod responder;
pub mod study_plan;

// Re-export main types for convenience
#[allow(unused_imports)]
pub use intent::{Intent, IntentClassifier, IntentResult};
#[allow(unused_imports)]
pub use knowledge::{ReplyKind, Subject};
#[allow(unused_imports)]
pub use responder::{Reply, Responder};

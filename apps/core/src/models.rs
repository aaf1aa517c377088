use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Who wrote a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// Represents a single message within a session transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// The author of the message.
    pub speaker: Speaker,
    /// The text content of the message.
    pub text: String,
    /// When the entry was appended.
    pub created_at: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Body of a message submission.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitRequest {
    /// Raw user text. Trimmed by the chat service; blank input is ignored.
    /// The configured limit is usually lower; this is the hard ceiling.
    #[validate(length(max = 10000))]
    pub message: String,
}

/// Response for a freshly created session.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: String,
}

/// Ordered transcript of one session.
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub entries: Vec<TranscriptEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Live sessions held by the store.
    pub sessions: usize,
}

//! Per-session conversation state: the transcript and where it is stored.

pub mod store;
pub mod transcript;

pub use store::{MemorySessionStore, SessionStore};
pub use transcript::Transcript;

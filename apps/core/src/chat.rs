//! Chat service - the request handler.
//!
//! Orchestration only: trim, append the user entry, ask the responder for a
//! reply, append it, persist. Updates to one session are serialized by a
//! per-session lock so concurrent submits never interleave or lose entries.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::brain::Responder;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::Speaker;
use crate::rate_limiter::RateLimiter;
use crate::session::{SessionStore, Transcript};

const MAX_SESSION_ID_LEN: usize = 128;

/// Generates a fresh opaque session id.
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Session ids are opaque, but must be short and URL-safe.
pub fn validate_session_id(session_id: &str) -> Result<(), AppError> {
    let valid = !session_id.is_empty()
        && session_id.len() <= MAX_SESSION_ID_LEN
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "invalid session id (1-{} characters of [A-Za-z0-9_-])",
            MAX_SESSION_ID_LEN
        )))
    }
}

struct LockEntry {
    lock: Arc<Mutex<()>>,
    /// Holders plus waiters; the entry goes away when this reaches zero.
    users: usize,
}

/// One async mutex per active session id.
#[derive(Default)]
struct SessionLocks {
    entries: std::sync::Mutex<HashMap<String, LockEntry>>,
}

impl SessionLocks {
    async fn acquire(&self, session_id: &str) -> SessionLockGuard<'_> {
        let lock = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            let entry = entries
                .entry(session_id.to_string())
                .or_insert_with(|| LockEntry {
                    lock: Arc::new(Mutex::new(())),
                    users: 0,
                });
            entry.users += 1;
            entry.lock.clone()
        };

        // Registered before waiting so a cancelled wait still gives back its slot.
        let mut guard = SessionLockGuard {
            locks: self,
            session_id: session_id.to_string(),
            held: None,
        };
        guard.held = Some(lock.lock_owned().await);
        guard
    }

    fn release(&self, session_id: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let idle = match entries.get_mut(session_id) {
            Some(entry) => {
                entry.users = entry.users.saturating_sub(1);
                entry.users == 0
            }
            None => false,
        };
        if idle {
            entries.remove(session_id);
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Holds a session's lock. Dropping it unlocks and forgets idle sessions,
/// including when the request future is cancelled mid-wait.
struct SessionLockGuard<'a> {
    locks: &'a SessionLocks,
    session_id: String,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionLockGuard<'_> {
    fn drop(&mut self) {
        self.held.take();
        self.locks.release(&self.session_id);
    }
}

/// Entry point for all chat operations
pub struct ChatService {
    store: Arc<dyn SessionStore>,
    responder: Responder,
    rng: Mutex<StdRng>,
    limiter: Mutex<RateLimiter>,
    locks: SessionLocks,
    max_message_len: usize,
}

impl ChatService {
    pub fn new(store: Arc<dyn SessionStore>, config: &AppConfig) -> Self {
        let rng = match config.reply_seed {
            Some(seed) => {
                info!("Reply selection seeded with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        Self {
            store,
            responder: Responder::new(),
            rng: Mutex::new(rng),
            limiter: Mutex::new(RateLimiter::new(config.rate_limit, config.rate_window())),
            locks: SessionLocks::default(),
            max_message_len: config.max_message_len,
        }
    }

    /// Processes one user message and returns the updated transcript.
    ///
    /// Blank input is ignored: the transcript is returned unchanged and no
    /// reply is generated.
    #[instrument(skip(self, message), fields(message_len = message.len()))]
    pub async fn submit(&self, session_id: &str, message: &str) -> Result<Transcript, AppError> {
        validate_session_id(session_id)?;

        let message = message.trim();
        if message.is_empty() {
            debug!("Ignoring empty message");
            return self.store.load(session_id).await;
        }

        let char_count = message.chars().count();
        if char_count > self.max_message_len {
            return Err(AppError::Validation(format!(
                "message is {} characters, limit is {}",
                char_count, self.max_message_len
            )));
        }

        if !self.limiter.lock().await.check(session_id) {
            warn!("Rate limit exceeded");
            return Err(AppError::RateLimited);
        }

        let _guard = self.locks.acquire(session_id).await;
        self.append_exchange(session_id, message).await
    }

    async fn append_exchange(&self, session_id: &str, message: &str) -> Result<Transcript, AppError> {
        let mut transcript = self.store.load(session_id).await?;
        transcript.push(Speaker::User, message);

        let reply = {
            let mut rng = self.rng.lock().await;
            self.responder.respond(message, &mut *rng)
        };
        info!(intent = %reply.intent.intent, "Replying");
        transcript.push(Speaker::Assistant, reply.text);

        self.store.save(session_id, transcript.clone()).await?;
        Ok(transcript)
    }

    /// Clears the session's transcript.
    #[instrument(skip(self))]
    pub async fn reset(&self, session_id: &str) -> Result<Transcript, AppError> {
        validate_session_id(session_id)?;

        let _guard = self.locks.acquire(session_id).await;
        let transcript = self.clear_transcript(session_id).await?;

        info!("Transcript reset");
        Ok(transcript)
    }

    async fn clear_transcript(&self, session_id: &str) -> Result<Transcript, AppError> {
        let mut transcript = self.store.load(session_id).await?;
        transcript.clear();
        self.store.save(session_id, transcript.clone()).await?;
        Ok(transcript)
    }

    /// Read-only snapshot of the session's transcript.
    pub async fn transcript(&self, session_id: &str) -> Result<Transcript, AppError> {
        validate_session_id(session_id)?;
        self.store.load(session_id).await
    }

    /// Housekeeping for the rate limiter, called from the server's sweeper.
    pub async fn prune_rate_limits(&self) -> usize {
        self.limiter.lock().await.prune()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use std::num::NonZeroUsize;
    use std::time::Duration;

    fn service() -> ChatService {
        let store = Arc::new(MemorySessionStore::new(
            NonZeroUsize::new(16).unwrap(),
            Duration::from_secs(60),
        ));
        let config = AppConfig {
            reply_seed: Some(7),
            ..AppConfig::default()
        };
        ChatService::new(store, &config)
    }

    #[test]
    fn test_session_id_validation() {
        assert!(validate_session_id("abc-123_DEF").is_ok());
        assert!(validate_session_id(&new_session_id()).is_ok());
        assert!(validate_session_id("").is_err());
        assert!(validate_session_id("a/b").is_err());
        assert!(validate_session_id(&"x".repeat(129)).is_err());
    }

    #[tokio::test]
    async fn test_submit_trims_and_appends_pair() {
        let chat = service();
        let transcript = chat.submit("s1", "   Calculate 12 + 7  ").await.unwrap();

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.entries()[0].text, "Calculate 12 + 7");
        assert_eq!(transcript.entries()[1].text, "The answer is: 19");
    }

    #[tokio::test]
    async fn test_message_too_long() {
        let chat = service();
        let long = "a".repeat(AppConfig::default().max_message_len + 1);
        assert!(matches!(
            chat.submit("s1", &long).await,
            Err(AppError::Validation(_))
        ));
        assert!(chat.transcript("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_locks_are_released() {
        let chat = service();
        chat.submit("s1", "hello").await.unwrap();
        chat.reset("s1").await.unwrap();
        assert_eq!(chat.locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_submit_releases_lock() {
        let chat = service();
        let held = chat.locks.acquire("s1").await;

        let waited = tokio::time::timeout(Duration::from_millis(20), chat.submit("s1", "hello")).await;
        assert!(waited.is_err(), "submit should still be waiting on the lock");
        assert_eq!(chat.locks.tracked(), 1);

        drop(held);
        assert_eq!(chat.locks.tracked(), 0);
        assert!(chat.transcript("s1").await.unwrap().is_empty());

        for i in 0..100 {
            let guard = chat.locks.acquire(&format!("client-{}", i)).await;
            drop(guard);
        }
        assert_eq!(chat.locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_locks_tracked_per_session() {
        let chat = service();
        let first = chat.locks.acquire("s1").await;
        let second = chat.locks.acquire("s2").await;
        assert_eq!(chat.locks.tracked(), 2);

        drop(first);
        assert_eq!(chat.locks.tracked(), 1);
        drop(second);
        assert_eq!(chat.locks.tracked(), 0);
    }
}

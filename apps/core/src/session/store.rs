//! Session storage.
//!
//! The chat service only needs "read current transcript" and "write updated
//! transcript" per session id, last write wins. Lifecycle (creation on first
//! write, expiry, eviction) belongs to the store.

use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::transcript::Transcript;
use crate::error::AppError;

/// Defines the public interface for a session transcript store.
///
/// This trait abstracts where transcripts live, so the in-memory store can be
/// swapped for a shared backend without touching the chat service.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Returns the session's transcript, or an empty one if the session is unknown or expired.
    async fn load(&self, session_id: &str) -> Result<Transcript, AppError>;

    /// Replaces the session's transcript, creating the session if needed.
    async fn save(&self, session_id: &str, transcript: Transcript) -> Result<(), AppError>;

    /// Number of live sessions.
    async fn session_count(&self) -> usize;
}

struct StoredSession {
    transcript: Transcript,
    last_access: Instant,
}

/// In-memory store with a capacity bound (least recently used sessions are
/// evicted first) and an idle expiry.
pub struct MemorySessionStore {
    sessions: Mutex<LruCache<String, StoredSession>>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    fn is_expired(&self, session: &StoredSession, now: Instant) -> bool {
        now.duration_since(session.last_access) > self.ttl
    }

    /// Removes every session idle for longer than the TTL. Returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, session)| self.is_expired(session, now))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            sessions.pop(id);
        }

        if !expired.is_empty() {
            info!("Purged {} expired sessions", expired.len());
        }
        expired.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, session_id: &str) -> Result<Transcript, AppError> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        let expired = match sessions.get_mut(session_id) {
            Some(session) if !self.is_expired(session, now) => {
                session.last_access = now;
                return Ok(session.transcript.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            debug!(session_id, "Session expired");
            sessions.pop(session_id);
        }
        Ok(Transcript::new())
    }

    async fn save(&self, session_id: &str, transcript: Transcript) -> Result<(), AppError> {
        let mut sessions = self.sessions.lock().await;
        let evicted = sessions.push(
            session_id.to_string(),
            StoredSession {
                transcript,
                last_access: Instant::now(),
            },
        );
        if let Some((evicted_id, _)) = evicted {
            if evicted_id != session_id {
                debug!(session_id = %evicted_id, "Session evicted at capacity");
            }
        }
        Ok(())
    }

    async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Speaker;

    fn store(capacity: usize, ttl: Duration) -> MemorySessionStore {
        MemorySessionStore::new(NonZeroUsize::new(capacity).unwrap(), ttl)
    }

    fn transcript_with(text: &str) -> Transcript {
        let mut transcript = Transcript::new();
        transcript.push(Speaker::User, text);
        transcript
    }

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let store = store(4, Duration::from_secs(60));
        assert!(store.load("nobody").await.unwrap().is_empty());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = store(4, Duration::from_secs(60));
        store.save("s1", transcript_with("first")).await.unwrap();
        store.save("s1", transcript_with("second")).await.unwrap();

        let loaded = store.load("s1").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.entries()[0].text, "second");
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = store(4, Duration::from_secs(60));
        store.save("a", transcript_with("alpha")).await.unwrap();
        store.save("b", transcript_with("beta")).await.unwrap();
        store.save("a", Transcript::new()).await.unwrap();

        assert!(store.load("a").await.unwrap().is_empty());
        assert_eq!(store.load("b").await.unwrap().entries()[0].text, "beta");
        assert_eq!(store.session_count().await, 2);
    }

    #[tokio::test]
    async fn test_capacity_evicts_least_recent() {
        let store = store(2, Duration::from_secs(60));
        store.save("a", transcript_with("a")).await.unwrap();
        store.save("b", transcript_with("b")).await.unwrap();
        // touch "a" so "b" becomes the eviction candidate
        store.load("a").await.unwrap();
        store.save("c", transcript_with("c")).await.unwrap();

        assert_eq!(store.session_count().await, 2);
        assert!(store.load("b").await.unwrap().is_empty());
        assert!(!store.load("a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let store = store(4, Duration::from_millis(50));
        store.save("s1", transcript_with("hello")).await.unwrap();
        store.save("s2", transcript_with("hello")).await.unwrap();

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(store.load("s1").await.unwrap().is_empty());
        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.session_count().await, 0);
    }
}

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// Sliding-window limiter for message submissions, keyed by session id.
///
/// Only submits are counted; reading or resetting a transcript is free.
pub struct RateLimiter {
    /// Submission timestamps per session, oldest first.
    requests: HashMap<String, VecDeque<Instant>>,
    /// The maximum number of submissions allowed within the `window`.
    limit: usize,
    /// The duration of the sliding window.
    window: Duration,
}

impl RateLimiter {
    /// Creates a new `RateLimiter` allowing `limit` submissions per `window`.
    pub fn new(limit: usize, window: Duration) -> Self {
        RateLimiter {
            requests: HashMap::new(),
            limit,
            window,
        }
    }

    /// Records a submission for `session_id` if it is within the limit.
    ///
    /// Returns `false` (and records nothing) when the session is over its limit.
    pub fn check(&mut self, session_id: &str) -> bool {
        let now = Instant::now();
        let window = self.window;

        let timestamps = self.requests.entry(session_id.to_string()).or_default();
        while timestamps
            .front()
            .is_some_and(|&oldest| now.duration_since(oldest) >= window)
        {
            timestamps.pop_front();
        }

        if timestamps.len() < self.limit {
            timestamps.push_back(now);
            true
        } else {
            false
        }
    }

    /// Drops sessions with no submissions inside the current window.
    pub fn prune(&mut self) -> usize {
        let now = Instant::now();
        let window = self.window;
        let before = self.requests.len();
        self.requests.retain(|_, timestamps| {
            timestamps
                .back()
                .is_some_and(|&newest| now.duration_since(newest) < window)
        });
        before - self.requests.len()
    }

    #[cfg(test)]
    pub fn tracked_sessions(&self) -> usize {
        self.requests.len()
    }
}

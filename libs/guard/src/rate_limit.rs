//! Rate limiting for trade attempts
//!
//! Fixed-window counting with two independent windows per actor (60s and
//! 3600s). Expiry is lazy: windows are checked and replaced on access, so
//! correctness never depends on a background sweeper.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use thiserror::Error;

const MINUTE_WINDOW: Duration = Duration::from_secs(60);
const HOUR_WINDOW: Duration = Duration::from_secs(3600);

/// Rejection reasons for throttled actors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("Rate limit exceeded: maximum {cap} trades per minute")]
    PerMinute { cap: u32 },

    #[error("Rate limit exceeded: maximum {cap} trades per hour")]
    PerHour { cap: u32 },
}

/// One counting window with a fixed reset point
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

impl Window {
    fn fresh(now: Instant, length: Duration) -> Self {
        Self {
            count: 0,
            reset_at: now + length,
        }
    }

    /// Replace the window once its reset time has passed, then admit and
    /// count unless the cap is already reached. At the cap the count stays
    /// put so a burst of rejected attempts cannot extend the throttle.
    fn admit(&mut self, now: Instant, length: Duration, cap: u32) -> bool {
        if now >= self.reset_at {
            *self = Self::fresh(now, length);
        }

        if self.count >= cap {
            return false;
        }

        self.count += 1;
        true
    }
}

#[derive(Debug, Clone, Copy)]
struct ActorWindows {
    minute: Window,
    hour: Window,
}

impl ActorWindows {
    fn new(now: Instant) -> Self {
        Self {
            minute: Window::fresh(now, MINUTE_WINDOW),
            hour: Window::fresh(now, HOUR_WINDOW),
        }
    }
}

/// Per-actor trade rate limiter
pub struct RateLimiter {
    per_minute: u32,
    per_hour: u32,
    windows: DashMap<String, ActorWindows>,
}

impl RateLimiter {
    pub fn new(per_minute: u32, per_hour: u32) -> Self {
        Self {
            per_minute,
            per_hour,
            windows: DashMap::new(),
        }
    }

    /// Check and count one trade attempt (non-blocking)
    ///
    /// Both windows must admit for the attempt to pass; a minute rejection
    /// is reported before an hour rejection.
    pub fn check(&self, actor: &str) -> Result<(), RateLimitError> {
        self.check_at(actor, Instant::now())
    }

    fn check_at(&self, actor: &str, now: Instant) -> Result<(), RateLimitError> {
        let mut windows = self
            .windows
            .entry(actor.to_string())
            .or_insert_with(|| ActorWindows::new(now));

        // Both windows advance on every call: an attempt the minute window
        // rejects still counts against the hour window, and vice versa.
        let minute_ok = windows.minute.admit(now, MINUTE_WINDOW, self.per_minute);
        let hour_ok = windows.hour.admit(now, HOUR_WINDOW, self.per_hour);

        if !minute_ok {
            return Err(RateLimitError::PerMinute {
                cap: self.per_minute,
            });
        }

        if !hour_ok {
            return Err(RateLimitError::PerHour { cap: self.per_hour });
        }

        Ok(())
    }

    /// Drop all windows for an actor (administrative reset)
    pub fn reset(&self, actor: &str) -> bool {
        self.windows.remove(actor).is_some()
    }

    /// Evict actors whose windows have all expired, returning the eviction
    /// count. Best-effort memory reclamation; admission stays correct even
    /// if this is never called.
    pub fn cleanup(&self) -> usize {
        self.cleanup_at(Instant::now())
    }

    fn cleanup_at(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, w| now < w.minute.reset_at || now < w.hour.reset_at);
        before.saturating_sub(self.windows.len())
    }

    /// Number of actors currently tracked
    pub fn tracked_actors(&self) -> usize {
        self.windows.len()
    }
}

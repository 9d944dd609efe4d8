//! Per-actor in-flight trade counting
//!
//! The check is advisory: validation inspects the count but never changes
//! it. The execution path owns the increment/decrement bracket and must
//! call `end_trade` on every exit path, including aborts.

use dashmap::DashMap;
use thiserror::Error;

/// Rejection for actors with too many trades in flight
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Too many concurrent trades: {active} in flight (maximum {max})")]
pub struct ConcurrencyError {
    pub active: u32,
    pub max: u32,
}

/// Bounds simultaneously in-flight trades per actor
pub struct ConcurrencyGuard {
    max_concurrent: u32,
    active: DashMap<String, u32>,
}

impl ConcurrencyGuard {
    pub fn new(max_concurrent: u32) -> Self {
        Self {
            max_concurrent,
            active: DashMap::new(),
        }
    }

    /// Inspect the actor's in-flight count without changing it
    pub fn check(&self, actor: &str) -> Result<(), ConcurrencyError> {
        let active = self.active.get(actor).map(|count| *count).unwrap_or(0);

        if active >= self.max_concurrent {
            return Err(ConcurrencyError {
                active,
                max: self.max_concurrent,
            });
        }

        Ok(())
    }

    /// Count one trade as started; returns the new in-flight count
    pub fn start_trade(&self, actor: &str) -> u32 {
        let mut count = self.active.entry(actor.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Count one trade as settled or abandoned; the count never drops
    /// below zero, so a stray extra call is harmless
    pub fn end_trade(&self, actor: &str) -> u32 {
        match self.active.get_mut(actor) {
            Some(mut count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => 0,
        }
    }

    /// In-flight count for one actor
    pub fn active_for(&self, actor: &str) -> u32 {
        self.active.get(actor).map(|count| *count).unwrap_or(0)
    }

    /// Sum of in-flight trades across all actors
    pub fn total_in_flight(&self) -> u64 {
        self.active.iter().map(|entry| *entry.value() as u64).sum()
    }

    /// Drop actors whose count has returned to zero; returns the eviction count
    pub fn cleanup(&self) -> usize {
        let before = self.active.len();
        self.active.retain(|_, count| *count > 0);
        before.saturating_sub(self.active.len())
    }
}

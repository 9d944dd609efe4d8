//! Daily actor activity tracking and risk flagging
//!
//! Admitted trades feed per-actor daily volume and trade counters; the
//! counters reset when the UTC day rolls over. A tiered score over those
//! counters surfaces actors worth a manual look.

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Per-actor counters for the current UTC day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorActivity {
    pub day: NaiveDate,
    pub daily_volume: Decimal,
    pub daily_trades: u32,
    pub last_trade: DateTime<Utc>,
}

impl ActorActivity {
    fn new(day: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            day,
            daily_volume: Decimal::ZERO,
            daily_trades: 0,
            last_trade: now,
        }
    }
}

/// A flagged actor with the score that flagged it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorRisk {
    pub actor: String,
    pub risk_score: u32,
    pub daily_volume: Decimal,
    pub daily_trades: u32,
}

/// Tracks admitted trade activity per actor
pub struct ActivityTracker {
    actors: DashMap<String, ActorActivity>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self {
            actors: DashMap::new(),
        }
    }

    /// Record one admitted trade for an actor
    pub fn record_trade(&self, actor: &str, amount: Decimal) {
        self.record_trade_at(actor, amount, Utc::now());
    }

    fn record_trade_at(&self, actor: &str, amount: Decimal, now: DateTime<Utc>) {
        let today = now.date_naive();
        let mut activity = self
            .actors
            .entry(actor.to_string())
            .or_insert_with(|| ActorActivity::new(today, now));

        if activity.day != today {
            activity.day = today;
            activity.daily_volume = Decimal::ZERO;
            activity.daily_trades = 0;
        }

        activity.daily_volume = activity
            .daily_volume
            .checked_add(amount)
            .unwrap_or(Decimal::MAX);
        activity.daily_trades = activity.daily_trades.saturating_add(1);
        activity.last_trade = now;
    }

    /// Risk score for a day of activity
    ///
    /// Volume tiers: above 50k adds 3, above 25k adds 2, above 10k adds 1.
    /// Trade count tiers: above 50 adds 2, above 20 adds 1. An actor is
    /// flagged at a score of 3 or more.
    pub fn risk_score(activity: &ActorActivity) -> u32 {
        let mut score = 0;

        if activity.daily_volume > dec!(50000) {
            score += 3;
        } else if activity.daily_volume > dec!(25000) {
            score += 2;
        } else if activity.daily_volume > dec!(10000) {
            score += 1;
        }

        if activity.daily_trades > 50 {
            score += 2;
        } else if activity.daily_trades > 20 {
            score += 1;
        }

        score
    }

    /// Actors whose score reached the flagging bar, highest score first
    pub fn flagged(&self) -> Vec<ActorRisk> {
        let mut flagged: Vec<ActorRisk> = self
            .actors
            .iter()
            .filter_map(|entry| {
                let score = Self::risk_score(entry.value());
                if score >= 3 {
                    Some(ActorRisk {
                        actor: entry.key().clone(),
                        risk_score: score,
                        daily_volume: entry.value().daily_volume,
                        daily_trades: entry.value().daily_trades,
                    })
                } else {
                    None
                }
            })
            .collect();

        flagged.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
        flagged
    }

    /// Current counters for one actor
    pub fn stats(&self, actor: &str) -> Option<ActorActivity> {
        self.actors.get(actor).map(|entry| entry.value().clone())
    }

    /// Drop an actor's counters (administrative reset)
    pub fn reset(&self, actor: &str) -> bool {
        self.actors.remove(actor).is_some()
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_accumulates_within_a_day() {
        let tracker = ActivityTracker::new();

        tracker.record_trade("actor", dec!(100));
        tracker.record_trade("actor", dec!(250));

        let stats = tracker.stats("actor").unwrap();
        assert_eq!(stats.daily_volume, dec!(350));
        assert_eq!(stats.daily_trades, 2);
    }

    #[test]
    fn test_day_rollover_resets_counters() {
        let tracker = ActivityTracker::new();
        let monday = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
        let tuesday = Utc.with_ymd_and_hms(2025, 6, 3, 9, 0, 0).unwrap();

        tracker.record_trade_at("actor", dec!(1000), monday);
        tracker.record_trade_at("actor", dec!(1000), monday);
        tracker.record_trade_at("actor", dec!(50), tuesday);

        let stats = tracker.stats("actor").unwrap();
        assert_eq!(stats.day, tuesday.date_naive());
        assert_eq!(stats.daily_volume, dec!(50));
        assert_eq!(stats.daily_trades, 1);
    }

    #[test]
    fn test_risk_score_tiers() {
        let tracker = ActivityTracker::new();
        let now = Utc::now();

        let score = |volume: Decimal, trades: u32| {
            let mut activity = ActorActivity::new(now.date_naive(), now);
            activity.daily_volume = volume;
            activity.daily_trades = trades;
            ActivityTracker::risk_score(&activity)
        };

        assert_eq!(score(dec!(500), 5), 0);
        assert_eq!(score(dec!(10001), 5), 1);
        assert_eq!(score(dec!(25001), 5), 2);
        assert_eq!(score(dec!(50001), 5), 3);
        assert_eq!(score(dec!(500), 21), 1);
        assert_eq!(score(dec!(500), 51), 2);
        assert_eq!(score(dec!(50001), 51), 5);

        drop(tracker);
    }

    #[test]
    fn test_flagged_requires_score_of_three() {
        let tracker = ActivityTracker::new();

        // Heavy volume and busy: score 3 + 2, flagged first
        for _ in 0..51 {
            tracker.record_trade("whale", dec!(1200));
        }
        // Busy but small: score 2 + 1, flagged
        for _ in 0..21 {
            tracker.record_trade("grinder", dec!(1300));
        }
        // Quiet: not flagged
        tracker.record_trade("tourist", dec!(10));

        let flagged = tracker.flagged();
        assert_eq!(flagged.len(), 2);
        assert_eq!(flagged[0].actor, "whale");
        assert_eq!(flagged[0].risk_score, 5);
        assert_eq!(flagged[1].actor, "grinder");
        assert_eq!(flagged[1].risk_score, 3);
        assert!(flagged.iter().all(|risk| risk.actor != "tourist"));
    }

    #[test]
    fn test_reset_drops_actor() {
        let tracker = ActivityTracker::new();

        tracker.record_trade("actor", dec!(100));
        assert!(tracker.reset("actor"));
        assert!(tracker.stats("actor").is_none());
        assert!(!tracker.reset("actor"));
    }
}

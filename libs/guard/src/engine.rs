//! # Trade Integrity Engine - Admission Control Hub
//!
//! ## Purpose
//!
//! Central orchestrator that decides, for every proposed buy or sell against
//! the bonding curve, whether the trade may proceed. Composes address
//! validation, rate limiting, concurrency bounds, trade size bounds and curve
//! price impact into one request/response contract, escalates extreme impact
//! to a global halt, and records every decision in the audit trail.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Trade requests with pool snapshots from the execution path
//! - **Output Destinations**: Structured verdicts back to the caller, audit events
//! - **State Management**: All mutable state lives inside the engine instance;
//!   share it via `Arc` across request handlers
//! - **Lifecycle Contract**: Admitted trades must be bracketed with
//!   `start_trade`/`end_trade` by the caller on every exit path
//!
//! All state is in-memory. A process restart silently resets rate limits,
//! in-flight counts and the pause latch to their permissive initial state;
//! integrators needing durability must layer it on outside this engine.

use launchguard_curve::{CurveMath, CurvePool, TradeDirection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::activity::{ActivityTracker, ActorActivity, ActorRisk};
use crate::audit::{AuditLog, EventCategory, EventDraft, SecurityEvent, Severity};
use crate::concurrency::ConcurrencyGuard;
use crate::config::SecurityConfig;
use crate::pause::{PauseController, PauseStatus};
use crate::rate_limit::RateLimiter;
use crate::validation::TradeValidator;

/// Fixed rejection text while the emergency pause is engaged
const PAUSED_ERROR: &str = "Trading is paused: emergency pause is active";

/// Fallback rejection when validation itself fails internally
const INTERNAL_ERROR: &str = "Trade validation failed due to an internal error";

/// Pool state snapshot supplied by the caller alongside the trade
///
/// The engine never fetches chain state itself; the execution path captures
/// these four values and passes them in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub current_price: Decimal,
    pub virtual_base_reserves: Decimal,
    pub virtual_supply_reserves: Decimal,
    pub total_liquidity: Decimal,
}

/// One proposed trade awaiting an admission decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequest {
    /// Actor wallet address
    pub actor: String,
    pub direction: TradeDirection,
    /// Trade amount in the pool's base unit
    pub amount: Decimal,
    pub pool: PoolSnapshot,
    /// Network origin of the request, carried into audit events
    pub origin: Option<String>,
    /// Client identification string, carried into audit events
    pub client: Option<String>,
}

impl TradeRequest {
    pub fn new(actor: &str, direction: TradeDirection, amount: Decimal, pool: PoolSnapshot) -> Self {
        Self {
            actor: actor.to_string(),
            direction,
            amount,
            pool,
            origin: None,
            client: None,
        }
    }
}

/// Structured admission verdict for one trade request
///
/// `slippage` equals `price_impact` in this model. `estimated_output` is a
/// spot-price estimate (buy: amount / price, sell: amount * price), not the
/// exact curve output; callers wanting the exact figure should use
/// `CurveMath::buy_quote` / `sell_quote`. The two models are deliberately
/// kept separate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeValidationResult {
    pub is_valid: bool,
    /// Blocking rejection reasons, in check order
    pub errors: Vec<String>,
    /// Non-blocking advisories
    pub warnings: Vec<String>,
    /// Fraction of price movement the trade would cause
    pub price_impact: Decimal,
    pub slippage: Decimal,
    pub estimated_output: Decimal,
}

impl TradeValidationResult {
    fn rejected(error: &str) -> Self {
        Self {
            is_valid: false,
            errors: vec![error.to_string()],
            warnings: Vec::new(),
            price_impact: Decimal::ZERO,
            slippage: Decimal::ZERO,
            estimated_output: Decimal::ZERO,
        }
    }
}

/// Aggregate counters over the retained audit window and live state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityStats {
    pub total_events: usize,
    pub critical_events: usize,
    pub high_severity_events: usize,
    pub emergency_paused: bool,
    /// Sum of in-flight trades across all actors
    pub active_trades: u64,
    /// Retained events carrying the rate-limit action label
    pub rate_limit_rejections: usize,
}

/// The trade integrity engine
///
/// One instance owns all mutable admission state. Construct once per process
/// (or per test fixture) and share behind an `Arc`; every method takes
/// `&self` and is safe to call from concurrent request handlers.
pub struct TradeGuard {
    config: SecurityConfig,
    rate_limiter: RateLimiter,
    concurrency: ConcurrencyGuard,
    pause: PauseController,
    audit: AuditLog,
    activity: ActivityTracker,
}

impl TradeGuard {
    /// Build an engine from a validated configuration
    pub fn new(config: SecurityConfig) -> anyhow::Result<Self> {
        config.validate()?;

        Ok(Self {
            rate_limiter: RateLimiter::new(config.rate_limit_per_minute, config.rate_limit_per_hour),
            concurrency: ConcurrencyGuard::new(config.max_concurrent_trades),
            pause: PauseController::new(),
            audit: AuditLog::new(config.audit_logging, config.audit_log_capacity),
            activity: ActivityTracker::new(),
            config,
        })
    }

    /// Engine with production default parameters
    pub fn with_defaults() -> Self {
        Self::new(SecurityConfig::default()).expect("default config is valid")
    }

    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    /// Decide whether one proposed trade may proceed
    ///
    /// Runs every check and aggregates all rejection reasons rather than
    /// stopping at the first, so the caller sees the full picture in one
    /// round trip. The only short circuit is the emergency pause. Never
    /// panics and never returns an error to the caller: internal faults
    /// collapse into a single generic rejection.
    pub fn validate_trade(&self, request: &TradeRequest) -> TradeValidationResult {
        if self.pause.is_paused() {
            debug!(actor = %request.actor, "Trade rejected: emergency pause active");
            return TradeValidationResult::rejected(PAUSED_ERROR);
        }

        match self.run_checks(request) {
            Ok(result) => result,
            Err(fault) => {
                error!(actor = %request.actor, %fault, "Trade validation fault");
                let mut draft = EventDraft::new(
                    EventCategory::Error,
                    Severity::Critical,
                    "validation_fault",
                    &format!("Internal fault during trade validation: {:#}", fault),
                );
                draft.actor = Some(request.actor.clone());
                draft.amount = Some(request.amount);
                draft.origin = request.origin.clone();
                draft.client = request.client.clone();
                self.audit.record(draft);

                TradeValidationResult::rejected(INTERNAL_ERROR)
            }
        }
    }

    fn run_checks(&self, request: &TradeRequest) -> anyhow::Result<TradeValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if let Err(reason) = TradeValidator::validate_wallet_address(&request.actor) {
            errors.push(reason.to_string());
        }

        if let Err(reason) = self.rate_limiter.check(&request.actor) {
            errors.push(reason.to_string());

            let mut draft = EventDraft::new(
                EventCategory::Security,
                Severity::High,
                "rate_limit_exceeded",
                &reason.to_string(),
            );
            draft.actor = Some(request.actor.clone());
            draft.origin = request.origin.clone();
            draft.client = request.client.clone();
            self.audit.record(draft);
        }

        if let Err(reason) = self.concurrency.check(&request.actor) {
            errors.push(reason.to_string());
        }

        // Curve math needs positive inputs; collect specific input errors
        // instead of letting the math fail with a generic one.
        let pool = &request.pool;
        let inputs_sane = {
            let mut sane = true;
            if request.amount <= Decimal::ZERO {
                errors.push("Trade amount must be positive".to_string());
                sane = false;
            }
            if pool.current_price <= Decimal::ZERO {
                errors.push("Current price must be positive".to_string());
                sane = false;
            }
            if pool.virtual_base_reserves <= Decimal::ZERO
                || pool.virtual_supply_reserves <= Decimal::ZERO
            {
                errors.push("Pool reserves must be positive".to_string());
                sane = false;
            }
            if pool.total_liquidity <= Decimal::ZERO {
                errors.push("Pool liquidity must be positive".to_string());
                sane = false;
            }
            sane
        };

        let mut price_impact = Decimal::ZERO;
        let mut estimated_output = Decimal::ZERO;

        if inputs_sane {
            if let Err(reason) = TradeValidator::validate_trade_size(
                request.amount,
                pool.total_liquidity,
                request.direction,
                self.config.min_trade_size_fraction,
                self.config.max_trade_size_fraction,
            ) {
                errors.push(reason.to_string());
            } else {
                let half_max =
                    pool.total_liquidity * self.config.max_trade_size_fraction / Decimal::TWO;
                if request.amount > half_max {
                    warnings.push(format!(
                        "Large trade: {} is more than half the per-trade maximum",
                        request.amount
                    ));
                }
            }

            let curve_pool = CurvePool {
                base_reserves: pool.virtual_base_reserves,
                supply_reserves: pool.virtual_supply_reserves,
            };
            price_impact = CurveMath::price_impact(
                &curve_pool,
                pool.current_price,
                request.amount,
                request.direction,
            )?;

            if price_impact > self.config.max_price_impact {
                errors.push(format!(
                    "Price impact {} exceeds the maximum allowed {}",
                    price_impact, self.config.max_price_impact
                ));
            } else if price_impact > self.config.max_price_impact * Decimal::new(8, 1) {
                warnings.push(format!(
                    "Price impact {} is approaching the maximum {}",
                    price_impact, self.config.max_price_impact
                ));
            }

            // The pause check is independent of the hard cap: both errors may
            // appear, and the pause latches for all subsequent trades.
            if price_impact > self.config.emergency_pause_threshold {
                let reason = format!(
                    "Price impact {} exceeded the emergency pause threshold {} (actor {})",
                    price_impact, self.config.emergency_pause_threshold, request.actor
                );
                self.engage_pause(&reason, Some(&request.actor));
                errors.push(reason);
            }

            estimated_output =
                CurveMath::spot_estimate(request.amount, pool.current_price, request.direction)?;
        }

        let is_valid = errors.is_empty();

        let severity = if is_valid { Severity::Medium } else { Severity::High };
        let detail = if is_valid {
            format!(
                "{:?} of {} admitted with price impact {}",
                request.direction, request.amount, price_impact
            )
        } else {
            format!(
                "{:?} of {} rejected: {}",
                request.direction,
                request.amount,
                errors.join("; ")
            )
        };
        let mut draft = EventDraft::new(EventCategory::Trade, severity, "trade_validation", &detail);
        draft.actor = Some(request.actor.clone());
        draft.amount = Some(request.amount);
        draft.origin = request.origin.clone();
        draft.client = request.client.clone();
        self.audit.record(draft);

        if is_valid {
            self.activity.record_trade(&request.actor, request.amount);
        }

        debug!(
            actor = %request.actor,
            valid = is_valid,
            %price_impact,
            "Trade validation complete"
        );

        Ok(TradeValidationResult {
            is_valid,
            errors,
            warnings,
            price_impact,
            slippage: price_impact,
            estimated_output,
        })
    }

    /// Count a trade as started for the actor
    ///
    /// Call immediately after a successful validation, before submitting the
    /// trade. Every `start_trade` must be paired with exactly one `end_trade`
    /// on settlement, failure or cancellation.
    pub fn start_trade(&self, actor: &str) -> u32 {
        self.concurrency.start_trade(actor)
    }

    /// Count a trade as settled or abandoned for the actor
    ///
    /// Safe to call on an actor with no trades in flight; the count never
    /// goes negative.
    pub fn end_trade(&self, actor: &str) -> u32 {
        self.concurrency.end_trade(actor)
    }

    /// Engage the global pause (administrative)
    ///
    /// Returns false when trading was already paused; the original reason is
    /// kept in that case.
    pub fn trigger_emergency_pause(&self, reason: &str) -> bool {
        self.engage_pause(reason, None)
    }

    fn engage_pause(&self, reason: &str, actor: Option<&str>) -> bool {
        let engaged = self.pause.trigger(reason);
        if engaged {
            error!(%reason, "EMERGENCY PAUSE ENGAGED: all trading halted");
            let mut draft = EventDraft::new(
                EventCategory::Security,
                Severity::Critical,
                "emergency_pause",
                reason,
            );
            draft.actor = actor.map(str::to_string);
            self.audit.record(draft);
        } else {
            warn!(%reason, "Emergency pause already engaged");
        }
        engaged
    }

    /// Clear the global pause (administrative)
    pub fn release_emergency_pause(&self, reason: &str) -> bool {
        let released = self.pause.release();
        if released {
            info!(%reason, "Emergency pause released: trading resumed");
            self.audit.record(EventDraft::new(
                EventCategory::Admin,
                Severity::High,
                "emergency_pause_released",
                reason,
            ));
        } else {
            warn!(%reason, "Release requested but trading was not paused");
        }
        released
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    pub fn pause_status(&self) -> PauseStatus {
        self.pause.status()
    }

    /// Append an event from an adjacent marketplace flow (mint, reveal, ...)
    ///
    /// Lets the launchpad paths share the same bounded audit trail without
    /// going through trade validation.
    pub fn log_event(
        &self,
        category: EventCategory,
        severity: Severity,
        actor: Option<&str>,
        action: &str,
        detail: &str,
        amount: Option<Decimal>,
    ) -> Option<uuid::Uuid> {
        let mut draft = EventDraft::new(category, severity, action, detail);
        draft.actor = actor.map(str::to_string);
        draft.amount = amount;
        self.audit.record(draft)
    }

    /// Most recent audit events, newest first
    pub fn security_events(&self, limit: usize) -> Vec<SecurityEvent> {
        self.audit.recent(limit)
    }

    /// Aggregate view over the retained audit window and live counters
    pub fn security_stats(&self) -> SecurityStats {
        SecurityStats {
            total_events: self.audit.len(),
            critical_events: self.audit.count_at_least(Severity::Critical),
            high_severity_events: self.audit.count_at_least(Severity::High),
            emergency_paused: self.pause.is_paused(),
            active_trades: self.concurrency.total_in_flight(),
            rate_limit_rejections: self.audit.count_by_action("rate_limit_exceeded"),
        }
    }

    /// Clear an actor's rate windows and activity counters (administrative)
    pub fn reset_actor_limits(&self, actor: &str) -> bool {
        let had_windows = self.rate_limiter.reset(actor);
        let had_activity = self.activity.reset(actor);
        let cleared = had_windows || had_activity;

        if cleared {
            info!(%actor, "Actor limits reset");
            let mut draft = EventDraft::new(
                EventCategory::Admin,
                Severity::Medium,
                "actor_limits_reset",
                "Rate windows and activity counters cleared",
            );
            draft.actor = Some(actor.to_string());
            self.audit.record(draft);
        }
        cleared
    }

    /// Actors whose daily activity crossed the risk bar, highest score first
    pub fn flagged_actors(&self) -> Vec<ActorRisk> {
        self.activity.flagged()
    }

    /// Daily counters for one actor, if any activity was recorded today
    pub fn actor_activity(&self, actor: &str) -> Option<ActorActivity> {
        self.activity.stats(actor)
    }

    /// Evict expired rate windows and settled concurrency entries
    ///
    /// Best-effort memory reclamation; admission decisions never depend on
    /// this being called.
    pub fn cleanup(&self) -> usize {
        self.rate_limiter.cleanup() + self.concurrency.cleanup()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ACTOR: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

    fn snapshot() -> PoolSnapshot {
        PoolSnapshot {
            current_price: dec!(1),
            virtual_base_reserves: dec!(100000),
            virtual_supply_reserves: dec!(100000),
            total_liquidity: dec!(100000),
        }
    }

    fn engine() -> TradeGuard {
        TradeGuard::new(SecurityConfig {
            rate_limit_per_minute: 100,
            rate_limit_per_hour: 1000,
            ..SecurityConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_small_trade_is_admitted() {
        let guard = engine();
        let request = TradeRequest::new(ACTOR, TradeDirection::Buy, dec!(500), snapshot());

        let result = guard.validate_trade(&request);

        assert!(result.is_valid, "errors: {:?}", result.errors);
        assert!(result.errors.is_empty());
        assert_eq!(result.slippage, result.price_impact);
        // Spot estimate at price 1
        assert_eq!(result.estimated_output, dec!(500));
        assert!(result.price_impact < dec!(0.05));
    }

    #[test]
    fn test_reference_impact_case_is_rejected() {
        // Reserves 100/100 at price 1, buying 10: new price ~1.21, impact ~21%
        let guard = engine();
        let request = TradeRequest::new(
            ACTOR,
            TradeDirection::Buy,
            dec!(10),
            PoolSnapshot {
                current_price: dec!(1),
                virtual_base_reserves: dec!(100),
                virtual_supply_reserves: dec!(100),
                total_liquidity: dec!(1000),
            },
        );

        let result = guard.validate_trade(&request);

        assert!(!result.is_valid);
        assert!((result.price_impact - dec!(0.21)).abs() < dec!(0.0000001));
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("exceeds the maximum allowed 0.05")));
        // 21% is above the 15% threshold, so the pause latched too
        assert!(guard.is_paused());
    }

    #[test]
    fn test_bad_address_is_rejected() {
        let guard = engine();
        let request = TradeRequest::new("short", TradeDirection::Buy, dec!(500), snapshot());

        let result = guard.validate_trade(&request);

        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("Wallet address")));
    }

    #[test]
    fn test_errors_aggregate_instead_of_short_circuiting() {
        let guard = engine();
        // Bad address and oversized trade in one request
        let request = TradeRequest::new("bad!", TradeDirection::Buy, dec!(99999), snapshot());

        let result = guard.validate_trade(&request);

        assert!(!result.is_valid);
        assert!(result.errors.len() >= 2);
        assert!(result.errors.iter().any(|e| e.contains("Wallet address")));
        assert!(result.errors.iter().any(|e| e.contains("exceeds the maximum")));
    }

    #[test]
    fn test_non_positive_inputs_give_specific_errors() {
        let guard = engine();
        let mut request = TradeRequest::new(ACTOR, TradeDirection::Buy, dec!(0), snapshot());
        request.pool.current_price = dec!(0);

        let result = guard.validate_trade(&request);

        assert!(!result.is_valid);
        assert!(result.errors.contains(&"Trade amount must be positive".to_string()));
        assert!(result.errors.contains(&"Current price must be positive".to_string()));
        assert_eq!(result.price_impact, dec!(0));
        assert_eq!(result.estimated_output, dec!(0));
    }

    #[test]
    fn test_pause_short_circuits_everything() {
        let guard = engine();
        assert!(guard.trigger_emergency_pause("manual halt for testing"));

        let request = TradeRequest::new(ACTOR, TradeDirection::Buy, dec!(500), snapshot());
        let result = guard.validate_trade(&request);

        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![PAUSED_ERROR.to_string()]);
        assert_eq!(result.price_impact, dec!(0));
        assert_eq!(result.estimated_output, dec!(0));

        assert!(guard.release_emergency_pause("test complete"));
        assert!(guard.validate_trade(&request).is_valid);
    }

    #[test]
    fn test_rate_limit_rejection_is_audited() {
        let guard = TradeGuard::new(SecurityConfig {
            rate_limit_per_minute: 2,
            ..SecurityConfig::default()
        })
        .unwrap();
        let request = TradeRequest::new(ACTOR, TradeDirection::Buy, dec!(500), snapshot());

        assert!(guard.validate_trade(&request).is_valid);
        assert!(guard.validate_trade(&request).is_valid);

        let result = guard.validate_trade(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("maximum 2 trades per minute")));

        assert_eq!(guard.security_stats().rate_limit_rejections, 1);
    }

    #[test]
    fn test_concurrency_cap_blocks_validation() {
        let guard = engine();
        let request = TradeRequest::new(ACTOR, TradeDirection::Buy, dec!(500), snapshot());

        for _ in 0..3 {
            guard.start_trade(ACTOR);
        }

        let result = guard.validate_trade(&request);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("Too many concurrent trades")));

        guard.end_trade(ACTOR);
        assert!(guard.validate_trade(&request).is_valid);
    }

    #[test]
    fn test_sell_estimated_output_uses_spot_price() {
        let guard = engine();
        let pool = PoolSnapshot {
            current_price: dec!(2),
            virtual_base_reserves: dec!(200000),
            virtual_supply_reserves: dec!(100000),
            total_liquidity: dec!(100000),
        };
        let request = TradeRequest::new(ACTOR, TradeDirection::Sell, dec!(500), pool);

        let result = guard.validate_trade(&request);

        assert!(result.is_valid, "errors: {:?}", result.errors);
        assert_eq!(result.estimated_output, dec!(1000));
    }

    #[test]
    fn test_large_trade_warning_is_non_blocking() {
        let guard = engine();
        // Max size is 10% of 100k = 10k; above 5k warns but admits. Reserves
        // are deep enough that the curve impact stays under the cap.
        let pool = PoolSnapshot {
            current_price: dec!(1),
            virtual_base_reserves: dec!(10000000),
            virtual_supply_reserves: dec!(10000000),
            total_liquidity: dec!(100000),
        };
        let request = TradeRequest::new(ACTOR, TradeDirection::Buy, dec!(6000), pool);

        let result = guard.validate_trade(&request);

        assert!(result.is_valid, "errors: {:?}", result.errors);
        assert!(result.warnings.iter().any(|w| w.contains("Large trade")));
    }

    #[test]
    fn test_admitted_trades_feed_activity_tracking() {
        let guard = engine();
        let request = TradeRequest::new(ACTOR, TradeDirection::Buy, dec!(500), snapshot());

        guard.validate_trade(&request);
        guard.validate_trade(&request);

        let activity = guard.actor_activity(ACTOR).unwrap();
        assert_eq!(activity.daily_trades, 2);
        assert_eq!(activity.daily_volume, dec!(1000));

        // Rejected trades are not counted
        let bad = TradeRequest::new(ACTOR, TradeDirection::Buy, dec!(99999), snapshot());
        guard.validate_trade(&bad);
        assert_eq!(guard.actor_activity(ACTOR).unwrap().daily_trades, 2);
    }

    #[test]
    fn test_reset_actor_limits_clears_rate_windows() {
        let guard = TradeGuard::new(SecurityConfig {
            rate_limit_per_minute: 1,
            ..SecurityConfig::default()
        })
        .unwrap();
        let request = TradeRequest::new(ACTOR, TradeDirection::Buy, dec!(500), snapshot());

        assert!(guard.validate_trade(&request).is_valid);
        assert!(!guard.validate_trade(&request).is_valid);

        assert!(guard.reset_actor_limits(ACTOR));
        assert!(guard.validate_trade(&request).is_valid);

        assert!(!guard.reset_actor_limits("unknown-actor"));
    }

    #[test]
    fn test_stats_reflect_decisions() {
        let guard = engine();
        let request = TradeRequest::new(ACTOR, TradeDirection::Buy, dec!(500), snapshot());

        guard.validate_trade(&request);
        guard.start_trade(ACTOR);

        let stats = guard.security_stats();
        assert_eq!(stats.total_events, 1);
        assert_eq!(stats.active_trades, 1);
        assert!(!stats.emergency_paused);
        assert_eq!(stats.critical_events, 0);

        guard.end_trade(ACTOR);
        assert_eq!(guard.security_stats().active_trades, 0);
    }

    #[test]
    fn test_log_event_shares_the_audit_trail() {
        let guard = engine();

        let id = guard.log_event(
            EventCategory::Mint,
            Severity::Low,
            Some(ACTOR),
            "mint_completed",
            "minted asset #42",
            Some(dec!(1.5)),
        );
        assert!(id.is_some());

        let events = guard.security_events(10);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, "mint_completed");
        assert_eq!(events[0].actor.as_deref(), Some(ACTOR));
    }

    #[test]
    fn test_internal_fault_collapses_to_one_generic_error() {
        let guard = engine();
        // Reserves near the top of the Decimal range: the k product overflows
        // inside the curve math, which must surface as a contained fault
        let request = TradeRequest::new(
            ACTOR,
            TradeDirection::Buy,
            dec!(10),
            PoolSnapshot {
                current_price: dec!(1),
                virtual_base_reserves: dec!(79000000000000000000000000000),
                virtual_supply_reserves: dec!(79000000000000000000000000000),
                total_liquidity: dec!(1000),
            },
        );

        let result = guard.validate_trade(&request);

        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![INTERNAL_ERROR.to_string()]);

        let events = guard.security_events(10);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].category, EventCategory::Error);
        assert_eq!(events[0].severity, Severity::Critical);
        assert_eq!(events[0].action, "validation_fault");
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let config = SecurityConfig {
            max_price_impact: dec!(0.5),
            emergency_pause_threshold: dec!(0.1),
            ..SecurityConfig::default()
        };
        assert!(TradeGuard::new(config).is_err());
    }
}

//! # Security Configuration - Trade Admission Parameters
//!
//! ## Purpose
//!
//! Runtime parameter control for the trade integrity engine without hardcoded
//! values. Configuration is supplied programmatically at engine construction;
//! environment variable overrides and invariant validation are the only other
//! surface.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Programmatic construction, environment variables, defaults
//! - **Output Destinations**: All engine components (rate limiter, concurrency
//!   guard, pause controller, audit log, size and impact checks)
//! - **Validation**: Complete parameter validation with detailed error reporting
//! - **Serialization**: Serde derives so the consuming web layer can pass the
//!   active configuration through directly

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Complete configuration for the trade integrity engine
///
/// Set once at engine construction and immutable afterwards. Fractions are
/// ratios, not percentages: 0.05 means 5%.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Hard ceiling on acceptable price movement per trade (fraction)
    pub max_price_impact: Decimal,
    /// Impact level that halts all trading instead of rejecting one trade
    pub emergency_pause_threshold: Decimal,
    /// Largest trade as a fraction of pool liquidity (whale guard)
    pub max_trade_size_fraction: Decimal,
    /// Smallest trade as a fraction of pool liquidity (dust guard)
    pub min_trade_size_fraction: Decimal,
    /// Trades allowed per actor per 60-second window
    pub rate_limit_per_minute: u32,
    /// Trades allowed per actor per 3600-second window
    pub rate_limit_per_hour: u32,
    /// Simultaneously in-flight trades allowed per actor
    pub max_concurrent_trades: u32,
    /// Toggle for the audit trail; disabling makes `record` a no-op
    pub audit_logging: bool,
    /// Ring buffer capacity for retained audit events
    pub audit_log_capacity: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_price_impact: dec!(0.05),         // 5%
            emergency_pause_threshold: dec!(0.15), // 15%
            max_trade_size_fraction: dec!(0.10),  // 10% of liquidity
            min_trade_size_fraction: dec!(0.001), // 0.1% of liquidity
            rate_limit_per_minute: 10,
            rate_limit_per_hour: 100,
            max_concurrent_trades: 3,
            audit_logging: true,
            audit_log_capacity: 10_000,
        }
    }
}

impl SecurityConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Override with environment variables if present
        if let Ok(max_impact) = std::env::var("LAUNCHGUARD_MAX_PRICE_IMPACT") {
            if let Ok(value) = max_impact.parse::<f64>() {
                config.max_price_impact =
                    Decimal::from_f64_retain(value).unwrap_or(config.max_price_impact);
            }
        }

        if let Ok(threshold) = std::env::var("LAUNCHGUARD_PAUSE_THRESHOLD") {
            if let Ok(value) = threshold.parse::<f64>() {
                config.emergency_pause_threshold =
                    Decimal::from_f64_retain(value).unwrap_or(config.emergency_pause_threshold);
            }
        }

        if let Ok(per_minute) = std::env::var("LAUNCHGUARD_RATE_PER_MINUTE") {
            if let Ok(value) = per_minute.parse::<u32>() {
                config.rate_limit_per_minute = value;
            }
        }

        if let Ok(per_hour) = std::env::var("LAUNCHGUARD_RATE_PER_HOUR") {
            if let Ok(value) = per_hour.parse::<u32>() {
                config.rate_limit_per_hour = value;
            }
        }

        if let Ok(max_concurrent) = std::env::var("LAUNCHGUARD_MAX_CONCURRENT") {
            if let Ok(value) = max_concurrent.parse::<u32>() {
                config.max_concurrent_trades = value;
            }
        }

        if let Ok(audit_logging) = std::env::var("LAUNCHGUARD_AUDIT_LOGGING") {
            config.audit_logging = audit_logging.to_lowercase() == "true";
        }

        config
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_price_impact <= dec!(0) {
            anyhow::bail!("max_price_impact must be positive");
        }

        if self.emergency_pause_threshold <= self.max_price_impact {
            anyhow::bail!("emergency_pause_threshold must exceed max_price_impact");
        }

        if self.emergency_pause_threshold >= dec!(1) {
            anyhow::bail!("emergency_pause_threshold must be below 1 (100%)");
        }

        if self.min_trade_size_fraction < dec!(0) {
            anyhow::bail!("min_trade_size_fraction must be non-negative");
        }

        if self.max_trade_size_fraction <= self.min_trade_size_fraction {
            anyhow::bail!("max_trade_size_fraction must exceed min_trade_size_fraction");
        }

        if self.max_trade_size_fraction > dec!(1) {
            anyhow::bail!("max_trade_size_fraction must be at most 1 (100% of liquidity)");
        }

        if self.rate_limit_per_minute == 0 {
            anyhow::bail!("rate_limit_per_minute must be positive");
        }

        if self.rate_limit_per_hour == 0 {
            anyhow::bail!("rate_limit_per_hour must be positive");
        }

        if self.max_concurrent_trades == 0 {
            anyhow::bail!("max_concurrent_trades must be positive");
        }

        if self.audit_log_capacity == 0 {
            anyhow::bail!("audit_log_capacity must be positive");
        }

        Ok(())
    }
}

//! # LaunchGuard - Trade Integrity Engine
//!
//! ## Purpose
//!
//! Admission control for bonding-curve trades. For every proposed buy or sell
//! the engine prices the trade against the constant product curve, bounds the
//! resulting price movement, throttles abusive call patterns per actor, caps
//! simultaneously in-flight trades, escalates suspected manipulation to a
//! system-wide halt, and records every decision in a bounded audit trail.
//!
//! The engine decides; it never moves funds or submits transactions. The
//! execution path consults [`TradeGuard::validate_trade`] before submitting a
//! trade and brackets the submission with [`TradeGuard::start_trade`] /
//! [`TradeGuard::end_trade`] afterwards.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Trade requests with pool state snapshots captured by the caller
//! - **Output Destinations**: Structured verdicts, audit events, aggregate security stats
//! - **Concurrency**: Share one engine behind an `Arc`; all methods take `&self`
//!   and synchronize internally
//! - **Persistence**: None. A process restart resets rate limits, in-flight
//!   counts and the pause latch to their permissive initial state. Integrators
//!   who need durable throttling must persist outside this engine.
//!
//! ## Usage
//!
//! ```
//! use launchguard_guard::{PoolSnapshot, SecurityConfig, TradeGuard, TradeRequest};
//! use launchguard_curve::{dec, TradeDirection};
//!
//! let guard = TradeGuard::new(SecurityConfig::default()).unwrap();
//!
//! let request = TradeRequest::new(
//!     "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
//!     TradeDirection::Buy,
//!     dec!(500),
//!     PoolSnapshot {
//!         current_price: dec!(1),
//!         virtual_base_reserves: dec!(100000),
//!         virtual_supply_reserves: dec!(100000),
//!         total_liquidity: dec!(100000),
//!     },
//! );
//!
//! let verdict = guard.validate_trade(&request);
//! if verdict.is_valid {
//!     guard.start_trade(&request.actor);
//!     // submit the trade, then in all cases:
//!     guard.end_trade(&request.actor);
//! }
//! ```

pub mod activity;
pub mod audit;
pub mod concurrency;
pub mod config;
pub mod engine;
pub mod pause;
pub mod rate_limit;
pub mod validation;

pub use activity::{ActivityTracker, ActorActivity, ActorRisk};
pub use audit::{AuditLog, EventCategory, EventDraft, SecurityEvent, Severity};
pub use concurrency::{ConcurrencyError, ConcurrencyGuard};
pub use config::SecurityConfig;
pub use engine::{PoolSnapshot, SecurityStats, TradeGuard, TradeRequest, TradeValidationResult};
pub use pause::{PauseController, PauseStatus};
pub use rate_limit::{RateLimitError, RateLimiter};
pub use validation::{AddressError, NumericError, TradeSizeError, TradeValidator};

//! # LaunchGuard Curve Library - Bonding Curve Mathematics
//!
//! ## Purpose
//!
//! Exact constant product mathematics for the launchpad bonding curve. Provides
//! post-trade reserve projection, price impact measurement, and full trade quotes
//! with fee breakdowns, all in `Decimal` arithmetic so the integrity checks agree
//! with on-curve settlement to the last digit.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Pool snapshots submitted with trade requests, quote parameters
//! - **Output Destinations**: Trade integrity engine (price impact enforcement), quote endpoints
//! - **Precision**: Zero precision loss via `Decimal` arithmetic (no floating-point)
//! - **Validation**: Positive-input enforcement and overflow checks on every entry point

pub mod cp_math;

pub use cp_math::{CurveMath, CurvePool, CurveQuote, TradeDirection};

/// Common types for curve calculations
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;

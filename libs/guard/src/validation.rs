//! Pure input validators for trade admission
//!
//! Stateless checks over caller-supplied values: actor addresses, trade
//! notional against pool liquidity, free-text metadata, and raw numeric
//! input crossing the JSON boundary.

use launchguard_curve::TradeDirection;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

/// Shortest acceptable actor address
const MIN_ADDRESS_LENGTH: usize = 32;

/// Longest acceptable actor address
const MAX_ADDRESS_LENGTH: usize = 44;

/// Regex for the on-chain address alphabet (base58: no 0, O, I, l)
static ADDRESS_ALPHABET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9A-HJ-NP-Za-km-z]+$").unwrap());

/// Regex matching every character the sanitizer strips: anything outside
/// alphanumerics, whitespace and `. , _ - : @ # /`
static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9\s.,_\-:@#/]").unwrap());

/// Syntactic address rejections
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Wallet address cannot be empty")]
    Empty,

    #[error("Wallet address must be {min}-{max} characters, got {length}")]
    BadLength {
        min: usize,
        max: usize,
        length: usize,
    },

    #[error("Wallet address contains characters outside the base58 alphabet")]
    BadAlphabet,
}

/// Trade notional rejections against pool liquidity bounds
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TradeSizeError {
    #[error("Trade size {amount} is below the minimum {min_size} ({min_pct}% of pool liquidity)")]
    BelowMinimum {
        amount: Decimal,
        min_size: Decimal,
        min_pct: Decimal,
    },

    #[error("Trade size {amount} exceeds the maximum {max_size} ({max_pct}% of pool liquidity)")]
    AboveMaximum {
        amount: Decimal,
        max_size: Decimal,
        max_pct: Decimal,
    },
}

/// Raw numeric input rejections
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericError {
    #[error("Value must be a finite number")]
    NotFinite,

    #[error("Value {value} is outside the allowed range {min} to {max}")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("Value cannot be represented as a decimal")]
    NotRepresentable,
}

/// Input validation for trade requests
pub struct TradeValidator;

impl TradeValidator {
    /// Validate an actor address: non-empty, 32-44 characters, base58 alphabet
    ///
    /// Syntactic only; no checksum verification.
    pub fn validate_wallet_address(address: &str) -> Result<(), AddressError> {
        if address.is_empty() {
            return Err(AddressError::Empty);
        }

        let length = address.len();
        if !(MIN_ADDRESS_LENGTH..=MAX_ADDRESS_LENGTH).contains(&length) {
            return Err(AddressError::BadLength {
                min: MIN_ADDRESS_LENGTH,
                max: MAX_ADDRESS_LENGTH,
                length,
            });
        }

        if !ADDRESS_ALPHABET.is_match(address) {
            return Err(AddressError::BadAlphabet);
        }

        Ok(())
    }

    /// Bound a trade's notional value against the pool's total liquidity
    ///
    /// Rejects below `total_liquidity * min_fraction` (dust guard) and above
    /// `total_liquidity * max_fraction` (whale guard). `_direction` does not
    /// change the bound today; buys and sells share the same limits.
    pub fn validate_trade_size(
        amount: Decimal,
        total_liquidity: Decimal,
        _direction: TradeDirection,
        min_fraction: Decimal,
        max_fraction: Decimal,
    ) -> Result<(), TradeSizeError> {
        let min_size = total_liquidity * min_fraction;
        let max_size = total_liquidity * max_fraction;

        if amount < min_size {
            return Err(TradeSizeError::BelowMinimum {
                amount,
                min_size,
                min_pct: min_fraction * Decimal::ONE_HUNDRED,
            });
        }

        if amount > max_size {
            return Err(TradeSizeError::AboveMaximum {
                amount,
                max_size,
                max_pct: max_fraction * Decimal::ONE_HUNDRED,
            });
        }

        Ok(())
    }

    /// Strip non-whitelisted characters from free text and truncate
    ///
    /// Keeps alphanumerics, whitespace and `. , _ - : @ # /`; everything else
    /// (HTML brackets, quotes, control characters) is removed. The result is
    /// trimmed and cut to `max_length` characters.
    pub fn sanitize_input(text: &str, max_length: usize) -> String {
        let cleaned = DISALLOWED_CHARS.replace_all(text, "");
        cleaned.trim().chars().take(max_length).collect()
    }

    /// Validate a raw numeric input and convert it to `Decimal`
    ///
    /// Rejects NaN and infinities, enforces the inclusive `min..=max` range,
    /// and fails when the value cannot be represented as a decimal.
    pub fn validate_numeric_input(value: f64, min: f64, max: f64) -> Result<Decimal, NumericError> {
        if !value.is_finite() {
            return Err(NumericError::NotFinite);
        }

        if value < min || value > max {
            return Err(NumericError::OutOfRange { value, min, max });
        }

        Decimal::from_f64_retain(value).ok_or(NumericError::NotRepresentable)
    }
}

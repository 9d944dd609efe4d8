//! Constant product bonding curve math with exact calculations
//!
//! Preserves full precision using Decimal type so price impact checks
//! and trade quotes agree with on-curve settlement.

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Trade side relative to the curve
///
/// Buys spend base currency and drain supply; sells return supply and
/// drain base currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// Virtual reserves backing a bonding curve pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePool {
    pub base_reserves: Decimal,
    pub supply_reserves: Decimal,
}

/// Exact quote for a trade: curve output plus fee breakdown
///
/// `price_impact` is a fraction (0.05 = 5%). For buys the fee comes off the
/// base currency paid in, so `net_amount` is the input after fees; for sells
/// the fee comes off the base currency received, so `net_amount` is the
/// output after fees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveQuote {
    pub input_amount: Decimal,
    pub output_amount: Decimal,
    pub price_impact: Decimal,
    pub fee: Decimal,
    pub net_amount: Decimal,
}

/// Bonding curve math functions with zero precision loss
pub struct CurveMath;

impl CurveMath {
    /// Spot price of one supply unit in base currency
    pub fn spot_price(pool: &CurvePool) -> Result<Decimal> {
        Self::validate_reserves(pool)?;
        Ok(pool.base_reserves / pool.supply_reserves)
    }

    /// Curve invariant k = base_reserves * supply_reserves
    pub fn constant_product(pool: &CurvePool) -> Result<Decimal> {
        Self::validate_reserves(pool)?;
        pool.base_reserves
            .checked_mul(pool.supply_reserves)
            .context("Reserve product exceeds Decimal range")
    }

    /// Calculate reserves after settling a trade against x*y=k
    ///
    /// Buys add the trade amount to the base side; sells add it to the
    /// supply side. The opposite reserve is recomputed from the invariant,
    /// so the result never drains either side to zero.
    pub fn post_trade_reserves(
        pool: &CurvePool,
        amount: Decimal,
        direction: TradeDirection,
    ) -> Result<CurvePool> {
        if amount <= dec!(0) {
            bail!("Trade amount must be positive");
        }
        let k = Self::constant_product(pool)?;

        let (new_base, new_supply) = match direction {
            TradeDirection::Buy => {
                let new_base = pool
                    .base_reserves
                    .checked_add(amount)
                    .context("Base reserves exceed Decimal range")?;
                if new_base <= dec!(0) {
                    bail!("Invalid calculation: denominator would be zero");
                }
                // k / new_base <= supply_reserves, so the division cannot overflow
                (new_base, k / new_base)
            }
            TradeDirection::Sell => {
                let new_supply = pool
                    .supply_reserves
                    .checked_add(amount)
                    .context("Supply reserves exceed Decimal range")?;
                if new_supply <= dec!(0) {
                    bail!("Invalid calculation: denominator would be zero");
                }
                (k / new_supply, new_supply)
            }
        };

        Ok(CurvePool {
            base_reserves: new_base,
            supply_reserves: new_supply,
        })
    }

    /// Calculate the relative spot price move a trade would cause
    ///
    /// `current_price` is the caller's view of the pre-trade price; the
    /// post-trade price comes from the projected reserves. Returns a
    /// fraction (0.21 = 21% move).
    pub fn price_impact(
        pool: &CurvePool,
        current_price: Decimal,
        amount: Decimal,
        direction: TradeDirection,
    ) -> Result<Decimal> {
        if current_price <= dec!(0) {
            bail!("Current price must be positive");
        }

        let post = Self::post_trade_reserves(pool, amount, direction)?;
        let new_price = Self::spot_price(&post)?;

        (new_price - current_price)
            .abs()
            .checked_div(current_price)
            .context("Price impact exceeds Decimal range")
    }

    /// Straight-line output estimate at the current spot price
    ///
    /// Ignores curve movement: buys receive amount / price supply units,
    /// sells receive amount * price base units. Used for fast previews,
    /// not settlement.
    pub fn spot_estimate(
        amount: Decimal,
        current_price: Decimal,
        direction: TradeDirection,
    ) -> Result<Decimal> {
        if amount <= dec!(0) {
            bail!("Trade amount must be positive");
        }
        if current_price <= dec!(0) {
            bail!("Current price must be positive");
        }

        match direction {
            TradeDirection::Buy => amount
                .checked_div(current_price)
                .context("Estimated output exceeds Decimal range"),
            TradeDirection::Sell => amount
                .checked_mul(current_price)
                .context("Estimated output exceeds Decimal range"),
        }
    }

    /// Exact quote for spending `amount_in` base currency on supply units
    ///
    /// The fee is charged beside the curve rather than inside it: the full
    /// input settles against x*y=k and the fee is collected separately from
    /// the base currency paid.
    pub fn buy_quote(pool: &CurvePool, amount_in: Decimal, fee_bps: u32) -> Result<CurveQuote> {
        let price_before = Self::spot_price(pool)?;
        let post = Self::post_trade_reserves(pool, amount_in, TradeDirection::Buy)?;

        let output_amount = pool.supply_reserves - post.supply_reserves;
        let price_impact = Self::relative_move(price_before, Self::spot_price(&post)?)?;

        let fee = amount_in * Self::fee_rate(fee_bps)?;
        Ok(CurveQuote {
            input_amount: amount_in,
            output_amount,
            price_impact,
            fee,
            net_amount: amount_in - fee,
        })
    }

    /// Exact quote for selling `amount_in` supply units for base currency
    pub fn sell_quote(pool: &CurvePool, amount_in: Decimal, fee_bps: u32) -> Result<CurveQuote> {
        let price_before = Self::spot_price(pool)?;
        let post = Self::post_trade_reserves(pool, amount_in, TradeDirection::Sell)?;

        let output_amount = pool.base_reserves - post.base_reserves;
        let price_impact = Self::relative_move(price_before, Self::spot_price(&post)?)?;

        let fee = output_amount * Self::fee_rate(fee_bps)?;
        Ok(CurveQuote {
            input_amount: amount_in,
            output_amount,
            price_impact,
            fee,
            net_amount: output_amount - fee,
        })
    }

    fn relative_move(price_before: Decimal, price_after: Decimal) -> Result<Decimal> {
        (price_after - price_before)
            .abs()
            .checked_div(price_before)
            .context("Price impact exceeds Decimal range")
    }

    fn fee_rate(fee_bps: u32) -> Result<Decimal> {
        if fee_bps > 10_000 {
            bail!("Fee cannot exceed 10000 basis points");
        }
        Ok(Decimal::from(fee_bps) / dec!(10000))
    }

    fn validate_reserves(pool: &CurvePool) -> Result<()> {
        if pool.base_reserves <= dec!(0) || pool.supply_reserves <= dec!(0) {
            bail!("Reserves must be positive");
        }
        Ok(())
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn constant_product_holds_for_buys(
            base in 1_000u64..1_000_000_000,
            supply in 1_000u64..1_000_000_000,
            amount in 1u64..1_000_000,
        ) {
            let pool = CurvePool {
                base_reserves: Decimal::from(base),
                supply_reserves: Decimal::from(supply),
            };
            let k_before = CurveMath::constant_product(&pool).unwrap();
            let post =
                CurveMath::post_trade_reserves(&pool, Decimal::from(amount), TradeDirection::Buy)
                    .unwrap();
            let k_after = CurveMath::constant_product(&post).unwrap();

            let drift = (k_after - k_before).abs() / k_before;
            prop_assert!(drift < dec!(0.000000000000001));
        }

        #[test]
        fn buy_output_stays_within_reserves(
            base in 1_000u64..1_000_000_000,
            supply in 1_000u64..1_000_000_000,
            amount in 1u64..1_000_000,
        ) {
            let pool = CurvePool {
                base_reserves: Decimal::from(base),
                supply_reserves: Decimal::from(supply),
            };
            let quote = CurveMath::buy_quote(&pool, Decimal::from(amount), 30).unwrap();

            prop_assert!(quote.output_amount > dec!(0));
            prop_assert!(quote.output_amount < pool.supply_reserves);
        }

        #[test]
        fn larger_trades_move_price_more(
            base in 1_000u64..1_000_000_000,
            supply in 1_000u64..1_000_000_000,
            amount in 1u64..500_000,
        ) {
            let pool = CurvePool {
                base_reserves: Decimal::from(base),
                supply_reserves: Decimal::from(supply),
            };
            let price = CurveMath::spot_price(&pool).unwrap();

            let small =
                CurveMath::price_impact(&pool, price, Decimal::from(amount), TradeDirection::Buy)
                    .unwrap();
            let large = CurveMath::price_impact(
                &pool,
                price,
                Decimal::from(amount) * dec!(2),
                TradeDirection::Buy,
            )
            .unwrap();

            prop_assert!(small >= dec!(0));
            prop_assert!(large > small);
        }
    }
}

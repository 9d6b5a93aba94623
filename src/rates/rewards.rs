//! Reward-incentive speeds → implied annualized rates.
//!
//! A distributor pays `speed` reward tokens per block to a market's
//! suppliers (or borrowers). Relative to the market's total supply, that
//! emission is an implied interest rate:
//!
//! `implied = (speed * reward_price) / (underlying_supply * underlying_price / 1e18)`
//!
//! with both prices in the same base unit so the quote currency cancels.
//! The implied mantissa then goes through the plain conversions in
//! [`super::convert`].

use crate::model::incentive::{IncentiveRates, RewardIncentive};

use super::convert::{self, RateError};

/// The implied per-block rate mantissa for one reward emission.
///
/// Fails fast on a zero or non-finite denominator rather than returning
/// `NaN`/`Infinity`; a market with no supply has no meaningful implied rate.
pub fn implied_mantissa(
    reward_speed: f64,
    reward_price_in_base: f64,
    underlying_total_supply: f64,
    underlying_price_in_base: f64,
) -> Result<f64, RateError> {
    if !reward_speed.is_finite() || reward_speed < 0.0 {
        return Err(RateError::InvalidMantissa {
            mantissa: reward_speed,
        });
    }
    if !reward_price_in_base.is_finite() || reward_price_in_base < 0.0 {
        return Err(RateError::InvalidPrice {
            price: reward_price_in_base,
        });
    }

    let denominator = underlying_total_supply * underlying_price_in_base / 1e18;
    if !denominator.is_finite() || denominator <= 0.0 {
        return Err(RateError::InvalidDenominator {
            supply: underlying_total_supply,
            price: underlying_price_in_base,
        });
    }

    Ok(reward_speed * reward_price_in_base / denominator)
}

/// Annualize one incentive's supply and borrow emissions against a market.
pub fn incentive_rates(
    incentive: &RewardIncentive,
    reward_price_in_base: f64,
    underlying_total_supply: f64,
    underlying_price_in_base: f64,
) -> Result<IncentiveRates, RateError> {
    let supply_mantissa = implied_mantissa(
        incentive.supply_speed,
        reward_price_in_base,
        underlying_total_supply,
        underlying_price_in_base,
    )?;
    let borrow_mantissa = implied_mantissa(
        incentive.borrow_speed,
        reward_price_in_base,
        underlying_total_supply,
        underlying_price_in_base,
    )?;

    Ok(IncentiveRates {
        incentive: incentive.clone(),
        supply_apr: convert::block_rate_to_apr(supply_mantissa)?,
        supply_apy: convert::block_rate_to_apy(supply_mantissa)?,
        borrow_apr: convert::block_rate_to_apr(borrow_mantissa)?,
        borrow_apy: convert::block_rate_to_apy(borrow_mantissa)?,
    })
}

/// Combined supply APR across simultaneous incentives on one market.
///
/// This is the plain sum of the individual APRs, an additive
/// approximation. Independently compounding emissions don't truly combine
/// this way, but it is how the figure is quoted.
pub fn total_supply_apr(rates: &[IncentiveRates]) -> f64 {
    rates.iter().map(|r| r.supply_apr).sum()
}

/// Combined borrow APR across simultaneous incentives on one market.
/// Same additive approximation as [`total_supply_apr`].
pub fn total_borrow_apr(rates: &[IncentiveRates]) -> f64 {
    rates.iter().map(|r| r.borrow_apr).sum()
}

#[cfg(test)]
mod tests {
    use alloy::primitives::Address;

    use super::*;

    fn incentive(supply_speed: f64, borrow_speed: f64) -> RewardIncentive {
        RewardIncentive {
            distributor: Address::ZERO,
            reward_token: Address::ZERO,
            reward_symbol: "RWD".into(),
            supply_speed,
            borrow_speed,
        }
    }

    #[test]
    fn implied_mantissa_cancels_the_base_unit() {
        // speed 1e18/block, both prices equal, supply 1000e18:
        // (1e18 * p) / (1000e18 * p / 1e18) = 1e15.
        let m = implied_mantissa(1e18, 2.0e17, 1000.0e18, 2.0e17).unwrap();
        assert!((m - 1e15).abs() / 1e15 < 1e-12, "m = {m}");
    }

    #[test]
    fn zero_speed_is_zero_rate() {
        let m = implied_mantissa(0.0, 1e18, 1000.0e18, 1e18).unwrap();
        assert_eq!(m, 0.0);
    }

    #[test]
    fn empty_market_fails_fast() {
        let err = implied_mantissa(1e18, 1e18, 0.0, 1e18).unwrap_err();
        assert!(matches!(err, RateError::InvalidDenominator { .. }));

        // Unpriced underlying is just as fatal.
        let err = implied_mantissa(1e18, 1e18, 1000.0e18, 0.0).unwrap_err();
        assert!(matches!(err, RateError::InvalidDenominator { .. }));
    }

    #[test]
    fn negative_inputs_are_rejected() {
        assert!(implied_mantissa(-1.0, 1e18, 1000.0e18, 1e18).is_err());
        assert!(implied_mantissa(1e18, -1.0, 1000.0e18, 1e18).is_err());
    }

    #[test]
    fn incentive_rates_apy_dominates_apr() {
        let rates = incentive_rates(&incentive(1e16, 5e15), 1e18, 1_000_000.0e18, 1e18).unwrap();
        assert!(rates.supply_apr > 0.0);
        assert!(rates.supply_apy >= rates.supply_apr);
        assert!(rates.borrow_apy >= rates.borrow_apr);
        assert!(rates.supply_apr > rates.borrow_apr);
    }

    #[test]
    fn total_apr_is_the_plain_sum() {
        let mut a = incentive_rates(&incentive(0.0, 0.0), 1e18, 1000.0e18, 1e18).unwrap();
        let mut b = a.clone();
        a.supply_apr = 2.5;
        b.supply_apr = 1.5;
        let total = total_supply_apr(&[a, b]);
        assert!((total - 4.0).abs() < 1e-12, "total = {total}");
    }
}

//! Fixed-point rate mantissas → human-facing annualized percentages.
//!
//! Contracts report rates as 1e18-scaled per-period fractions (per block or
//! per second). These helpers annualize them; everything else in the crate
//! renders the numbers they return.

use thiserror::Error;

/// Mainnet block cadence the protocol UIs quote rates with.
pub const BLOCKS_PER_DAY: u32 = 6594;
pub const DAYS_PER_YEAR: u32 = 365;
pub const BLOCKS_PER_YEAR: u32 = BLOCKS_PER_DAY * DAYS_PER_YEAR;
pub const SECONDS_PER_YEAR: u32 = 31_536_000;

/// Cap on the compounding exponent `periods * ln(1 + rate)`.
///
/// f64 `exp` overflows to infinity just above 709; capping at 700 keeps the
/// result finite (~1e304) for any nonsense input instead of rendering `inf`.
pub const MAX_COMPOUND_EXPONENT: f64 = 700.0;

#[derive(Debug, Error, PartialEq)]
pub enum RateError {
    #[error("rate mantissa must be non-negative and finite, got {mantissa}")]
    InvalidMantissa { mantissa: f64 },

    #[error("price must be non-negative and finite, got {price}")]
    InvalidPrice { price: f64 },

    #[error(
        "implied-rate denominator must be positive and finite \
         (underlying supply {supply}, underlying price {price})"
    )]
    InvalidDenominator { supply: f64, price: f64 },
}

fn check_mantissa(mantissa: f64) -> Result<(), RateError> {
    if !mantissa.is_finite() || mantissa < 0.0 {
        return Err(RateError::InvalidMantissa { mantissa });
    }
    Ok(())
}

/// Simple (non-compounded) annual rate in percent:
/// `(mantissa / 1e18) * periods_per_year * 100`.
pub fn to_apr(mantissa: f64, periods_per_year: u32) -> Result<f64, RateError> {
    check_mantissa(mantissa)?;
    Ok(mantissa / 1e18 * periods_per_year as f64 * 100.0)
}

/// Compounded annual rate in percent:
/// `((1 + mantissa / 1e18)^periods_per_year - 1) * 100`.
///
/// Computed in log space; the exponent is capped at
/// [`MAX_COMPOUND_EXPONENT`] so absurd period counts stay finite.
pub fn to_apy(mantissa: f64, periods_per_year: u32) -> Result<f64, RateError> {
    check_mantissa(mantissa)?;
    if periods_per_year == 0 {
        return Ok(0.0);
    }

    let rate = mantissa / 1e18;
    let exponent = (periods_per_year as f64 * rate.ln_1p()).min(MAX_COMPOUND_EXPONENT);
    Ok((exponent.exp() - 1.0) * 100.0)
}

/// Per-block mantissa → per-day mantissa. The protocol quotes per-block
/// rates as compounding once per day over a 365-day year.
pub fn per_block_to_daily(mantissa: f64) -> f64 {
    mantissa * BLOCKS_PER_DAY as f64
}

/// APR for a per-block rate mantissa, quoted the way the pool UIs do.
pub fn block_rate_to_apr(mantissa: f64) -> Result<f64, RateError> {
    to_apr(per_block_to_daily(mantissa), DAYS_PER_YEAR)
}

/// APY for a per-block rate mantissa (daily compounding over 365 days).
pub fn block_rate_to_apy(mantissa: f64) -> Result<f64, RateError> {
    to_apy(per_block_to_daily(mantissa), DAYS_PER_YEAR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_mantissa_is_zero_percent() {
        assert_eq!(to_apr(0.0, 365).unwrap(), 0.0);
        assert_eq!(to_apy(0.0, 365).unwrap(), 0.0);
    }

    #[test]
    fn zero_periods_is_zero_percent() {
        assert_eq!(to_apr(1e14, 0).unwrap(), 0.0);
        assert_eq!(to_apy(1e14, 0).unwrap(), 0.0);
    }

    #[test]
    fn known_daily_rate_annualizes() {
        // 0.01% per period over 365 periods.
        let apr = to_apr(1e14, 365).unwrap();
        let apy = to_apy(1e14, 365).unwrap();
        assert!((apr - 3.65).abs() < 1e-3, "apr = {apr}");
        assert!((apy - 3.7172).abs() < 1e-3, "apy = {apy}");
    }

    #[test]
    fn compounding_never_loses_to_simple_interest() {
        let mantissas = [0.0, 1e10, 1e14, 5e15, 1e17, 1e18];
        let periods = [1, 12, 365, BLOCKS_PER_YEAR, SECONDS_PER_YEAR];
        for &m in &mantissas {
            for &n in &periods {
                let apr = to_apr(m, n).unwrap();
                let apy = to_apy(m, n).unwrap();
                assert!(
                    apy >= apr - 1e-9,
                    "apy {apy} < apr {apr} for mantissa {m}, periods {n}"
                );
            }
        }
    }

    #[test]
    fn negative_mantissa_is_rejected() {
        assert!(matches!(
            to_apr(-1.0, 365),
            Err(RateError::InvalidMantissa { .. })
        ));
        assert!(matches!(
            to_apy(-1.0, 365),
            Err(RateError::InvalidMantissa { .. })
        ));
    }

    #[test]
    fn non_finite_mantissa_is_rejected() {
        assert!(to_apy(f64::NAN, 365).is_err());
        assert!(to_apy(f64::INFINITY, 365).is_err());
    }

    #[test]
    fn huge_period_counts_stay_finite() {
        // A full 100%-per-second rate over a year of seconds would overflow
        // a naive powi; the clamp keeps it finite.
        let apy = to_apy(1e18, SECONDS_PER_YEAR).unwrap();
        assert!(apy.is_finite());
        let apr = to_apr(1e18, SECONDS_PER_YEAR).unwrap();
        assert!(apy >= apr);
    }

    #[test]
    fn block_rate_helpers_agree_with_plain_conversions() {
        let per_block = 1.2e10;
        let daily = per_block_to_daily(per_block);
        assert_eq!(
            block_rate_to_apr(per_block).unwrap(),
            to_apr(daily, DAYS_PER_YEAR).unwrap()
        );
        assert_eq!(
            block_rate_to_apy(per_block).unwrap(),
            to_apy(daily, DAYS_PER_YEAR).unwrap()
        );
    }
}

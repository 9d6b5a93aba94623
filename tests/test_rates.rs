use alloy::primitives::Address;

use lend_desk::model::incentive::RewardIncentive;
use lend_desk::rates;

fn incentive(supply_speed: f64, borrow_speed: f64) -> RewardIncentive {
    RewardIncentive {
        distributor: Address::ZERO,
        reward_token: Address::ZERO,
        reward_symbol: "RWD".into(),
        supply_speed,
        borrow_speed,
    }
}

// ── Conversion scenarios ─────────────────────────────────────────────

#[test]
fn daily_compounding_scenario() {
    // 0.01% per day for a year: 3.65% simple, ~3.7166% compounded.
    let apr = rates::to_apr(1e14, 365).unwrap();
    let apy = rates::to_apy(1e14, 365).unwrap();
    assert!((apr - 3.65).abs() < 1e-3);
    assert!((apy - 3.7172).abs() < 1e-3);
    assert!(apy >= apr);
}

#[test]
fn per_block_quotes_match_protocol_ui_scaling() {
    // A per-block rate annualizes through blocks/day * days/year.
    let per_block = 2e10;
    let apr = rates::block_rate_to_apr(per_block).unwrap();
    let expected = per_block / 1e18 * rates::BLOCKS_PER_YEAR as f64 * 100.0;
    assert!((apr - expected).abs() < 1e-9);
}

#[test]
fn seconds_per_year_rates_stay_finite() {
    let apy = rates::to_apy(5e8, rates::SECONDS_PER_YEAR).unwrap();
    assert!(apy.is_finite());
    // ~1.59% APY for a 5e8 per-second mantissa.
    assert!(apy > 1.0 && apy < 2.0, "apy = {apy}");
}

// ── Reward aggregation scenarios ─────────────────────────────────────

#[test]
fn reward_pipeline_produces_sane_rates() {
    // 0.05 RWD/block at $2 into a $10M market: ~$0.10/block on $10M.
    let inc = incentive(0.05e18, 0.0);
    let rates = rates::incentive_rates(&inc, 2.0e18, 10_000_000.0e18, 1.0e18).unwrap();

    let implied = rates::implied_mantissa(0.05e18, 2.0e18, 10_000_000.0e18, 1.0e18).unwrap();
    let expected_apr = rates::block_rate_to_apr(implied).unwrap();
    assert!((rates.supply_apr - expected_apr).abs() < 1e-9);
    assert!(rates.supply_apy >= rates.supply_apr);
    assert_eq!(rates.borrow_apr, 0.0);
}

#[test]
fn combined_apr_is_additive() {
    let base = rates::incentive_rates(&incentive(0.0, 0.0), 1e18, 1000.0e18, 1e18).unwrap();
    let mut a = base.clone();
    let mut b = base;
    a.supply_apr = 2.5;
    b.supply_apr = 1.5;

    // The combined figure is the plain sum, not a compounded blend.
    assert_eq!(rates::total_supply_apr(&[a, b]), 4.0);
}

#[test]
fn unpriced_market_fails_instead_of_quoting_zero() {
    let inc = incentive(0.05e18, 0.0);
    let err = rates::incentive_rates(&inc, 2.0e18, 10_000_000.0e18, 0.0).unwrap_err();
    assert!(err.to_string().contains("denominator"));
}

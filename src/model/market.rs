use alloy::primitives::Address;
use serde::Serialize;

/// A pool as listed in the directory.
#[derive(Debug, Clone, Serialize)]
pub struct PoolEntry {
    /// Index in the directory (stable; used as the pool id everywhere).
    pub index: u64,
    pub name: String,
    pub comptroller: Address,
    pub creator: Address,
}

/// Read-only snapshot of one market inside a pool.
///
/// Rate and factor fields carry the raw 1e18-scaled mantissas exactly as the
/// contracts return them; conversion to percentages happens at render time.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub ctoken: Address,
    pub underlying: Address,
    pub symbol: String,
    pub decimals: u8,

    /// Per-block supply rate mantissa.
    pub supply_rate_per_block: f64,
    /// Per-block borrow rate mantissa.
    pub borrow_rate_per_block: f64,
    /// Total supply in raw underlying units:
    /// `cTokenTotalSupply * exchangeRate / 1e18`.
    pub underlying_total_supply: f64,
    /// Collateral factor mantissa (1e18 = 100% LTV).
    pub collateral_factor: f64,

    /// Caller's supply balance in raw underlying units.
    pub supply_balance: f64,
    /// Caller's borrow balance in raw underlying units.
    pub borrow_balance: f64,
    /// Whether the caller has this market enabled as collateral.
    pub membership: bool,
}

impl MarketSnapshot {
    /// Loan-to-value in percent (collateral factor is an 1e18 mantissa).
    pub fn ltv_percent(&self) -> f64 {
        self.collateral_factor / 1e16
    }

    /// Scale a raw underlying amount down to whole units.
    pub fn to_whole_units(&self, raw: f64) -> f64 {
        raw / 10f64.powi(self.decimals as i32)
    }
}

/// A pool entry together with its market snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct PoolSnapshot {
    pub entry: PoolEntry,
    pub markets: Vec<MarketSnapshot>,
}

impl PoolSnapshot {
    pub fn market_for(&self, underlying: Address) -> Option<&MarketSnapshot> {
        self.markets.iter().find(|m| m.underlying == underlying)
    }

    pub fn market_for_symbol(&self, symbol: &str) -> Option<&MarketSnapshot> {
        self.markets
            .iter()
            .find(|m| m.symbol.eq_ignore_ascii_case(symbol))
    }
}

/// Sum of `supply_usd * collateral_factor` over collateral-enabled markets.
///
/// `usd_values` pairs each market with its USD-priced supply and borrow
/// balances (same order as `markets`).
pub fn borrow_limit_usd(markets: &[MarketSnapshot], usd_values: &[(f64, f64)]) -> f64 {
    markets
        .iter()
        .zip(usd_values)
        .filter(|(m, _)| m.membership)
        .map(|(m, (supply_usd, _))| supply_usd * (m.collateral_factor / 1e18))
        .sum()
}

/// Borrow-limit utilization in percent. Zero limit means zero utilization
/// (nothing enabled as collateral), not a division error.
pub fn borrow_utilization_percent(borrow_usd: f64, limit_usd: f64) -> f64 {
    if limit_usd <= 0.0 {
        0.0
    } else {
        borrow_usd / limit_usd * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(membership: bool, collateral_factor: f64) -> MarketSnapshot {
        MarketSnapshot {
            ctoken: Address::ZERO,
            underlying: Address::ZERO,
            symbol: "TST".into(),
            decimals: 18,
            supply_rate_per_block: 0.0,
            borrow_rate_per_block: 0.0,
            underlying_total_supply: 0.0,
            collateral_factor,
            supply_balance: 0.0,
            borrow_balance: 0.0,
            membership,
        }
    }

    #[test]
    fn borrow_limit_counts_only_collateral_markets() {
        let markets = vec![market(true, 0.75e18), market(false, 0.80e18)];
        let usd = vec![(1000.0, 0.0), (500.0, 0.0)];
        // Only the first market counts: 1000 * 0.75.
        assert_eq!(borrow_limit_usd(&markets, &usd), 750.0);
    }

    #[test]
    fn utilization_handles_zero_limit() {
        assert_eq!(borrow_utilization_percent(100.0, 0.0), 0.0);
        assert!((borrow_utilization_percent(300.0, 750.0) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn ltv_percent_from_mantissa() {
        let m = market(true, 0.75e18);
        assert!((m.ltv_percent() - 75.0).abs() < 1e-9);
    }
}

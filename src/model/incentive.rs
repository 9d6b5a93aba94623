use alloy::primitives::Address;
use serde::Serialize;

/// A reward incentive on one market: a distributor paying a secondary token
/// at fixed per-block speeds to suppliers and borrowers.
#[derive(Debug, Clone, Serialize)]
pub struct RewardIncentive {
    pub distributor: Address,
    pub reward_token: Address,
    pub reward_symbol: String,
    /// Per-block emission to suppliers, raw token units.
    pub supply_speed: f64,
    /// Per-block emission to borrowers, raw token units.
    pub borrow_speed: f64,
}

/// An incentive with its implied annualized rates attached.
#[derive(Debug, Clone, Serialize)]
pub struct IncentiveRates {
    pub incentive: RewardIncentive,
    pub supply_apr: f64,
    pub supply_apy: f64,
    pub borrow_apr: f64,
    pub borrow_apy: f64,
}

pub mod chain;
pub mod incentive;
pub mod market;
pub mod tranche;

pub use chain::Chain;
pub use incentive::{IncentiveRates, RewardIncentive};
pub use market::{MarketSnapshot, PoolEntry, PoolSnapshot};
pub use tranche::TrancheRating;

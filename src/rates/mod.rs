pub mod convert;
pub mod rewards;

pub use convert::{
    BLOCKS_PER_DAY, BLOCKS_PER_YEAR, DAYS_PER_YEAR, MAX_COMPOUND_EXPONENT, RateError,
    SECONDS_PER_YEAR, block_rate_to_apr, block_rate_to_apy, per_block_to_daily, to_apr, to_apy,
};
pub use rewards::{implied_mantissa, incentive_rates, total_borrow_apr, total_supply_apr};

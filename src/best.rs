//! `best <token>`: pick the pool an asset is best supplied to.
//!
//! A pool where the account already has supply wins outright (no reason to
//! split a position); otherwise the highest supply rate per block wins.

use anyhow::{Context, Result, bail};

use crate::config::Config;
use crate::evm;
use crate::fetch::{self, directory};
use crate::model::{MarketSnapshot, PoolSnapshot};
use crate::rates;
use crate::session;
use crate::view;

pub fn run(config: &Config, token: &str) -> Result<()> {
    let underlying = evm::resolve_token(token)
        .with_context(|| format!("unknown token '{token}' (symbol or 0x address)"))?;
    let rpc_url = config.rpc_url()?.to_string();
    let account = session::resolve_address(None).ok();

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        let entries = directory::pool_entries(&rpc_url, config.pool_directory.parse()?).await?;
        let snapshots = fetch::all_pool_snapshots(&rpc_url, &entries, account).await?;

        let candidates: Vec<&PoolSnapshot> = snapshots
            .iter()
            .filter(|s| s.market_for(underlying).is_some())
            .collect();
        if candidates.is_empty() {
            bail!("no pool lists {token}");
        }

        let best = pick_best(&candidates, underlying)
            .context("no candidate pool survived selection")?;
        let market = best.market_for(underlying).context("market lookup")?;

        println!(
            "Best pool for {}: pool {} ({})",
            market.symbol, best.entry.index, best.entry.name
        );
        println!(
            "  supply APY {} (APR {}), borrow APY {}, LTV {:.0}%",
            view::percent(rates::block_rate_to_apy(market.supply_rate_per_block)?),
            view::percent(rates::block_rate_to_apr(market.supply_rate_per_block)?),
            view::percent(rates::block_rate_to_apy(market.borrow_rate_per_block)?),
            market.ltv_percent(),
        );
        if market.supply_balance > 0.0 {
            println!(
                "  (you already supply {:.4} {} here)",
                market.to_whole_units(market.supply_balance),
                market.symbol
            );
        }
        Ok(())
    })
}

/// Selection rule, split out so it's testable without a chain.
pub fn pick_best<'a>(
    candidates: &[&'a PoolSnapshot],
    underlying: alloy::primitives::Address,
) -> Option<&'a PoolSnapshot> {
    let mut best: Option<(&PoolSnapshot, &MarketSnapshot)> = None;

    for snap in candidates {
        let market = snap.market_for(underlying)?;

        // An existing supply position short-circuits the comparison.
        if market.supply_balance > 0.0 {
            return Some(*snap);
        }

        match &best {
            Some((_, current)) if market.supply_rate_per_block <= current.supply_rate_per_block => {}
            _ => best = Some((*snap, market)),
        }
    }

    best.map(|(snap, _)| snap)
}

#[cfg(test)]
mod tests {
    use alloy::primitives::Address;

    use crate::model::market::{MarketSnapshot, PoolEntry, PoolSnapshot};

    use super::pick_best;

    fn pool(index: u64, rate: f64, supply_balance: f64, underlying: Address) -> PoolSnapshot {
        PoolSnapshot {
            entry: PoolEntry {
                index,
                name: format!("pool-{index}"),
                comptroller: Address::ZERO,
                creator: Address::ZERO,
            },
            markets: vec![MarketSnapshot {
                ctoken: Address::ZERO,
                underlying,
                symbol: "TST".into(),
                decimals: 18,
                supply_rate_per_block: rate,
                borrow_rate_per_block: 0.0,
                underlying_total_supply: 0.0,
                collateral_factor: 0.0,
                supply_balance,
                borrow_balance: 0.0,
                membership: false,
            }],
        }
    }

    #[test]
    fn highest_rate_wins_without_positions() {
        let underlying = Address::ZERO;
        let a = pool(0, 1e10, 0.0, underlying);
        let b = pool(1, 3e10, 0.0, underlying);
        let c = pool(2, 2e10, 0.0, underlying);
        let best = pick_best(&[&a, &b, &c], underlying).unwrap();
        assert_eq!(best.entry.index, 1);
    }

    #[test]
    fn existing_position_beats_better_rate() {
        let underlying = Address::ZERO;
        let a = pool(0, 1e10, 500.0, underlying);
        let b = pool(1, 3e10, 0.0, underlying);
        let best = pick_best(&[&a, &b], underlying).unwrap();
        assert_eq!(best.entry.index, 0);
    }

    #[test]
    fn empty_candidates_yield_none() {
        assert!(pick_best(&[], Address::ZERO).is_none());
    }
}

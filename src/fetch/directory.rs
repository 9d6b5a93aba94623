use std::collections::HashMap;

use alloy::primitives::Address;
use anyhow::{Context, Result};

use crate::evm;
use crate::model::incentive::RewardIncentive;
use crate::model::market::{MarketSnapshot, PoolEntry, PoolSnapshot};

use super::abi::{IComptroller, ICToken, IPoolDirectory, IRewardsDistributor};

/// ETH markets have no `underlying()`; the zero address stands in for ETH
/// everywhere downstream (oracles price it directly).
pub const ETH_PSEUDO_ADDRESS: Address = Address::ZERO;

/// All pools registered in the directory.
pub async fn pool_entries(rpc_url: &str, directory: Address) -> Result<Vec<PoolEntry>> {
    let provider = evm::read_provider(rpc_url)?;
    let dir = IPoolDirectory::new(directory, &provider);
    let listing = dir
        .getPublicPools()
        .call()
        .await
        .context("directory.getPublicPools")?;

    let entries = listing
        .indexes
        .iter()
        .zip(listing.pools.iter())
        .map(|(index, pool)| PoolEntry {
            index: index.to::<u64>(),
            name: pool.name.clone(),
            comptroller: pool.comptroller,
            creator: pool.creator,
        })
        .collect();
    Ok(entries)
}

pub async fn pool_entry(rpc_url: &str, directory: Address, id: u64) -> Result<PoolEntry> {
    let entries = pool_entries(rpc_url, directory).await?;
    entries
        .into_iter()
        .find(|e| e.index == id)
        .with_context(|| format!("pool {id} not found in directory {directory}"))
}

/// Snapshot one pool's markets. With an account, user balances and
/// collateral membership are filled in; without, they stay zero.
pub async fn pool_snapshot(
    rpc_url: &str,
    entry: &PoolEntry,
    account: Option<Address>,
) -> Result<PoolSnapshot> {
    let provider = evm::read_provider(rpc_url)?;
    let comptroller = IComptroller::new(entry.comptroller, &provider);
    let ctokens = comptroller
        .getAllMarkets()
        .call()
        .await
        .with_context(|| format!("getAllMarkets on pool {}", entry.index))?;

    let mut markets = Vec::with_capacity(ctokens.len());
    for ctoken_addr in ctokens {
        let ctoken = ICToken::new(ctoken_addr, &provider);

        // ETH markets revert on underlying().
        let (underlying, symbol, decimals) = match ctoken.underlying().call().await {
            Ok(underlying) => {
                let erc20 = evm::IERC20::new(underlying, &provider);
                let symbol = erc20
                    .symbol()
                    .call()
                    .await
                    .unwrap_or_else(|_| evm::short_addr(&underlying));
                let decimals = erc20.decimals().call().await.unwrap_or(18);
                (underlying, symbol, decimals)
            }
            Err(_) => (ETH_PSEUDO_ADDRESS, "ETH".to_string(), 18u8),
        };

        let supply_rate = ctoken
            .supplyRatePerBlock()
            .call()
            .await
            .context("supplyRatePerBlock")?;
        let borrow_rate = ctoken
            .borrowRatePerBlock()
            .call()
            .await
            .context("borrowRatePerBlock")?;
        let total_supply = ctoken.totalSupply().call().await.context("totalSupply")?;
        let exchange_rate = ctoken
            .exchangeRateStored()
            .call()
            .await
            .context("exchangeRateStored")?;

        let exchange_rate = evm::u256_to_f64(exchange_rate);
        let underlying_total_supply = evm::u256_to_f64(total_supply) * exchange_rate / 1e18;

        let listing = comptroller
            .markets(ctoken_addr)
            .call()
            .await
            .context("comptroller.markets")?;

        let (supply_balance, borrow_balance, membership) = match account {
            Some(user) => {
                let ctoken_balance = ctoken
                    .balanceOf(user)
                    .call()
                    .await
                    .context("cToken.balanceOf")?;
                let borrow_balance = ctoken
                    .borrowBalanceStored(user)
                    .call()
                    .await
                    .context("borrowBalanceStored")?;
                let membership = comptroller
                    .checkMembership(user, ctoken_addr)
                    .call()
                    .await
                    .context("checkMembership")?;
                (
                    evm::u256_to_f64(ctoken_balance) * exchange_rate / 1e18,
                    evm::u256_to_f64(borrow_balance),
                    membership,
                )
            }
            None => (0.0, 0.0, false),
        };

        markets.push(MarketSnapshot {
            ctoken: ctoken_addr,
            underlying,
            symbol,
            decimals,
            supply_rate_per_block: evm::u256_to_f64(supply_rate),
            borrow_rate_per_block: evm::u256_to_f64(borrow_rate),
            underlying_total_supply,
            collateral_factor: evm::u256_to_f64(listing.collateralFactorMantissa),
            supply_balance,
            borrow_balance,
            membership,
        });
    }

    Ok(PoolSnapshot {
        entry: entry.clone(),
        markets,
    })
}

/// The pool's own price oracle, as named by its comptroller.
pub async fn pool_oracle(rpc_url: &str, comptroller: Address) -> Result<Address> {
    let provider = evm::read_provider(rpc_url)?;
    IComptroller::new(comptroller, &provider)
        .oracle()
        .call()
        .await
        .context("comptroller.oracle")
}

/// Reward incentives per market, from the pool's rewards distributors.
/// Markets with zero speeds on a distributor are omitted for it.
pub async fn pool_incentives(
    rpc_url: &str,
    comptroller: Address,
    markets: &[MarketSnapshot],
) -> Result<HashMap<Address, Vec<RewardIncentive>>> {
    let provider = evm::read_provider(rpc_url)?;
    let comptroller = IComptroller::new(comptroller, &provider);

    // Older pools predate distributors; treat a revert as "none".
    let distributors = comptroller
        .getRewardsDistributors()
        .call()
        .await
        .unwrap_or_default();

    let mut incentives: HashMap<Address, Vec<RewardIncentive>> = HashMap::new();
    for distributor_addr in distributors {
        let distributor = IRewardsDistributor::new(distributor_addr, &provider);
        let reward_token = distributor
            .rewardToken()
            .call()
            .await
            .context("distributor.rewardToken")?;
        let reward_symbol = evm::IERC20::new(reward_token, &provider)
            .symbol()
            .call()
            .await
            .unwrap_or_else(|_| evm::short_addr(&reward_token));

        for market in markets {
            let supply_speed = distributor
                .compSupplySpeeds(market.ctoken)
                .call()
                .await
                .context("compSupplySpeeds")?;
            let borrow_speed = distributor
                .compBorrowSpeeds(market.ctoken)
                .call()
                .await
                .context("compBorrowSpeeds")?;

            if supply_speed.is_zero() && borrow_speed.is_zero() {
                continue;
            }

            incentives
                .entry(market.ctoken)
                .or_default()
                .push(RewardIncentive {
                    distributor: distributor_addr,
                    reward_token,
                    reward_symbol: reward_symbol.clone(),
                    supply_speed: evm::u256_to_f64(supply_speed),
                    borrow_speed: evm::u256_to_f64(borrow_speed),
                });
        }
    }

    Ok(incentives)
}

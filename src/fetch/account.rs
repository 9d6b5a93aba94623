use alloy::primitives::Address;
use anyhow::{Context, Result};

use crate::evm;
use crate::model::tranche::TrancheRating;
use crate::rates;

use super::abi::{IFundManager, ITranchePool};

/// Yield-aggregator fund position: USD balance plus the fund's current
/// annualized rates.
#[derive(Debug, Clone)]
pub struct VaultSnapshot {
    /// Account balance in USD (the fund accounts in 1e18-scaled USD).
    pub balance_usd: f64,
    pub apr: f64,
    pub apy: f64,
}

pub async fn vault_snapshot(
    rpc_url: &str,
    fund_manager: Address,
    account: Address,
) -> Result<VaultSnapshot> {
    let provider = evm::read_provider(rpc_url)?;
    let fund = IFundManager::new(fund_manager, &provider);

    let balance = fund
        .balanceOf(account)
        .call()
        .await
        .context("fund.balanceOf")?;
    let rate = fund
        .yieldRatePerSecond()
        .call()
        .await
        .context("fund.yieldRatePerSecond")?;

    let rate = evm::u256_to_f64(rate);
    Ok(VaultSnapshot {
        balance_usd: evm::from_token_units(balance, 18),
        apr: rates::to_apr(rate, rates::SECONDS_PER_YEAR)?,
        apy: rates::to_apy(rate, rates::SECONDS_PER_YEAR)?,
    })
}

/// Per-tranche balances in whole underlying units, plus the pool's epoch
/// and SFI staking ratio.
#[derive(Debug, Clone)]
pub struct TrancheSnapshot {
    pub epoch: u64,
    /// Underlying units of SFI-free deposit per 1 staked SFI (A tranche).
    pub sfi_ratio: f64,
    pub balances: Vec<(TrancheRating, f64)>,
}

pub async fn tranche_snapshot(
    rpc_url: &str,
    tranche_pool: Address,
    account: Address,
) -> Result<TrancheSnapshot> {
    let provider = evm::read_provider(rpc_url)?;
    let pool = ITranchePool::new(tranche_pool, &provider);

    let epoch = pool
        .current_epoch()
        .call()
        .await
        .context("tranche.current_epoch")?;
    let sfi_ratio = pool.SFI_ratio().call().await.context("tranche.SFI_ratio")?;

    let mut balances = Vec::new();
    for rating in TrancheRating::ALL {
        let raw = pool
            .balanceOf(account, rating.index())
            .call()
            .await
            .with_context(|| format!("tranche balance for {rating}"))?;
        balances.push((rating, evm::from_token_units(raw, 18)));
    }

    Ok(TrancheSnapshot {
        epoch: epoch.to::<u64>(),
        sfi_ratio: evm::from_token_units(sfi_ratio, 18),
        balances,
    })
}

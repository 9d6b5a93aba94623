//! Transaction pass-throughs. Nothing here owns protocol logic: every
//! function resolves addresses, preflights with view calls, then hands the
//! transaction to the contracts.

pub mod lending;
pub mod pool_create;
pub mod tranche;
pub mod vault;

use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use anyhow::{Context, Result};

use crate::evm;

/// Approve `spender` for `amount` of `token`, skipping the transaction when
/// the current allowance already covers it.
pub(crate) async fn approve_if_needed<P: Provider + Clone>(
    provider: &P,
    owner: Address,
    token: Address,
    spender: Address,
    amount: U256,
    label: &str,
) -> Result<()> {
    let erc20 = evm::IERC20::new(token, provider);

    let allowance = erc20
        .allowance(owner, spender)
        .call()
        .await
        .context("ERC20 allowance")?;
    if allowance >= amount {
        return Ok(());
    }

    let pending = erc20
        .approve(spender, amount)
        .send()
        .await
        .with_context(|| format!("{label}: approve failed"))?;
    let receipt = pending
        .get_receipt()
        .await
        .with_context(|| format!("{label}: approve receipt"))?;
    evm::require_success(&receipt, "approve")?;
    println!("  {label}: approve tx: {:?}", receipt.transaction_hash);
    Ok(())
}

/// Check the wallet holds at least `amount` of `token`.
pub(crate) async fn require_balance<P: Provider + Clone>(
    provider: &P,
    wallet: Address,
    token: Address,
    amount: U256,
    symbol: &str,
) -> Result<()> {
    let balance = evm::IERC20::new(token, provider)
        .balanceOf(wallet)
        .call()
        .await
        .context("ERC20 balanceOf")?;
    if balance < amount {
        anyhow::bail!(
            "insufficient {symbol}: have {}, need {}",
            balance,
            amount
        );
    }
    Ok(())
}

/// Compound-style calls return an error code instead of reverting; zero is
/// success. Preflight simulations check this before any gas is spent.
pub(crate) fn require_code_zero(code: U256, label: &str) -> Result<()> {
    if !code.is_zero() {
        anyhow::bail!("{label} preflight returned protocol error code {code}");
    }
    Ok(())
}

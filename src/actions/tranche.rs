use alloy::primitives::Address;
use anyhow::{Context, Result, bail};

use crate::cli::TrancheAction;
use crate::config::Config;
use crate::evm;
use crate::fetch::abi::ITranchePool;
use crate::fetch::account;
use crate::model::tranche::TrancheRating;
use crate::session::{self, WalletSession};

pub fn run(config: &Config, action: TrancheAction) -> Result<()> {
    match action {
        TrancheAction::Deposit {
            tranche,
            amount,
            dry_run,
        } => deposit(config, &tranche, amount, dry_run),
        TrancheAction::Balance { address } => balance(config, address),
    }
}

fn balance(config: &Config, address: Option<Address>) -> Result<()> {
    let account_addr = session::resolve_address(address)?;
    let rpc_url = config.rpc_url()?.to_string();
    let pool: Address = config
        .tranche_pool
        .parse()
        .context("parsing tranche_pool address")?;

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        let snap = account::tranche_snapshot(&rpc_url, pool, account_addr).await?;
        println!("Tranche balances (epoch {}):", snap.epoch);
        for (rating, balance) in &snap.balances {
            println!("  {rating:<3} {balance:.4}");
        }
        Ok(())
    })
}

fn deposit(config: &Config, tranche: &str, amount: f64, dry_run: bool) -> Result<()> {
    let rating = TrancheRating::parse(tranche)?;
    if amount <= 0.0 {
        bail!("amount must be positive, got {amount}");
    }

    let rpc_url = config.rpc_url()?.to_string();
    let session = WalletSession::connect_from_env(rpc_url.as_str(), dry_run)?;
    let pool_addr: Address = config
        .tranche_pool
        .parse()
        .context("parsing tranche_pool address")?;

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let (wallet, key) = session.require_active()?;

        let rp = evm::read_provider(&rpc_url)?;
        let pool = ITranchePool::new(pool_addr, &rp);

        let base_asset = pool.base_asset().call().await.context("tranche.base_asset")?;
        let epoch = pool
            .current_epoch()
            .call()
            .await
            .context("tranche.current_epoch")?;
        let decimals = evm::IERC20::new(base_asset, &rp)
            .decimals()
            .call()
            .await
            .unwrap_or(18);
        let units = evm::to_token_units(amount, decimals);

        println!(
            "  TRANCHE DEPOSIT: {amount} into tranche {rating} (epoch {})",
            epoch.to::<u64>()
        );

        super::require_balance(&rp, wallet, base_asset, units, "base asset").await?;

        // The A tranche stakes SFI alongside the deposit at the pool's ratio.
        let sfi_units = if rating.requires_sfi_staking() {
            let ratio = pool.SFI_ratio().call().await.context("tranche.SFI_ratio")?;
            let ratio = evm::from_token_units(ratio, 18);
            if ratio <= 0.0 {
                bail!("tranche pool reports a zero SFI ratio");
            }
            let sfi_token =
                evm::token_address("SFI").context("SFI missing from token registry")?;
            let sfi_needed = amount / ratio;
            let sfi_units = evm::to_token_units(sfi_needed, 18);
            super::require_balance(&rp, wallet, sfi_token, sfi_units, "SFI").await?;
            println!("  TRANCHE: staking {sfi_needed:.4} SFI alongside the deposit");
            Some((sfi_token, sfi_units))
        } else {
            None
        };

        if session.dry_run {
            println!("  TRANCHE: preflight OK");
            println!("  TRANCHE: [DRY RUN] would approve + add_liquidity");
            return Ok(());
        }

        let provider = evm::make_provider(key, &rpc_url)?;

        super::approve_if_needed(&provider, wallet, base_asset, pool_addr, units, "TRANCHE")
            .await?;
        if let Some((sfi_token, sfi_units)) = sfi_units {
            super::approve_if_needed(&provider, wallet, sfi_token, pool_addr, sfi_units, "TRANCHE")
                .await?;
        }

        let pool = ITranchePool::new(pool_addr, &provider);
        let pending = pool
            .add_liquidity(units, rating.index())
            .send()
            .await
            .context("add_liquidity failed")?;
        let receipt = pending.get_receipt().await.context("add_liquidity receipt")?;
        evm::require_success(&receipt, "add_liquidity")?;
        println!("  TRANCHE: deposit tx: {:?}", receipt.transaction_hash);
        Ok(())
    })
}

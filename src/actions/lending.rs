use alloy::primitives::Address;
use alloy::sol;
use anyhow::{Context, Result, bail};

use crate::config::Config;
use crate::evm;
use crate::fetch::abi::{IComptroller, ICToken, IRewardsDistributor};
use crate::fetch::directory::{self, ETH_PSEUDO_ADDRESS};
use crate::model::market::MarketSnapshot;
use crate::session::WalletSession;

// cETH-style markets take value instead of an ERC20 transfer.
sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract ICEther {
        function mint() external payable;
        function repayBorrow() external payable;
    }
}

/// Everything a lending transaction needs about its target market.
struct MarketContext {
    pool_index: u64,
    comptroller: Address,
    market: MarketSnapshot,
}

async fn market_context(
    config: &Config,
    rpc_url: &str,
    pool_id: u64,
    asset: &str,
    account: Option<Address>,
) -> Result<MarketContext> {
    let entry = directory::pool_entry(rpc_url, config.pool_directory.parse()?, pool_id).await?;
    let snapshot = directory::pool_snapshot(rpc_url, &entry, account).await?;

    let market = match evm::resolve_token(asset) {
        Some(addr) => snapshot.market_for(addr),
        None => snapshot.market_for_symbol(asset),
    }
    .with_context(|| format!("pool {pool_id} has no market for '{asset}'"))?
    .clone();

    Ok(MarketContext {
        pool_index: pool_id,
        comptroller: entry.comptroller,
        market,
    })
}

fn connect(config: &Config, dry_run: bool) -> Result<(String, WalletSession)> {
    let rpc_url = config.rpc_url()?.to_string();
    let session = WalletSession::connect_from_env(rpc_url.as_str(), dry_run)?;
    Ok((rpc_url, session))
}

// ── Supply ─────────────────────────────────────────────────────────

pub fn run_supply(
    config: &Config,
    pool: crate::cli::MarketArgs,
    asset: &str,
    amount: f64,
    dry_run: bool,
) -> Result<()> {
    let (rpc_url, session) = connect(config, dry_run)?;
    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let (wallet, key) = session.require_active()?;
        let ctx = market_context(config, &rpc_url, pool.pool, asset, Some(wallet)).await?;
        let units = evm::to_token_units(amount, ctx.market.decimals);

        println!(
            "  LENDING SUPPLY: {} {} to pool {}",
            amount, ctx.market.symbol, ctx.pool_index
        );

        let rp = evm::read_provider(&rpc_url)?;
        if ctx.market.underlying != ETH_PSEUDO_ADDRESS {
            super::require_balance(&rp, wallet, ctx.market.underlying, units, &ctx.market.symbol)
                .await?;
        }

        if session.dry_run {
            println!("  LENDING: preflight OK — balance covers supply");
            println!("  LENDING: [DRY RUN] would approve {} + mint", ctx.market.symbol);
            return Ok(());
        }

        let provider = evm::make_provider(key, &rpc_url)?;

        if ctx.market.underlying == ETH_PSEUDO_ADDRESS {
            let ceth = ICEther::new(ctx.market.ctoken, &provider);
            let pending = ceth.mint().value(units).send().await.context("mint failed")?;
            let receipt = pending.get_receipt().await.context("mint receipt")?;
            evm::require_success(&receipt, "mint")?;
            println!("  LENDING: mint tx: {:?}", receipt.transaction_hash);
            return Ok(());
        }

        super::approve_if_needed(
            &provider,
            wallet,
            ctx.market.underlying,
            ctx.market.ctoken,
            units,
            "LENDING",
        )
        .await?;

        let ctoken = ICToken::new(ctx.market.ctoken, &provider);
        let code = ctoken.mint(units).call().await.context("mint simulation")?;
        super::require_code_zero(code, "mint")?;

        let pending = ctoken.mint(units).send().await.context("mint failed")?;
        let receipt = pending.get_receipt().await.context("mint receipt")?;
        evm::require_success(&receipt, "mint")?;
        println!("  LENDING: mint tx: {:?}", receipt.transaction_hash);
        Ok(())
    })
}

// ── Withdraw ───────────────────────────────────────────────────────

pub fn run_withdraw(
    config: &Config,
    pool: crate::cli::MarketArgs,
    asset: &str,
    amount: f64,
    dry_run: bool,
) -> Result<()> {
    let (rpc_url, session) = connect(config, dry_run)?;
    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let (wallet, key) = session.require_active()?;
        let ctx = market_context(config, &rpc_url, pool.pool, asset, Some(wallet)).await?;
        let units = evm::to_token_units(amount, ctx.market.decimals);

        println!(
            "  LENDING WITHDRAW: {} {} from pool {}",
            amount, ctx.market.symbol, ctx.pool_index
        );

        let supplied = ctx.market.to_whole_units(ctx.market.supply_balance);
        if supplied < amount {
            bail!(
                "cannot withdraw {amount} {}: only {supplied:.6} supplied",
                ctx.market.symbol
            );
        }

        if session.dry_run {
            println!("  LENDING: preflight OK — supply covers withdrawal");
            println!("  LENDING: [DRY RUN] would redeemUnderlying");
            return Ok(());
        }

        let provider = evm::make_provider(key, &rpc_url)?;
        let ctoken = ICToken::new(ctx.market.ctoken, &provider);

        let code = ctoken
            .redeemUnderlying(units)
            .call()
            .await
            .context("redeemUnderlying simulation")?;
        super::require_code_zero(code, "redeemUnderlying")?;

        let pending = ctoken
            .redeemUnderlying(units)
            .send()
            .await
            .context("redeemUnderlying failed")?;
        let receipt = pending.get_receipt().await.context("redeem receipt")?;
        evm::require_success(&receipt, "redeemUnderlying")?;
        println!("  LENDING: redeem tx: {:?}", receipt.transaction_hash);
        Ok(())
    })
}

// ── Borrow ─────────────────────────────────────────────────────────

pub fn run_borrow(
    config: &Config,
    pool: crate::cli::MarketArgs,
    asset: &str,
    amount: f64,
    dry_run: bool,
) -> Result<()> {
    let (rpc_url, session) = connect(config, dry_run)?;
    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let (wallet, key) = session.require_active()?;
        let ctx = market_context(config, &rpc_url, pool.pool, asset, Some(wallet)).await?;
        let units = evm::to_token_units(amount, ctx.market.decimals);

        println!(
            "  LENDING BORROW: {} {} from pool {}",
            amount, ctx.market.symbol, ctx.pool_index
        );

        let rp = evm::read_provider(&rpc_url)?;
        let ctoken_read = ICToken::new(ctx.market.ctoken, &rp);
        let code = ctoken_read
            .borrow(units)
            .from(wallet)
            .call()
            .await
            .context("borrow simulation")?;
        super::require_code_zero(code, "borrow")?;

        if session.dry_run {
            println!("  LENDING: preflight OK — borrow within limit");
            println!("  LENDING: [DRY RUN] would borrow");
            return Ok(());
        }

        let provider = evm::make_provider(key, &rpc_url)?;
        let ctoken = ICToken::new(ctx.market.ctoken, &provider);
        let pending = ctoken
            .borrow(units)
            .gas(500_000)
            .send()
            .await
            .context("borrow failed")?;
        let receipt = pending.get_receipt().await.context("borrow receipt")?;
        evm::require_success(&receipt, "borrow")?;
        println!("  LENDING: borrow tx: {:?}", receipt.transaction_hash);
        Ok(())
    })
}

// ── Repay ──────────────────────────────────────────────────────────

pub fn run_repay(
    config: &Config,
    pool: crate::cli::MarketArgs,
    asset: &str,
    amount: f64,
    dry_run: bool,
) -> Result<()> {
    let (rpc_url, session) = connect(config, dry_run)?;
    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let (wallet, key) = session.require_active()?;
        let ctx = market_context(config, &rpc_url, pool.pool, asset, Some(wallet)).await?;
        let units = evm::to_token_units(amount, ctx.market.decimals);

        println!(
            "  LENDING REPAY: {} {} to pool {}",
            amount, ctx.market.symbol, ctx.pool_index
        );

        let rp = evm::read_provider(&rpc_url)?;
        if ctx.market.underlying != ETH_PSEUDO_ADDRESS {
            super::require_balance(&rp, wallet, ctx.market.underlying, units, &ctx.market.symbol)
                .await?;
        }

        if session.dry_run {
            println!("  LENDING: preflight OK — balance covers repayment");
            println!("  LENDING: [DRY RUN] would approve {} + repayBorrow", ctx.market.symbol);
            return Ok(());
        }

        let provider = evm::make_provider(key, &rpc_url)?;

        if ctx.market.underlying == ETH_PSEUDO_ADDRESS {
            let ceth = ICEther::new(ctx.market.ctoken, &provider);
            let pending = ceth
                .repayBorrow()
                .value(units)
                .send()
                .await
                .context("repayBorrow failed")?;
            let receipt = pending.get_receipt().await.context("repay receipt")?;
            evm::require_success(&receipt, "repayBorrow")?;
            println!("  LENDING: repay tx: {:?}", receipt.transaction_hash);
            return Ok(());
        }

        super::approve_if_needed(
            &provider,
            wallet,
            ctx.market.underlying,
            ctx.market.ctoken,
            units,
            "LENDING",
        )
        .await?;

        let ctoken = ICToken::new(ctx.market.ctoken, &provider);
        let code = ctoken
            .repayBorrow(units)
            .call()
            .await
            .context("repayBorrow simulation")?;
        super::require_code_zero(code, "repayBorrow")?;

        let pending = ctoken
            .repayBorrow(units)
            .send()
            .await
            .context("repayBorrow failed")?;
        let receipt = pending.get_receipt().await.context("repay receipt")?;
        evm::require_success(&receipt, "repayBorrow")?;
        println!("  LENDING: repay tx: {:?}", receipt.transaction_hash);
        Ok(())
    })
}

// ── Collateral toggle ──────────────────────────────────────────────

pub fn run_collateral(
    config: &Config,
    pool: crate::cli::MarketArgs,
    asset: &str,
    disable: bool,
    dry_run: bool,
) -> Result<()> {
    let (rpc_url, session) = connect(config, dry_run)?;
    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let (wallet, key) = session.require_active()?;
        let ctx = market_context(config, &rpc_url, pool.pool, asset, Some(wallet)).await?;

        let verb = if disable { "disable" } else { "enable" };
        println!(
            "  LENDING COLLATERAL: {verb} {} in pool {}",
            ctx.market.symbol, ctx.pool_index
        );

        if disable && !ctx.market.membership {
            bail!("{} is not enabled as collateral", ctx.market.symbol);
        }
        if !disable && ctx.market.membership {
            println!("  LENDING: {} already enabled as collateral", ctx.market.symbol);
            return Ok(());
        }

        if session.dry_run {
            println!("  LENDING: [DRY RUN] would {verb} collateral");
            return Ok(());
        }

        let provider = evm::make_provider(key, &rpc_url)?;
        let comptroller = IComptroller::new(ctx.comptroller, &provider);

        if disable {
            // exitMarket reverts borrows against this collateral; the
            // protocol rejects it with a nonzero code if unsafe.
            let code = comptroller
                .exitMarket(ctx.market.ctoken)
                .call()
                .await
                .context("exitMarket simulation")?;
            super::require_code_zero(code, "exitMarket")?;

            let pending = comptroller
                .exitMarket(ctx.market.ctoken)
                .send()
                .await
                .context("exitMarket failed")?;
            let receipt = pending.get_receipt().await.context("exitMarket receipt")?;
            evm::require_success(&receipt, "exitMarket")?;
            println!("  LENDING: exitMarket tx: {:?}", receipt.transaction_hash);
        } else {
            let markets = vec![ctx.market.ctoken];
            let codes = comptroller
                .enterMarkets(markets.clone())
                .call()
                .await
                .context("enterMarkets simulation")?;
            for code in codes {
                super::require_code_zero(code, "enterMarkets")?;
            }

            let pending = comptroller
                .enterMarkets(markets)
                .send()
                .await
                .context("enterMarkets failed")?;
            let receipt = pending.get_receipt().await.context("enterMarkets receipt")?;
            evm::require_success(&receipt, "enterMarkets")?;
            println!("  LENDING: enterMarkets tx: {:?}", receipt.transaction_hash);
        }
        Ok(())
    })
}

// ── Claim rewards ──────────────────────────────────────────────────

pub fn run_claim(config: &Config, pool: crate::cli::MarketArgs, dry_run: bool) -> Result<()> {
    let (rpc_url, session) = connect(config, dry_run)?;
    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let (wallet, key) = session.require_active()?;
        let entry =
            directory::pool_entry(&rpc_url, config.pool_directory.parse()?, pool.pool).await?;

        let rp = evm::read_provider(&rpc_url)?;
        let distributors = IComptroller::new(entry.comptroller, &rp)
            .getRewardsDistributors()
            .call()
            .await
            .unwrap_or_default();

        if distributors.is_empty() {
            println!("  LENDING: pool {} has no rewards distributors", pool.pool);
            return Ok(());
        }

        println!(
            "  LENDING CLAIM: {} distributor(s) on pool {}",
            distributors.len(),
            pool.pool
        );

        if session.dry_run {
            println!("  LENDING: [DRY RUN] would claim from each distributor");
            return Ok(());
        }

        let provider = evm::make_provider(key, &rpc_url)?;
        for distributor_addr in distributors {
            let distributor = IRewardsDistributor::new(distributor_addr, &provider);
            let pending = distributor
                .claimRewards(wallet)
                .send()
                .await
                .with_context(|| format!("claimRewards on {distributor_addr}"))?;
            let receipt = pending.get_receipt().await.context("claim receipt")?;
            evm::require_success(&receipt, "claimRewards")?;
            println!(
                "  LENDING: claim tx from {}: {:?}",
                evm::short_addr(&distributor_addr),
                receipt.transaction_hash
            );
        }
        Ok(())
    })
}

//! `positions`: everything the account holds. Lending markets across all
//! pools, the yield-aggregator fund, and tranche deposits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use alloy::primitives::Address;
use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::Config;
use crate::fetch::{self, account, directory};
use crate::model::PoolSnapshot;
use crate::oracle;
use crate::rates;
use crate::session;
use crate::view;

#[derive(Serialize)]
struct PortfolioSummary {
    address: Address,
    fetched_at: String,
    pools: Vec<PoolSnapshot>,
    total_supply_usd: f64,
    total_borrow_usd: f64,
    vault_balance_usd: Option<f64>,
}

pub fn run(config: &Config, address: Option<Address>, watch: Option<u64>, json: bool) -> Result<()> {
    let account = session::resolve_address(address)?;
    let rpc_url = config.rpc_url()?.to_string();

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        match watch {
            None => render_once(config, &rpc_url, account, json).await,
            Some(interval_secs) => {
                let running = Arc::new(AtomicBool::new(true));
                let flag = running.clone();
                ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
                    .context("installing Ctrl-C handler")?;

                while running.load(Ordering::SeqCst) {
                    if let Err(e) = render_once(config, &rpc_url, account, json).await {
                        eprintln!("  WARN  refresh failed: {e:#}");
                    }
                    println!();

                    // Sleep in 1s slices so Ctrl-C lands promptly.
                    for _ in 0..interval_secs.max(1) {
                        if !running.load(Ordering::SeqCst) {
                            break;
                        }
                        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                    }
                }
                println!("Stopped.");
                Ok(())
            }
        }
    })
}

async fn render_once(config: &Config, rpc_url: &str, account: Address, json: bool) -> Result<()> {
    let entries = directory::pool_entries(rpc_url, config.pool_directory.parse()?).await?;
    let snapshots = fetch::all_pool_snapshots(rpc_url, &entries, Some(account)).await?;

    // Only pools the account actually touches get priced and rendered.
    let held: Vec<&PoolSnapshot> = snapshots
        .iter()
        .filter(|s| {
            s.markets
                .iter()
                .any(|m| m.supply_balance > 0.0 || m.borrow_balance > 0.0)
        })
        .collect();

    let client = fetch::http_client()?;
    let mut total_supply_usd = 0.0;
    let mut total_borrow_usd = 0.0;
    let mut priced: Vec<(&PoolSnapshot, oracle::TokenPrices)> = Vec::new();

    for snap in &held {
        let prices = oracle::price_pool_tokens(
            config,
            rpc_url,
            snap,
            &std::collections::HashMap::new(),
            &client,
        )
        .await?;
        for m in &snap.markets {
            total_supply_usd += prices.usd_value(m.underlying, m.supply_balance, m.decimals);
            total_borrow_usd += prices.usd_value(m.underlying, m.borrow_balance, m.decimals);
        }
        priced.push((*snap, prices));
    }

    let vault = match account_vault(config, rpc_url, account).await {
        Ok(v) => Some(v),
        Err(e) => {
            eprintln!("  WARN  vault balance unavailable: {e:#}");
            None
        }
    };

    if json {
        let summary = PortfolioSummary {
            address: account,
            fetched_at: chrono::Utc::now().to_rfc3339(),
            pools: held.into_iter().cloned().collect(),
            total_supply_usd,
            total_borrow_usd,
            vault_balance_usd: vault.as_ref().map(|v| v.balance_usd),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "Positions for {} at {}",
        account,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "Supplied: {}   Borrowed: {}",
        view::usd(total_supply_usd),
        view::usd(total_borrow_usd)
    );
    println!();

    if priced.is_empty() {
        println!("No lending positions.");
    }
    for (snap, prices) in &priced {
        println!("Pool {}: {}", snap.entry.index, snap.entry.name);
        for m in &snap.markets {
            if m.supply_balance <= 0.0 && m.borrow_balance <= 0.0 {
                continue;
            }
            let supply_apy = rates::block_rate_to_apy(m.supply_rate_per_block)?;
            println!(
                "  {:<8} supplied {} ({})   borrowed {}   supply APY {}{}",
                m.symbol,
                format!("{:.4}", m.to_whole_units(m.supply_balance)),
                view::usd(prices.usd_value(m.underlying, m.supply_balance, m.decimals)),
                view::usd(prices.usd_value(m.underlying, m.borrow_balance, m.decimals)),
                view::percent(supply_apy),
                if m.membership { "  [collateral]" } else { "" },
            );
        }
        crate::pools::render_borrow_limit(snap, prices);
        println!();
    }

    if let Some(vault) = &vault {
        println!(
            "Vault: {} at {} APY ({} APR)",
            view::usd(vault.balance_usd),
            view::percent(vault.apy),
            view::percent(vault.apr),
        );
    }

    match tranche_lines(config, rpc_url, account).await {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
        }
        Err(e) => eprintln!("  WARN  tranche balances unavailable: {e:#}"),
    }

    Ok(())
}

async fn account_vault(
    config: &Config,
    rpc_url: &str,
    account: Address,
) -> Result<account::VaultSnapshot> {
    let fund: Address = config
        .fund_manager
        .parse()
        .context("parsing fund_manager address")?;
    account::vault_snapshot(rpc_url, fund, account).await
}

async fn tranche_lines(config: &Config, rpc_url: &str, account: Address) -> Result<Vec<String>> {
    let pool: Address = config
        .tranche_pool
        .parse()
        .context("parsing tranche_pool address")?;
    let snap = account::tranche_snapshot(rpc_url, pool, account).await?;

    let mut lines = Vec::new();
    for (rating, balance) in &snap.balances {
        if *balance <= 0.0 {
            continue;
        }
        lines.push(format!(
            "Tranche {rating} (epoch {}): {balance:.4} deposited",
            snap.epoch
        ));
    }
    Ok(lines)
}

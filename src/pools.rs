//! `pools` and `pool <id>`: the directory listing and the single-pool page.

use alloy::primitives::Address;
use anyhow::{Context, Result};

use crate::config::Config;
use crate::evm;
use crate::fetch::{self, directory};
use crate::model::market::{self, MarketSnapshot, PoolSnapshot};
use crate::oracle::{self, TokenPrices};
use crate::rates;
use crate::view;

/// List every pool in the directory.
pub fn run_list(config: &Config, json: bool) -> Result<()> {
    let rpc_url = config.rpc_url()?.to_string();
    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        let entries = directory::pool_entries(&rpc_url, directory_address(config)?).await?;
        let snapshots = fetch::all_pool_snapshots(&rpc_url, &entries, None).await?;

        if json {
            println!("{}", serde_json::to_string_pretty(&snapshots)?);
            return Ok(());
        }

        println!("{} pools in directory", snapshots.len());
        println!("{:<5} {:<28} {:<8} {:<24} TOP SUPPLY APY", "ID", "NAME", "ASSETS", "SYMBOLS");
        for snap in &snapshots {
            let symbols: Vec<&str> = snap.markets.iter().map(|m| m.symbol.as_str()).collect();
            let top_apy = snap
                .markets
                .iter()
                .filter_map(|m| rates::block_rate_to_apy(m.supply_rate_per_block).ok())
                .fold(0.0f64, f64::max);
            println!(
                "{:<5} {:<28} {:<8} {:<24} {}",
                snap.entry.index,
                truncate(&snap.entry.name, 28),
                snap.markets.len(),
                truncate(&symbols.join(", "), 24),
                view::percent(top_apy),
            );
        }
        Ok(())
    })
}

/// Render one pool: markets, rates, incentives, and (when an address is
/// known) balances plus the borrow-limit bar.
pub fn run_detail(config: &Config, id: u64, address: Option<Address>, json: bool) -> Result<()> {
    let rpc_url = config.rpc_url()?.to_string();
    // Balances are optional on this page: explicit --address, else the
    // connected wallet, else a read-only view.
    let account = address.or_else(|| crate::session::resolve_address(None).ok());

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        let entry = directory::pool_entry(&rpc_url, directory_address(config)?, id).await?;
        let snapshot = directory::pool_snapshot(&rpc_url, &entry, account).await?;
        let incentives =
            directory::pool_incentives(&rpc_url, entry.comptroller, &snapshot.markets).await?;

        let client = fetch::http_client()?;
        let prices =
            oracle::price_pool_tokens(config, &rpc_url, &snapshot, &incentives, &client).await?;

        if json {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            return Ok(());
        }

        println!(
            "Pool {}: {} ({})",
            entry.index,
            entry.name,
            evm::short_addr(&entry.comptroller)
        );
        println!();
        println!(
            "{:<8} {:>12} {:>12} {:>7} {:>16} {:>14} {:>14}",
            "ASSET", "SUPPLY APY", "BORROW APY", "LTV", "TOTAL SUPPLY", "YOUR SUPPLY", "YOUR BORROW"
        );

        for m in &snapshot.markets {
            let supply_apy = rates::block_rate_to_apy(m.supply_rate_per_block)?;
            let borrow_apy = rates::block_rate_to_apy(m.borrow_rate_per_block)?;
            let total_supply_usd = prices.usd_value(m.underlying, m.underlying_total_supply, m.decimals);
            let your_supply_usd = prices.usd_value(m.underlying, m.supply_balance, m.decimals);
            let your_borrow_usd = prices.usd_value(m.underlying, m.borrow_balance, m.decimals);

            println!(
                "{:<8} {:>12} {:>12} {:>6.0}% {:>16} {:>14} {:>14}{}",
                m.symbol,
                view::percent(supply_apy),
                view::percent(borrow_apy),
                m.ltv_percent(),
                view::usd(total_supply_usd),
                view::usd(your_supply_usd),
                view::usd(your_borrow_usd),
                if m.membership { "  [collateral]" } else { "" },
            );

            render_incentives(m, &incentives, &prices);
        }

        if account.is_some() {
            println!();
            render_borrow_limit(&snapshot, &prices);
        }

        Ok(())
    })
}

/// Reward-incentive lines under a market row. A market that cannot be
/// priced (empty, or an unpriced token) is reported and skipped rather
/// than taking the whole page down.
fn render_incentives(
    market: &MarketSnapshot,
    incentives: &std::collections::HashMap<Address, Vec<crate::model::RewardIncentive>>,
    prices: &TokenPrices,
) {
    let Some(market_incentives) = incentives.get(&market.ctoken) else {
        return;
    };

    let mut computed = Vec::new();
    for incentive in market_incentives {
        let (Some(reward_price), Some(underlying_price)) = (
            prices.get(incentive.reward_token),
            prices.get(market.underlying),
        ) else {
            continue;
        };

        match rates::incentive_rates(
            incentive,
            reward_price.eth_price,
            market.underlying_total_supply,
            underlying_price.eth_price,
        ) {
            Ok(rates) => computed.push(rates),
            Err(e) => {
                eprintln!("  WARN  {} incentive on {}: {e}", incentive.reward_symbol, market.symbol);
            }
        }
    }

    for r in &computed {
        println!(
            "  + {} rewards: {} supply APR ({} APY), {} borrow APR",
            r.incentive.reward_symbol,
            view::percent(r.supply_apr),
            view::percent(r.supply_apy),
            view::percent(r.borrow_apr),
        );
    }
    if computed.len() > 1 {
        println!(
            "  = combined reward APR: {} supply / {} borrow (additive approximation)",
            view::percent(rates::total_supply_apr(&computed)),
            view::percent(rates::total_borrow_apr(&computed)),
        );
    }
}

pub(crate) fn render_borrow_limit(snapshot: &PoolSnapshot, prices: &TokenPrices) {
    let usd_values: Vec<(f64, f64)> = snapshot
        .markets
        .iter()
        .map(|m| {
            (
                prices.usd_value(m.underlying, m.supply_balance, m.decimals),
                prices.usd_value(m.underlying, m.borrow_balance, m.decimals),
            )
        })
        .collect();

    let limit = market::borrow_limit_usd(&snapshot.markets, &usd_values);
    let borrow_usd: f64 = usd_values.iter().map(|(_, b)| b).sum();
    let ratio = market::borrow_utilization_percent(borrow_usd, limit);

    println!("{}", view::utilization_bar(ratio, limit));
    if let Some(warning) = view::utilization_warning(ratio) {
        println!("{warning}");
    }
}

fn directory_address(config: &Config) -> Result<Address> {
    config
        .pool_directory
        .parse()
        .context("parsing pool_directory address")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

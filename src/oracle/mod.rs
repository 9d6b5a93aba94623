//! Token price lookup with a two-tier oracle chain.
//!
//! Each pool names its own price oracle; the protocol also runs a master
//! price oracle covering the long tail. Lookups try the pool's oracle first
//! and fall back to the master exactly once. If both fail the error
//! propagates: a missing price must never silently become zero.

pub mod onchain;
pub mod usd;

use std::collections::HashMap;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use async_trait::async_trait;

/// A price oracle: raw 1e18-scaled price of a token in the base unit (ETH).
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn price(&self, token: Address) -> Result<f64>;

    /// Label used in status lines when this source fails.
    fn label(&self) -> &str;
}

/// Try `primary`, then `fallback`; surface both errors if neither prices
/// the token.
pub async fn price_with_fallback(
    token: Address,
    primary: &dyn PriceSource,
    fallback: &dyn PriceSource,
) -> Result<f64> {
    match primary.price(token).await {
        Ok(price) => Ok(price),
        Err(primary_err) => {
            eprintln!(
                "  ORACLE: {} failed for {token}, trying {}: {primary_err:#}",
                primary.label(),
                fallback.label(),
            );
            fallback.price(token).await.with_context(|| {
                format!(
                    "both oracles failed for {token} ({} then {}; first error: {primary_err:#})",
                    primary.label(),
                    fallback.label(),
                )
            })
        }
    }
}

/// A token's price in the ETH base unit (raw oracle mantissa) and in USD.
#[derive(Debug, Clone, Copy)]
pub struct TokenPrice {
    /// Raw 1e18-scaled oracle value, unadjusted.
    pub eth_price: f64,
    /// `(eth_price / 10^decimals) * eth_usd`.
    pub usd_price: f64,
}

/// Prices for a set of tokens plus the ETH/USD reference rate.
#[derive(Debug, Clone, Default)]
pub struct TokenPrices {
    pub tokens: HashMap<Address, TokenPrice>,
    pub eth_usd: f64,
}

impl TokenPrices {
    pub fn get(&self, token: Address) -> Option<&TokenPrice> {
        self.tokens.get(&token)
    }

    /// USD value of a raw token amount.
    pub fn usd_value(&self, token: Address, raw_amount: f64, decimals: u8) -> f64 {
        match self.get(token) {
            Some(p) => raw_amount / 10f64.powi(decimals as i32) * p.usd_price,
            None => 0.0,
        }
    }
}

/// Price every token a pool snapshot touches (market underlyings plus
/// reward tokens) through the pool's own oracle with the master oracle as
/// fallback.
pub async fn price_pool_tokens(
    config: &crate::config::Config,
    rpc_url: &str,
    snapshot: &crate::model::PoolSnapshot,
    incentives: &HashMap<Address, Vec<crate::model::RewardIncentive>>,
    client: &reqwest::Client,
) -> Result<TokenPrices> {
    let pool_oracle_addr =
        crate::fetch::directory::pool_oracle(rpc_url, snapshot.entry.comptroller).await?;
    let primary = onchain::OnchainOracle::new(pool_oracle_addr, rpc_url, "pool oracle");
    let master: Address = config
        .master_price_oracle
        .parse()
        .context("parsing master_price_oracle address")?;
    let fallback = onchain::OnchainOracle::new(master, rpc_url, "master oracle");

    let eth_usd = usd::eth_usd_price(client, &config.eth_usd_feed).await?;

    let mut tokens: Vec<Address> = Vec::new();
    let mut decimals: HashMap<Address, u8> = HashMap::new();
    for market in &snapshot.markets {
        tokens.push(market.underlying);
        decimals.insert(market.underlying, market.decimals);
    }
    for incentive in incentives.values().flatten() {
        if decimals.contains_key(&incentive.reward_token) {
            continue;
        }
        tokens.push(incentive.reward_token);
        let provider = crate::evm::read_provider(rpc_url)?;
        let token_decimals = crate::evm::IERC20::new(incentive.reward_token, &provider)
            .decimals()
            .call()
            .await
            .unwrap_or(18);
        decimals.insert(incentive.reward_token, token_decimals);
    }

    fetch_prices(&tokens, &decimals, &primary, &fallback, eth_usd).await
}

/// Fetch prices for `tokens` through the two-tier oracle chain, scaling USD
/// prices with each token's decimals.
pub async fn fetch_prices(
    tokens: &[Address],
    decimals: &HashMap<Address, u8>,
    primary: &dyn PriceSource,
    fallback: &dyn PriceSource,
    eth_usd: f64,
) -> Result<TokenPrices> {
    let mut map = HashMap::new();
    for &token in tokens {
        if map.contains_key(&token) {
            continue;
        }
        let eth_price = price_with_fallback(token, primary, fallback).await?;
        let token_decimals = decimals.get(&token).copied().unwrap_or(18);
        let usd_price = eth_price / 10f64.powi(token_decimals as i32) * eth_usd;
        map.insert(
            token,
            TokenPrice {
                eth_price,
                usd_price,
            },
        );
    }
    Ok(TokenPrices {
        tokens: map,
        eth_usd,
    })
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use alloy::primitives::Address;
use anyhow::{Result, bail};
use async_trait::async_trait;

use lend_desk::oracle::{self, PriceSource};

// ── Test doubles ─────────────────────────────────────────────────────

struct StaticSource {
    name: &'static str,
    price: f64,
    calls: AtomicU32,
}

impl StaticSource {
    fn new(name: &'static str, price: f64) -> Self {
        StaticSource {
            name,
            price,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl PriceSource for StaticSource {
    async fn price(&self, _token: Address) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.price)
    }

    fn label(&self) -> &str {
        self.name
    }
}

struct FailingSource {
    name: &'static str,
    calls: AtomicU32,
}

impl FailingSource {
    fn new(name: &'static str) -> Self {
        FailingSource {
            name,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl PriceSource for FailingSource {
    async fn price(&self, token: Address) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        bail!("{}: no price for {token}", self.name)
    }

    fn label(&self) -> &str {
        self.name
    }
}

fn token(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

// ── Fallback behavior ────────────────────────────────────────────────

#[tokio::test]
async fn primary_price_wins_when_available() {
    let primary = StaticSource::new("pool oracle", 1.5e18);
    let fallback = StaticSource::new("master oracle", 9.9e18);

    let price = oracle::price_with_fallback(token(1), &primary, &fallback)
        .await
        .unwrap();
    assert_eq!(price, 1.5e18);
    assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fallback_is_used_transparently_on_primary_failure() {
    let primary = FailingSource::new("pool oracle");
    let fallback = StaticSource::new("master oracle", 2.0e18);

    let price = oracle::price_with_fallback(token(1), &primary, &fallback)
        .await
        .unwrap();
    assert_eq!(price, 2.0e18);
    assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn both_sources_failing_is_an_error_not_a_zero_price() {
    let primary = FailingSource::new("pool oracle");
    let fallback = FailingSource::new("master oracle");

    let err = oracle::price_with_fallback(token(1), &primary, &fallback)
        .await
        .unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("both oracles failed"), "got: {msg}");

    // Exactly one fallback attempt, no retry loop.
    assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
}

// ── Batch pricing ────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_prices_scales_usd_by_decimals() {
    let primary = StaticSource::new("pool oracle", 1.0e18);
    let fallback = FailingSource::new("master oracle");

    let tokens = [token(1), token(2)];
    let mut decimals = HashMap::new();
    decimals.insert(token(1), 18u8);
    decimals.insert(token(2), 6u8);

    let prices = oracle::fetch_prices(&tokens, &decimals, &primary, &fallback, 2000.0)
        .await
        .unwrap();

    assert_eq!(prices.eth_usd, 2000.0);
    // 18 decimals: 1e18 / 1e18 * 2000 = $2000.
    let p18 = prices.get(token(1)).unwrap();
    assert!((p18.usd_price - 2000.0).abs() < 1e-6);
    // 6 decimals: 1e18 / 1e6 * 2000.
    let p6 = prices.get(token(2)).unwrap();
    assert!((p6.usd_price - 1e12 * 2000.0).abs() < 1.0);
}

#[tokio::test]
async fn fetch_prices_propagates_a_dead_oracle_chain() {
    let primary = FailingSource::new("pool oracle");
    let fallback = FailingSource::new("master oracle");
    let tokens = [token(1)];

    let result =
        oracle::fetch_prices(&tokens, &HashMap::new(), &primary, &fallback, 2000.0).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn usd_value_prices_raw_amounts() {
    let primary = StaticSource::new("pool oracle", 1.0e18);
    let fallback = FailingSource::new("master oracle");
    let mut decimals = HashMap::new();
    decimals.insert(token(1), 18u8);

    let prices = oracle::fetch_prices(&[token(1)], &decimals, &primary, &fallback, 2000.0)
        .await
        .unwrap();

    // 2.5 whole tokens at $2000.
    let value = prices.usd_value(token(1), 2.5e18, 18);
    assert!((value - 5000.0).abs() < 1e-6);
    // Unknown tokens value to zero rather than panicking mid-render.
    assert_eq!(prices.usd_value(token(9), 1e18, 18), 0.0);
}

mod anvil_common;

use alloy::primitives::U256;

use lend_desk::cli::MarketArgs;
use lend_desk::config::Config;
use lend_desk::model::Chain;
use lend_desk::session::PRIVATE_KEY_ENV;

use anvil_common::*;

// ── Constants: mainnet fork ──────────────────────────────────────────

const MAINNET_RPC: &str = "https://eth.llamarpc.com";
const MAINNET_CHAIN_ID: u64 = 1;

const DAI: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";
// cDAI holds a deep DAI reserve; a convenient whale to impersonate.
const DAI_WHALE: &str = "0x5d3a536E4D6DbD6114cc1Ead35777bAB948E3643";

// A long-lived public pool with a DAI market.
const POOL_ID: u64 = 6;

// ── Helpers ──────────────────────────────────────────────────────────

fn fork_config(ctx: &ForkContext) -> Config {
    Config {
        chain: Chain::custom("mainnet-fork", MAINNET_CHAIN_ID, &ctx.rpc_url),
        ..Config::default()
    }
}

fn install_session_key(ctx: &ForkContext) {
    // set_var is unsafe in edition 2024; tests are single-threaded enough.
    unsafe { std::env::set_var(PRIVATE_KEY_ENV, &ctx.private_key) };
}

fn fund_wallet(ctx: &ForkContext, amount_dai: u128) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let dai: alloy::primitives::Address = DAI.parse().unwrap();
        let whale: alloy::primitives::Address = DAI_WHALE.parse().unwrap();
        fund_eth(
            &ctx.rpc_url,
            ctx.wallet_address,
            U256::from(10u128 * 10u128.pow(18)),
        )
        .await;
        fund_erc20(
            &ctx.rpc_url,
            dai,
            whale,
            ctx.wallet_address,
            U256::from(amount_dai * 10u128.pow(18)),
        )
        .await;
    });
}

// ── Tests ────────────────────────────────────────────────────────────

#[test]
#[ignore] // Requires Anvil + network access
fn test_supply_then_withdraw_dai() {
    let ctx = spawn_fork(MAINNET_RPC, MAINNET_CHAIN_ID);
    fund_wallet(&ctx, 1000);
    install_session_key(&ctx);
    let config = fork_config(&ctx);

    lend_desk::actions::lending::run_supply(&config, MarketArgs { pool: POOL_ID }, "DAI", 100.0, false)
        .expect("supply failed");

    let rt = tokio::runtime::Runtime::new().unwrap();
    let dai: alloy::primitives::Address = DAI.parse().unwrap();
    let after_supply = rt.block_on(balance_of(&ctx.rpc_url, dai, ctx.wallet_address));
    assert!(
        after_supply < U256::from(1000u128 * 10u128.pow(18)),
        "DAI should have left the wallet"
    );

    lend_desk::actions::lending::run_withdraw(&config, MarketArgs { pool: POOL_ID }, "DAI", 50.0, false)
        .expect("withdraw failed");

    let after_withdraw = rt.block_on(balance_of(&ctx.rpc_url, dai, ctx.wallet_address));
    assert!(
        after_withdraw > after_supply,
        "DAI should have returned to the wallet"
    );
}

#[test]
#[ignore] // Requires Anvil + network access
fn test_dry_run_supply_sends_nothing() {
    let ctx = spawn_fork(MAINNET_RPC, MAINNET_CHAIN_ID);
    fund_wallet(&ctx, 1000);
    install_session_key(&ctx);
    let config = fork_config(&ctx);

    let rt = tokio::runtime::Runtime::new().unwrap();
    let dai: alloy::primitives::Address = DAI.parse().unwrap();
    let before = rt.block_on(balance_of(&ctx.rpc_url, dai, ctx.wallet_address));

    lend_desk::actions::lending::run_supply(&config, MarketArgs { pool: POOL_ID }, "DAI", 100.0, true)
        .expect("dry-run supply failed");

    let after = rt.block_on(balance_of(&ctx.rpc_url, dai, ctx.wallet_address));
    assert_eq!(before, after, "dry run must not move tokens");
}

#[test]
#[ignore] // Requires Anvil + network access
fn test_withdraw_more_than_supplied_fails_preflight() {
    let ctx = spawn_fork(MAINNET_RPC, MAINNET_CHAIN_ID);
    fund_wallet(&ctx, 10);
    install_session_key(&ctx);
    let config = fork_config(&ctx);

    let result = lend_desk::actions::lending::run_withdraw(
        &config,
        MarketArgs { pool: POOL_ID },
        "DAI",
        1_000_000.0,
        false,
    );
    let err = result.expect_err("oversized withdraw should fail").to_string();
    assert!(err.contains("cannot withdraw"), "got: {err}");
}

#[test]
#[ignore] // Requires Anvil + network access
fn test_collateral_toggle() {
    let ctx = spawn_fork(MAINNET_RPC, MAINNET_CHAIN_ID);
    fund_wallet(&ctx, 1000);
    install_session_key(&ctx);
    let config = fork_config(&ctx);

    lend_desk::actions::lending::run_supply(&config, MarketArgs { pool: POOL_ID }, "DAI", 100.0, false)
        .expect("supply failed");
    lend_desk::actions::lending::run_collateral(
        &config,
        MarketArgs { pool: POOL_ID },
        "DAI",
        false,
        false,
    )
    .expect("enterMarkets failed");
    lend_desk::actions::lending::run_collateral(
        &config,
        MarketArgs { pool: POOL_ID },
        "DAI",
        true,
        false,
    )
    .expect("exitMarket failed");
}

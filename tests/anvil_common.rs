#![allow(dead_code)]

use alloy::node_bindings::Anvil;
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::sol;

// ── Test-only contract interfaces ────────────────────────────────────

sol! {
    #[sol(rpc)]
    contract IERC20Test {
        function transfer(address to, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}

// ── Fork context ─────────────────────────────────────────────────────

pub struct ForkContext {
    pub _anvil: alloy::node_bindings::AnvilInstance,
    pub rpc_url: String,
    pub wallet_address: Address,
    pub private_key: String,
}

/// Spawn an Anvil fork of the given chain.
pub fn spawn_fork(fork_url: &str, chain_id: u64) -> ForkContext {
    let anvil = Anvil::new().fork(fork_url).chain_id(chain_id).spawn();

    let rpc_url = anvil.endpoint();
    let wallet_address = anvil.addresses()[0];
    let private_key = hex::encode(anvil.keys()[0].to_bytes());

    ForkContext {
        _anvil: anvil,
        rpc_url,
        wallet_address,
        private_key,
    }
}

// ── Token funding ────────────────────────────────────────────────────

/// Fund native ETH via anvil_setBalance.
pub async fn fund_eth(rpc_url: &str, addr: Address, amount: U256) {
    let provider = ProviderBuilder::new().connect_http(rpc_url.parse().unwrap());
    let _: () = provider
        .raw_request("anvil_setBalance".into(), (addr, amount))
        .await
        .expect("anvil_setBalance failed");
}

/// Fund ERC20 tokens by impersonating a whale and transferring.
pub async fn fund_erc20(
    rpc_url: &str,
    token: Address,
    whale: Address,
    recipient: Address,
    amount: U256,
) {
    let provider = ProviderBuilder::new().connect_http(rpc_url.parse().unwrap());

    let _: () = provider
        .raw_request("anvil_impersonateAccount".into(), [whale])
        .await
        .expect("anvil_impersonateAccount failed");

    let _: () = provider
        .raw_request(
            "anvil_setBalance".into(),
            (whale, U256::from(100u128 * 10u128.pow(18))),
        )
        .await
        .expect("anvil_setBalance for whale failed");

    let erc20 = IERC20Test::new(token, &provider);
    erc20
        .transfer(recipient, amount)
        .from(whale)
        .send()
        .await
        .expect("ERC20 transfer from whale failed")
        .get_receipt()
        .await
        .expect("ERC20 transfer receipt failed");

    let _: () = provider
        .raw_request("anvil_stopImpersonatingAccount".into(), [whale])
        .await
        .expect("anvil_stopImpersonatingAccount failed");
}

/// Query ERC20 balance.
pub async fn balance_of(rpc_url: &str, token: Address, account: Address) -> U256 {
    let provider = ProviderBuilder::new().connect_http(rpc_url.parse().unwrap());
    let erc20 = IERC20Test::new(token, &provider);
    erc20
        .balanceOf(account)
        .call()
        .await
        .expect("balanceOf call failed")
}

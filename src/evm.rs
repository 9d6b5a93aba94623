use std::collections::HashMap;

use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::sol;
use anyhow::Result;

// ── ERC20 contract interface ───────────────────────────────────────

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}

// ── Providers ──────────────────────────────────────────────────────

/// Read-only provider for view calls.
pub fn read_provider(rpc_url: &str) -> Result<impl Provider + Clone> {
    Ok(ProviderBuilder::new().connect_http(rpc_url.parse()?))
}

/// Signing provider for transactions.
pub fn make_provider(private_key: &str, rpc_url: &str) -> Result<impl Provider + Clone> {
    let signer: alloy::signers::local::PrivateKeySigner = private_key
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid key: {e}"))?;
    let wallet = alloy::network::EthereumWallet::from(signer);
    Ok(ProviderBuilder::new()
        .wallet(wallet)
        .connect_http(rpc_url.parse()?))
}

pub fn require_success(receipt: &alloy::rpc::types::TransactionReceipt, label: &str) -> Result<()> {
    if !receipt.status() {
        anyhow::bail!(
            "{} tx reverted (hash: {:?}, gas_used: {:?})",
            label,
            receipt.transaction_hash,
            receipt.gas_used,
        );
    }
    Ok(())
}

// ── Unit conversions ───────────────────────────────────────────────

/// Whole token units → raw on-chain units.
pub fn to_token_units(amount: f64, decimals: u8) -> U256 {
    let scaled = amount * 10f64.powi(decimals as i32);
    U256::from(scaled as u128)
}

/// Raw on-chain units → whole token units.
pub fn from_token_units(amount: U256, decimals: u8) -> f64 {
    u256_to_f64(amount) / 10f64.powi(decimals as i32)
}

/// Lossy U256 → f64, fine for display and rate math.
pub fn u256_to_f64(value: U256) -> f64 {
    value.to_string().parse::<f64>().unwrap_or(0.0)
}

/// Percent → 1e18-scaled mantissa (50.0 → 0.5e18).
pub fn percent_to_mantissa(percent: f64) -> U256 {
    U256::from((percent / 100.0 * 1e18) as u128)
}

pub fn short_addr(addr: &Address) -> String {
    let s = format!("{addr}");
    if s.len() > 10 {
        format!("{}...{}", &s[..6], &s[s.len() - 4..])
    } else {
        s
    }
}

// ── Token registry ─────────────────────────────────────────────────

/// Resolve a CLI token argument: a 0x address as-is, otherwise a known
/// mainnet symbol.
pub fn resolve_token(input: &str) -> Option<Address> {
    if input.starts_with("0x") {
        return input.parse().ok();
    }
    token_address(input)
}

pub fn token_address(symbol: &str) -> Option<Address> {
    TOKEN_REGISTRY.get(&symbol.to_uppercase()).copied()
}

lazy_static_token_registry! {
    "USDC" => "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
    "USDT" => "0xdAC17F958D2ee523a2206206994597C13D831ec7",
    "DAI" => "0x6B175474E89094C44Da98b954EedeAC495271d0F",
    "WETH" => "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
    "WBTC" => "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599",
    "RGT" => "0xD291E7a03283640FDc51b121aC401383A46cC623",
    "SFI" => "0xb753428af26E81097e7fD17f40c88aaA3E04902c",
}

macro_rules! lazy_static_token_registry {
    ( $( $sym:expr => $addr:expr ),* $(,)? ) => {
        fn build_token_registry() -> HashMap<String, Address> {
            let mut m = HashMap::new();
            $(
                m.insert($sym.to_string(), $addr.parse::<Address>().unwrap());
            )*
            m
        }

        use std::sync::LazyLock;
        static TOKEN_REGISTRY: LazyLock<HashMap<String, Address>> =
            LazyLock::new(|| build_token_registry());
    };
}
use lazy_static_token_registry;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_token_accepts_symbols_and_addresses() {
        let usdc = resolve_token("usdc").unwrap();
        assert_eq!(resolve_token("USDC"), Some(usdc));
        assert_eq!(
            resolve_token("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
            Some(usdc)
        );
        assert_eq!(resolve_token("NOPE"), None);
    }

    #[test]
    fn unit_conversions_roundtrip() {
        let raw = to_token_units(1.5, 6);
        assert_eq!(raw, U256::from(1_500_000u64));
        // Scaling truncates to raw units, so the roundtrip is only
        // accurate to one raw unit.
        let back = from_token_units(to_token_units(123.456, 6), 6);
        assert!((back - 123.456).abs() < 1e-5);
    }

    #[test]
    fn percent_mantissa_scaling() {
        assert_eq!(percent_to_mantissa(50.0), U256::from(500_000_000_000_000_000u128));
    }
}

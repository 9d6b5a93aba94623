use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::chain::Chain;

/// Mainnet pool directory (all pools are registered here).
pub const DEFAULT_POOL_DIRECTORY: &str = "0x835482FE0532f169024d5E9410199369aAD5C77E";
/// Protocol master price oracle, the fallback source when a pool's own
/// oracle cannot price a token.
pub const DEFAULT_MASTER_PRICE_ORACLE: &str = "0x1887118E49e0F4A78Bd71B792a49dE03504A764D";
/// Yield-aggregator fund manager (stable pool).
pub const DEFAULT_FUND_MANAGER: &str = "0xC6BF8C8A55f77686720E0a88e2Fd1fEEF58ddf4a";
/// Tranche pool (epoch-based S/AA/A deposits).
pub const DEFAULT_TRANCHE_POOL: &str = "0xbbDfc1f8B6e73B6751A098574D0172945beD2953";
/// Comptroller implementation new pools are deployed with.
pub const DEFAULT_POOL_IMPLEMENTATION: &str = "0xE16DB319d9dA7Ce40b666DD2E365a4b8B3C18217";

/// On-disk configuration. Every field has a mainnet default so a missing
/// config file still produces a working read-only client.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Chain to talk to.
    pub chain: Chain,

    /// Pool directory contract address.
    pub pool_directory: String,

    /// Master price oracle contract address.
    pub master_price_oracle: String,

    /// Yield-aggregator fund manager contract address.
    pub fund_manager: String,

    /// Tranche pool contract address.
    pub tranche_pool: String,

    /// Comptroller implementation used when deploying new pools.
    pub pool_implementation: String,

    /// HTTP endpoint returning the ETH/USD reference price.
    pub eth_usd_feed: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chain: Chain::ethereum(),
            pool_directory: DEFAULT_POOL_DIRECTORY.to_string(),
            master_price_oracle: DEFAULT_MASTER_PRICE_ORACLE.to_string(),
            fund_manager: DEFAULT_FUND_MANAGER.to_string(),
            tranche_pool: DEFAULT_TRANCHE_POOL.to_string(),
            pool_implementation: DEFAULT_POOL_IMPLEMENTATION.to_string(),
            eth_usd_feed:
                "https://api.coingecko.com/api/v3/simple/price?ids=ethereum&vs_currencies=usd"
                    .to_string(),
        }
    }
}

impl Config {
    /// Load config from an explicit path, the default location, or defaults.
    ///
    /// An explicit path that doesn't exist is an error; a missing default
    /// file just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Config::default()),
            },
        };

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("lend-desk").join("config.json"))
    }

    pub fn rpc_url(&self) -> Result<&str> {
        self.chain
            .rpc_url()
            .with_context(|| format!("chain '{}' has no RPC URL configured", self.chain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_mainnet() {
        let cfg = Config::default();
        assert_eq!(cfg.chain.chain_id(), Some(1));
        assert!(cfg.rpc_url().is_ok());
        assert_eq!(cfg.pool_directory, DEFAULT_POOL_DIRECTORY);
    }

    #[test]
    fn config_roundtrips_through_json() {
        let cfg = Config::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.master_price_oracle, cfg.master_price_oracle);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"pool_directory": "0x0000000000000000000000000000000000000001"}"#).unwrap();
        assert_eq!(cfg.pool_directory, "0x0000000000000000000000000000000000000001");
        assert_eq!(cfg.fund_manager, DEFAULT_FUND_MANAGER);
    }
}

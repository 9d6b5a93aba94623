use alloy::primitives::Address;
use alloy::sol;
use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::evm;

use super::PriceSource;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract IPriceOracle {
        function price(address underlying) external view returns (uint256);
    }
}

/// A deployed price-oracle contract.
pub struct OnchainOracle {
    address: Address,
    rpc_url: String,
    label: String,
}

impl OnchainOracle {
    pub fn new(address: Address, rpc_url: impl Into<String>, label: impl Into<String>) -> Self {
        OnchainOracle {
            address,
            rpc_url: rpc_url.into(),
            label: label.into(),
        }
    }
}

#[async_trait]
impl PriceSource for OnchainOracle {
    async fn price(&self, token: Address) -> Result<f64> {
        let provider = evm::read_provider(&self.rpc_url)?;
        let oracle = IPriceOracle::new(self.address, &provider);
        let raw = oracle
            .price(token)
            .call()
            .await
            .with_context(|| format!("{}.price({token})", self.label))?;
        Ok(evm::u256_to_f64(raw))
    }

    fn label(&self) -> &str {
        &self.label
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A chain specification.
///
/// In JSON, chains are always objects:
/// - Full form: `{"name": "ethereum", "chain_id": 1, "rpc_url": "https://eth.llamarpc.com"}`
/// - Named form: `{"name": "ethereum"}` (chain_id/rpc_url filled from the registry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Chain {
    /// Human-readable chain name (e.g. "ethereum", "sepolia").
    pub name: String,
    /// EVM chain ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// JSON-RPC endpoint URL. Required for any on-chain interaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
}

impl Chain {
    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn rpc_url(&self) -> Option<&str> {
        self.rpc_url.as_deref()
    }

    pub fn ethereum() -> Self {
        Chain {
            name: "ethereum".into(),
            chain_id: Some(1),
            rpc_url: Some("https://eth.llamarpc.com".into()),
        }
    }

    pub fn sepolia() -> Self {
        Chain {
            name: "sepolia".into(),
            chain_id: Some(11155111),
            rpc_url: Some("https://rpc.sepolia.org".into()),
        }
    }

    /// Custom EVM chain with chain_id + rpc_url (used by forked-node tests).
    pub fn custom(name: impl Into<String>, chain_id: u64, rpc_url: impl Into<String>) -> Self {
        Chain {
            name: name.into(),
            chain_id: Some(chain_id),
            rpc_url: Some(rpc_url.into()),
        }
    }

    /// Construct a chain from its name, matching known chains.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "ethereum" | "mainnet" => Self::ethereum(),
            "sepolia" => Self::sepolia(),
            _ => Chain {
                name: name.into(),
                chain_id: None,
                rpc_url: None,
            },
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

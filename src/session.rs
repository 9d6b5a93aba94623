use alloy::primitives::Address;
use anyhow::{Context, Result, bail};

pub const PRIVATE_KEY_ENV: &str = "LEND_DESK_PRIVATE_KEY";

/// Where a session is in its lifecycle: `connect → active → disconnect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No signer; read-only queries only.
    Disconnected,
    /// Signer resolved; transactions may be sent.
    Active { address: Address },
}

/// A wallet session, passed explicitly to whatever needs it.
///
/// Read-only commands build a disconnected session; transaction commands
/// call [`WalletSession::connect_from_env`] and fail up front if no key is
/// configured, instead of failing halfway through a transaction.
pub struct WalletSession {
    rpc_url: String,
    state: SessionState,
    private_key: Option<String>,
    pub dry_run: bool,
}

impl WalletSession {
    /// A session with no signer.
    pub fn read_only(rpc_url: impl Into<String>) -> Self {
        WalletSession {
            rpc_url: rpc_url.into(),
            state: SessionState::Disconnected,
            private_key: None,
            dry_run: false,
        }
    }

    /// Connect using the private key in `LEND_DESK_PRIVATE_KEY`.
    pub fn connect_from_env(rpc_url: impl Into<String>, dry_run: bool) -> Result<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV).map_err(|_| {
            anyhow::anyhow!(
                "{PRIVATE_KEY_ENV} env var not set. \
                 Set it to your hex private key (without 0x prefix)."
            )
        })?;
        Self::connect(rpc_url, private_key, dry_run)
    }

    /// Connect with an explicit key (tests, forked nodes).
    pub fn connect(
        rpc_url: impl Into<String>,
        private_key: String,
        dry_run: bool,
    ) -> Result<Self> {
        use alloy::signers::local::PrivateKeySigner;
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid private key: {e}"))?;
        let address = signer.address();

        Ok(WalletSession {
            rpc_url: rpc_url.into(),
            state: SessionState::Active { address },
            private_key: Some(private_key),
            dry_run,
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The connected address, if any.
    pub fn address(&self) -> Option<Address> {
        match self.state {
            SessionState::Active { address } => Some(address),
            SessionState::Disconnected => None,
        }
    }

    /// Signer material for a transaction; errors unless active.
    pub fn require_active(&self) -> Result<(Address, &str)> {
        match (&self.state, self.private_key.as_deref()) {
            (SessionState::Active { address }, Some(key)) => Ok((*address, key)),
            _ => bail!("wallet not connected — set {PRIVATE_KEY_ENV} and retry"),
        }
    }

    /// Drop the signer and return to the disconnected state.
    pub fn disconnect(&mut self) {
        self.state = SessionState::Disconnected;
        self.private_key = None;
    }
}

/// Resolve the address a read-only command should inspect: an explicit
/// `--address` wins, then the connected wallet.
pub fn resolve_address(explicit: Option<Address>) -> Result<Address> {
    if let Some(addr) = explicit {
        return Ok(addr);
    }
    let key = std::env::var(PRIVATE_KEY_ENV)
        .context("no --address given and no wallet connected (set LEND_DESK_PRIVATE_KEY)")?;
    let signer: alloy::signers::local::PrivateKeySigner = key
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid private key: {e}"))?;
    Ok(signer.address())
}

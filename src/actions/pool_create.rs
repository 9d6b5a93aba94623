use alloy::primitives::Address;
use anyhow::{Context, Result, bail};

use crate::config::Config;
use crate::evm;
use crate::fetch::abi::IPoolDirectory;
use crate::session::WalletSession;

/// Bounds the directory UI has always enforced; checking client-side gives
/// a readable error before any gas is spent.
const CLOSE_FACTOR_RANGE: (f64, f64) = (5.0, 90.0);
const LIQUIDATION_INCENTIVE_RANGE: (f64, f64) = (0.0, 50.0);

pub fn run(
    config: &Config,
    name: &str,
    close_factor: f64,
    liquidation_incentive: f64,
    oracle: Option<Address>,
    whitelist: bool,
    dry_run: bool,
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("pool name must not be empty");
    }
    if close_factor < CLOSE_FACTOR_RANGE.0 || close_factor > CLOSE_FACTOR_RANGE.1 {
        bail!(
            "close factor {close_factor}% outside valid range {}–{}%",
            CLOSE_FACTOR_RANGE.0,
            CLOSE_FACTOR_RANGE.1
        );
    }
    if liquidation_incentive < LIQUIDATION_INCENTIVE_RANGE.0
        || liquidation_incentive > LIQUIDATION_INCENTIVE_RANGE.1
    {
        bail!(
            "liquidation incentive {liquidation_incentive}% outside valid range {}–{}%",
            LIQUIDATION_INCENTIVE_RANGE.0,
            LIQUIDATION_INCENTIVE_RANGE.1
        );
    }

    let rpc_url = config.rpc_url()?.to_string();
    let session = WalletSession::connect_from_env(rpc_url.as_str(), dry_run)?;

    let oracle = match oracle {
        Some(addr) => addr,
        None => config
            .master_price_oracle
            .parse()
            .context("parsing master_price_oracle address")?,
    };
    let implementation: Address = config
        .pool_implementation
        .parse()
        .context("parsing pool_implementation address")?;
    let directory: Address = config
        .pool_directory
        .parse()
        .context("parsing pool_directory address")?;

    let close_factor_mantissa = evm::percent_to_mantissa(close_factor);
    // On-chain the incentive is quoted as 1 + incentive (1.08e18 for 8%).
    let incentive_mantissa = evm::percent_to_mantissa(100.0 + liquidation_incentive);

    println!("  POOL CREATE: '{name}'");
    println!(
        "    close factor {close_factor}%, liquidation incentive {liquidation_incentive}%, \
         oracle {}, whitelist {whitelist}",
        evm::short_addr(&oracle)
    );

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let (_, key) = session.require_active()?;

        if session.dry_run {
            println!("  POOL CREATE: [DRY RUN] would deployPool through the directory");
            return Ok(());
        }

        let provider = evm::make_provider(key, &rpc_url)?;
        let dir = IPoolDirectory::new(directory, &provider);
        let deploy = dir.deployPool(
            name.to_string(),
            implementation,
            whitelist,
            close_factor_mantissa,
            incentive_mantissa,
            oracle,
        );

        let pending = deploy.send().await.context("deployPool failed")?;
        let receipt = pending.get_receipt().await.context("deployPool receipt")?;
        evm::require_success(&receipt, "deployPool")?;
        println!("  POOL CREATE: tx: {:?}", receipt.transaction_hash);
        println!("  POOL CREATE: run `lend-desk pools` to find the new pool's id");
        Ok(())
    })
}

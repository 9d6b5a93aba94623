//! Read-only contract queries returning immutable snapshots.
//!
//! Every command re-fetches what it renders; there is no local cache and no
//! cancellation. A snapshot that is no longer wanted is simply dropped.

pub mod abi;
pub mod account;
pub mod directory;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::model::{PoolEntry, PoolSnapshot};

/// Retry an async operation with exponential backoff.
pub async fn retry<T, F, Fut>(max_retries: u32, f: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..=max_retries {
        match f().await {
            Ok(val) => return Ok(val),
            Err(e) => {
                last_err = Some(e);
                if attempt < max_retries {
                    let delay = std::time::Duration::from_millis(1000 * 2u64.pow(attempt));
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
    Err(last_err.unwrap())
}

pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .user_agent("lend-desk/0.1")
        .build()
        .context("creating HTTP client")
}

/// Snapshot every pool in the directory, with a progress bar; the whole-
/// directory scan is the slow path behind `positions` and `best`.
pub async fn all_pool_snapshots(
    rpc_url: &str,
    entries: &[PoolEntry],
    account: Option<alloy::primitives::Address>,
) -> Result<Vec<PoolSnapshot>> {
    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  scanning pools [{bar:30}] {pos}/{len}")
            .unwrap(),
    );

    let mut snapshots = Vec::with_capacity(entries.len());
    for entry in entries {
        match directory::pool_snapshot(rpc_url, entry, account).await {
            Ok(snap) => snapshots.push(snap),
            Err(e) => {
                // A single broken pool shouldn't take down the whole scan.
                pb.println(format!(
                    "  WARN  pool {} ({}) failed: {e:#}",
                    entry.index, entry.name
                ));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(snapshots)
}

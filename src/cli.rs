use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use alloy::primitives::Address;

/// Terminal dashboard for Compound-style lending pools, the yield
/// aggregator fund, and tranche deposits: reads on-chain state, renders
/// positions and rates, and passes transactions through to the contracts.
#[derive(Parser)]
#[command(name = "lend-desk", version, about)]
pub struct Cli {
    /// Path to the config JSON file (default: ~/.config/lend-desk/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Output the JSON Schema for the config file
    Schema,

    /// List all lending pools in the directory
    Pools {
        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one pool: per-market rates, reward incentives, and balances
    Pool {
        /// Pool index in the directory
        id: u64,

        /// Show balances for this address (default: connected wallet, if any)
        #[arg(long)]
        address: Option<Address>,

        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show your positions across all pools, the vault, and tranches
    Positions {
        /// Address to inspect (default: connected wallet)
        #[arg(long)]
        address: Option<Address>,

        /// Re-fetch and re-render every N seconds until Ctrl-C
        #[arg(long)]
        watch: Option<u64>,

        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Find the best pool for supplying an asset
    Best {
        /// Token symbol or address
        token: String,
    },

    /// Supply an asset to a pool (approve + mint)
    Supply {
        #[command(flatten)]
        pool: MarketArgs,

        /// Token symbol or address
        #[arg(long)]
        asset: String,

        /// Amount in whole underlying units
        #[arg(long)]
        amount: f64,

        /// Preflight reads only, no transaction
        #[arg(long)]
        dry_run: bool,
    },

    /// Withdraw a supplied asset from a pool
    Withdraw {
        #[command(flatten)]
        pool: MarketArgs,

        #[arg(long)]
        asset: String,

        #[arg(long)]
        amount: f64,

        #[arg(long)]
        dry_run: bool,
    },

    /// Borrow an asset against your collateral
    Borrow {
        #[command(flatten)]
        pool: MarketArgs,

        #[arg(long)]
        asset: String,

        #[arg(long)]
        amount: f64,

        #[arg(long)]
        dry_run: bool,
    },

    /// Repay a borrow (approve + repayBorrow)
    Repay {
        #[command(flatten)]
        pool: MarketArgs,

        #[arg(long)]
        asset: String,

        #[arg(long)]
        amount: f64,

        #[arg(long)]
        dry_run: bool,
    },

    /// Enable or disable an asset as collateral (enterMarkets / exitMarket)
    Collateral {
        #[command(flatten)]
        pool: MarketArgs,

        #[arg(long)]
        asset: String,

        /// Exit the market instead of entering it
        #[arg(long)]
        disable: bool,

        #[arg(long)]
        dry_run: bool,
    },

    /// Claim accrued reward-token incentives from a pool's distributors
    Claim {
        #[command(flatten)]
        pool: MarketArgs,

        #[arg(long)]
        dry_run: bool,
    },

    /// Deploy a new pool through the directory
    CreatePool {
        /// Human-readable pool name
        #[arg(long)]
        name: String,

        /// Close factor in percent (5–90)
        #[arg(long, default_value = "50.0")]
        close_factor: f64,

        /// Liquidation incentive in percent (0–50)
        #[arg(long, default_value = "8.0")]
        liquidation_incentive: f64,

        /// Price oracle address (default: the master price oracle)
        #[arg(long)]
        oracle: Option<Address>,

        /// Enforce a supplier/borrower whitelist
        #[arg(long)]
        whitelist: bool,

        #[arg(long)]
        dry_run: bool,
    },

    /// Yield-aggregator fund operations
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },

    /// Tranche-pool operations
    Tranche {
        #[command(subcommand)]
        action: TrancheAction,
    },
}

/// Identifies a pool for transaction subcommands.
#[derive(Args)]
pub struct MarketArgs {
    /// Pool index in the directory
    #[arg(long)]
    pub pool: u64,
}

#[derive(Subcommand)]
pub enum VaultAction {
    /// Deposit into the fund (approve + deposit)
    Deposit {
        /// Currency code understood by the fund (e.g. "USDC")
        #[arg(long)]
        currency: String,

        /// Amount in whole underlying units
        #[arg(long)]
        amount: f64,

        #[arg(long)]
        dry_run: bool,
    },

    /// Withdraw from the fund
    Withdraw {
        #[arg(long)]
        currency: String,

        #[arg(long)]
        amount: f64,

        #[arg(long)]
        dry_run: bool,
    },

    /// Show fund balance and current APY
    Balance {
        /// Address to inspect (default: connected wallet)
        #[arg(long)]
        address: Option<Address>,
    },
}

#[derive(Subcommand)]
pub enum TrancheAction {
    /// Deposit into a tranche of the current epoch
    Deposit {
        /// Tranche rating: S, AA, or A
        #[arg(long)]
        tranche: String,

        /// Amount in whole underlying units
        #[arg(long)]
        amount: f64,

        #[arg(long)]
        dry_run: bool,
    },

    /// Show per-tranche balances
    Balance {
        /// Address to inspect (default: connected wallet)
        #[arg(long)]
        address: Option<Address>,
    },
}

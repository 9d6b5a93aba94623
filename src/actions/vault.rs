use alloy::primitives::Address;
use anyhow::{Context, Result, bail};

use crate::cli::VaultAction;
use crate::config::Config;
use crate::evm;
use crate::fetch::abi::IFundManager;
use crate::fetch::account;
use crate::session::{self, WalletSession};
use crate::view;

pub fn run(config: &Config, action: VaultAction) -> Result<()> {
    match action {
        VaultAction::Deposit {
            currency,
            amount,
            dry_run,
        } => transact(config, &currency, amount, dry_run, Direction::Deposit),
        VaultAction::Withdraw {
            currency,
            amount,
            dry_run,
        } => transact(config, &currency, amount, dry_run, Direction::Withdraw),
        VaultAction::Balance { address } => balance(config, address),
    }
}

enum Direction {
    Deposit,
    Withdraw,
}

fn balance(config: &Config, address: Option<Address>) -> Result<()> {
    let account_addr = session::resolve_address(address)?;
    let rpc_url = config.rpc_url()?.to_string();
    let fund: Address = config
        .fund_manager
        .parse()
        .context("parsing fund_manager address")?;

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        let snap = account::vault_snapshot(&rpc_url, fund, account_addr).await?;
        println!(
            "Vault balance: {} at {} APY ({} APR)",
            view::usd(snap.balance_usd),
            view::percent(snap.apy),
            view::percent(snap.apr),
        );
        Ok(())
    })
}

fn transact(
    config: &Config,
    currency: &str,
    amount: f64,
    dry_run: bool,
    direction: Direction,
) -> Result<()> {
    if amount <= 0.0 {
        bail!("amount must be positive, got {amount}");
    }

    let rpc_url = config.rpc_url()?.to_string();
    let session = WalletSession::connect_from_env(rpc_url.as_str(), dry_run)?;
    let fund: Address = config
        .fund_manager
        .parse()
        .context("parsing fund_manager address")?;
    let token = evm::resolve_token(currency)
        .with_context(|| format!("unknown currency '{currency}'"))?;

    let verb = match direction {
        Direction::Deposit => "DEPOSIT",
        Direction::Withdraw => "WITHDRAW",
    };

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let (wallet, key) = session.require_active()?;

        let rp = evm::read_provider(&rpc_url)?;
        let decimals = evm::IERC20::new(token, &rp)
            .decimals()
            .call()
            .await
            .context("currency decimals")?;
        let units = evm::to_token_units(amount, decimals);

        println!("  VAULT {verb}: {amount} {currency}");

        if let Direction::Deposit = direction {
            super::require_balance(&rp, wallet, token, units, currency).await?;
        } else {
            // Fund balances are USD-denominated; a withdrawal larger than
            // the account's balance will be rejected by the fund anyway,
            // but checking here gives a readable error.
            let snap = account::vault_snapshot(&rpc_url, fund, wallet).await?;
            if snap.balance_usd <= 0.0 {
                bail!("no vault balance to withdraw");
            }
        }

        if session.dry_run {
            println!("  VAULT: preflight OK");
            println!("  VAULT: [DRY RUN] would {} {currency}", verb.to_lowercase());
            return Ok(());
        }

        let provider = evm::make_provider(key, &rpc_url)?;
        let fund_contract = IFundManager::new(fund, &provider);

        match direction {
            Direction::Deposit => {
                super::approve_if_needed(&provider, wallet, token, fund, units, "VAULT").await?;
                let pending = fund_contract
                    .deposit(currency.to_uppercase(), units)
                    .send()
                    .await
                    .context("fund deposit failed")?;
                let receipt = pending.get_receipt().await.context("deposit receipt")?;
                evm::require_success(&receipt, "deposit")?;
                println!("  VAULT: deposit tx: {:?}", receipt.transaction_hash);
            }
            Direction::Withdraw => {
                let pending = fund_contract
                    .withdraw(currency.to_uppercase(), units)
                    .send()
                    .await
                    .context("fund withdraw failed")?;
                let receipt = pending.get_receipt().await.context("withdraw receipt")?;
                evm::require_success(&receipt, "withdraw")?;
                println!("  VAULT: withdraw tx: {:?}", receipt.transaction_hash);
            }
        }
        Ok(())
    })
}

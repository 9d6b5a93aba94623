use clap::Parser;

use lend_desk::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = lend_desk::config::Config::load(cli.config.as_deref())?;

    match cli.command {
        cli::Command::Schema => lend_desk::schema::run(),
        cli::Command::Pools { json } => lend_desk::pools::run_list(&config, json),
        cli::Command::Pool { id, address, json } => {
            lend_desk::pools::run_detail(&config, id, address, json)
        }
        cli::Command::Positions {
            address,
            watch,
            json,
        } => lend_desk::portfolio::run(&config, address, watch, json),
        cli::Command::Best { token } => lend_desk::best::run(&config, &token),
        cli::Command::Supply {
            pool,
            asset,
            amount,
            dry_run,
        } => lend_desk::actions::lending::run_supply(&config, pool, &asset, amount, dry_run),
        cli::Command::Withdraw {
            pool,
            asset,
            amount,
            dry_run,
        } => lend_desk::actions::lending::run_withdraw(&config, pool, &asset, amount, dry_run),
        cli::Command::Borrow {
            pool,
            asset,
            amount,
            dry_run,
        } => lend_desk::actions::lending::run_borrow(&config, pool, &asset, amount, dry_run),
        cli::Command::Repay {
            pool,
            asset,
            amount,
            dry_run,
        } => lend_desk::actions::lending::run_repay(&config, pool, &asset, amount, dry_run),
        cli::Command::Collateral {
            pool,
            asset,
            disable,
            dry_run,
        } => lend_desk::actions::lending::run_collateral(&config, pool, &asset, disable, dry_run),
        cli::Command::Claim { pool, dry_run } => {
            lend_desk::actions::lending::run_claim(&config, pool, dry_run)
        }
        cli::Command::CreatePool {
            name,
            close_factor,
            liquidation_incentive,
            oracle,
            whitelist,
            dry_run,
        } => lend_desk::actions::pool_create::run(
            &config,
            &name,
            close_factor,
            liquidation_incentive,
            oracle,
            whitelist,
            dry_run,
        ),
        cli::Command::Vault { action } => lend_desk::actions::vault::run(&config, action),
        cli::Command::Tranche { action } => lend_desk::actions::tranche::run(&config, action),
    }
}

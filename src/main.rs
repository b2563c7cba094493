#[macro_use]
extern crate log;

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use eyre::{Result, WrapErr, bail};
use std::path::{Path, PathBuf};

use eth_deposit::{
    config::{self, *},
    credentials::{self, WithdrawalScheme},
    helpers::{self, datetime::unix_timestamp, hex},
    logger::Logger,
    merkle, networks,
    validator::{self, BatchRequest, DepositOptions, Verdict},
};

fn main() -> Result<()> {
    // Parse args with clap
    let matches = Cli::command().get_matches();
    let args = Cli::from_arg_matches(&matches)?;

    // Load config file, shellexpand so we can use "~/...", etc
    let config_path = args.expanded_config_path()?;
    let mut config = config::load_args(&matches, config_path)?;
    config.output_dir = expand_path(&config.output_dir)?;

    let logger = Logger::new(config.log_level);
    logger.set_global()?;

    cmd_dispatch(&Cli::command(), &args.command, &config)
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    let path = path.to_string_lossy();
    Ok(PathBuf::from(shellexpand::full(&path)?.as_ref()))
}

fn cmd_dispatch(app: &clap::Command, cmd: &CliCmd, config: &CliArgs) -> Result<()> {
    let opts = DepositOptions {
        diagnostics: config.diagnostics,
    };
    match cmd {
        CliCmd::Version {} => {
            let mut ver = app.render_version();
            ver.pop(); // remove "\n"
            println!("version: {}", ver);
        }
        CliCmd::Generate {
            mnemonic_file,
            mnemonic_password,
            start_index,
            count,
            scheme,
            execution_address,
            eth,
            keystore_password,
            no_keystores,
            yes,
        } => {
            // Fail on bad input before prompting for secrets
            let network = networks::get_network(&config.network).wrap_err_with(|| {
                format!(
                    "supported networks: {}",
                    networks::supported_networks().join(", ")
                )
            })?;
            let scheme = WithdrawalScheme::try_from(*scheme)?;
            let amount_gwei = helpers::eth_to_gwei(*eth)?;

            let mnemonic = match mnemonic_file {
                Some(path) => std::fs::read_to_string(expand_path(path)?)
                    .wrap_err_with(|| format!("{}", path.display()))?,
                None => helpers::reedline::unwrap_or_prompt_for_secret(
                    &None,
                    "Please enter your mnemonic.\n",
                )?,
            };
            let keystore_password = match no_keystores {
                true => None,
                false => Some(helpers::reedline::unwrap_or_prompt_for_password(
                    keystore_password,
                    "Please provide an encryption password for your validator keystores.\n\
                        DO NOT FORGET THIS PASSWORD as it will be the only way to unlock your \
                        validator keys.\n",
                )?),
            };

            info!(
                "{} {} {} {} {} {}",
                "Generating".white().bold(),
                count.to_string().magenta().bold(),
                "deposits of".white().bold(),
                helpers::format_gwei(merkle::checked_amount(amount_gwei)?).yellow(),
                "eth on".white().bold(),
                network.name.green().bold(),
            );
            info!(
                "{} {} {} {}",
                "Deposit contract".white().bold(),
                network.deposit_contract.to_string().yellow(),
                "chain id".white().bold(),
                network.chain_id.to_string().magenta(),
            );
            info!(
                "{} {} {} {}",
                "Withdrawal credentials".white().bold(),
                scheme.to_string().blue(),
                "to".white().bold(),
                execution_address.as_deref().unwrap_or("-").blue(),
            );
            if !yes
                && !helpers::reedline::confirm(
                    format!(
                        "{} {} {}\n",
                        "Please type".green(),
                        "YES".red().bold(),
                        "to confirm, CTRL-C to cancel.".green()
                    )
                    .as_str(),
                    "YES",
                )?
            {
                println!("Aborted");
                return Ok(());
            }

            let request = BatchRequest {
                mnemonic,
                mnemonic_password: mnemonic_password.clone(),
                start_index: *start_index,
                count: *count,
                scheme,
                execution_address: execution_address.clone(),
                amount_gwei,
                network: network.name.to_string(),
            };
            // Nothing is written unless every deposit verified
            let deposits = validator::generate_batch(&request, &opts)?;

            let timestamp = unix_timestamp();
            if let Some(password) = keystore_password {
                for deposit in deposits.iter() {
                    deposit
                        .key
                        .export_keystore(&password, &config.output_dir, timestamp)?;
                }
            }
            let records: Vec<_> = deposits.into_iter().map(|d| d.record).collect();
            let path = helpers::json::write_deposit_data(&config.output_dir, &records, timestamp)?;
            println!(
                "{} {} {}",
                records.len().to_string().magenta().bold(),
                "deposits written to".white().bold(),
                path.display().to_string().green()
            );
        }
        CliCmd::Verify { file } => {
            let records = helpers::json::read_deposit_data(file)?;
            let verdicts = validator::verify_records(&records, &opts)?;
            let mut invalid = 0;
            for (record, verdict) in records.iter().zip(verdicts.iter()) {
                let verdict_str = match verdict {
                    Verdict::Valid => verdict.to_string().green(),
                    Verdict::Invalid => {
                        invalid += 1;
                        verdict.to_string().red().bold()
                    }
                };
                let scheme = WithdrawalScheme::of(&record.withdrawal_credentials)
                    .map(|scheme| scheme.to_string())
                    .unwrap_or("unknown".to_string());
                println!(
                    "{} {} {} {}",
                    hex::to_hex(record.pubkey.as_slice()).blue(),
                    record.network_name.white(),
                    scheme.yellow(),
                    verdict_str
                );
            }
            if invalid > 0 {
                bail!("{} of {} deposits are invalid", invalid, records.len());
            }
        }
        CliCmd::Credentials {
            pubkey,
            scheme,
            execution_address,
        } => {
            let credentials = credentials::build_withdrawal_credentials(
                WithdrawalScheme::try_from(*scheme)?,
                &hex::from_hex(pubkey)?,
                execution_address.as_deref(),
            )?;
            println!(
                "{} {}",
                "withdrawal credentials:".white().bold(),
                hex::to_hex(credentials.as_slice()).blue()
            );
        }
    };
    Ok(())
}

use alloy::primitives::B256;
use colored::*;
use log::*;
use serde_derive::Serialize;
use tree_hash::TreeHash;

use crate::{
    account::ValidatorKey,
    bls,
    credentials::{self, WithdrawalScheme},
    domain,
    error::{DepositError, Result},
    helpers::{depositdata::DepositMessage, hex},
    macros::report_row,
    merkle, networks,
    record::{DEPOSIT_CLI_VERSION, DepositRecord},
};

/// Per call settings for the generator and the verifier
#[derive(Debug, Clone, Copy, Default)]
pub struct DepositOptions {
    /// Log a comparison of every recomputed root, never changes a result
    pub diagnostics: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        *self == Verdict::Valid
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Valid => write!(f, "valid"),
            Verdict::Invalid => write!(f, "invalid"),
        }
    }
}

/// Every value the verifier recomputed next to the stored one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub pubkey: String,
    pub stored_message_root: String,
    pub reference_message_root: String,
    pub manual_message_root: Option<String>,
    pub stored_data_root: String,
    pub reference_data_root: String,
    pub manual_data_root: Option<String>,
    pub signing_root: String,
    pub signature_valid: bool,
}

impl VerificationReport {
    pub fn reference_message_root_matches(&self) -> bool {
        self.reference_message_root == self.stored_message_root
    }

    pub fn reference_data_root_matches(&self) -> bool {
        self.reference_data_root == self.stored_data_root
    }

    pub fn manual_data_root_matches(&self) -> bool {
        self.manual_data_root.as_ref() == Some(&self.stored_data_root)
    }

    pub fn manual_message_root_matches(&self) -> bool {
        self.manual_message_root.as_ref() == Some(&self.stored_message_root)
    }

    /// The manual message root is informational only
    pub fn verdict(&self) -> Verdict {
        match self.reference_message_root_matches()
            && self.reference_data_root_matches()
            && self.manual_data_root_matches()
            && self.signature_valid
        {
            true => Verdict::Valid,
            false => Verdict::Invalid,
        }
    }

    pub fn print(&self) {
        const ALIGN: usize = 24;
        let or_missing = |root: &Option<String>| root.clone().unwrap_or("<error>".to_string());
        info!("{} {}", "Deposit".white().bold(), self.pubkey.blue());
        info!("{}", report_row!(ALIGN, "stored message root", self.stored_message_root, true));
        info!(
            "{}",
            report_row!(
                ALIGN,
                "tree_hash message root",
                self.reference_message_root,
                self.reference_message_root_matches()
            )
        );
        info!(
            "{}",
            report_row!(
                ALIGN,
                "manual message root",
                or_missing(&self.manual_message_root),
                self.manual_message_root_matches()
            )
        );
        info!("{}", report_row!(ALIGN, "stored data root", self.stored_data_root, true));
        info!(
            "{}",
            report_row!(
                ALIGN,
                "tree_hash data root",
                self.reference_data_root,
                self.reference_data_root_matches()
            )
        );
        info!(
            "{}",
            report_row!(
                ALIGN,
                "manual data root",
                or_missing(&self.manual_data_root),
                self.manual_data_root_matches()
            )
        );
        info!("{}", report_row!(ALIGN, "signing root", self.signing_root, true));
        info!(
            "{}",
            report_row!(ALIGN, "signature", self.signature_valid, self.signature_valid)
        );
        match serde_json::to_string_pretty(self) {
            Ok(json) => debug!("{}", json),
            Err(e) => warn!("report serialization failed: {}", e),
        }
    }
}

/// Signs a deposit message for `key` and packs it into a record. Roots come
/// from `tree_hash`, the manual engine only takes part in diagnostics.
pub fn generate_deposit(
    key: &ValidatorKey,
    withdrawal_credentials: B256,
    amount: u128,
    network: &str,
    opts: &DepositOptions,
) -> Result<DepositRecord> {
    let network = networks::get_network(network)?;
    let amount = merkle::checked_amount(amount)?;

    let message = DepositMessage {
        pubkey: key.pubkey,
        withdrawal_credentials,
        amount,
    };
    let signing_root = domain::compute_signing_root(&message, network.deposit_domain());
    trace!("signing root: {}", hex::to_hex(signing_root.as_slice()));

    let signature = bls::sign(key.secret(), signing_root.as_slice());
    let data = message.with_signature(signature);

    let record = DepositRecord {
        pubkey: data.pubkey,
        withdrawal_credentials: data.withdrawal_credentials,
        amount: data.amount,
        signature: data.signature,
        deposit_message_root: message.tree_hash_root(),
        deposit_data_root: data.tree_hash_root(),
        network_name: network.name.to_string(),
        deposit_cli_version: DEPOSIT_CLI_VERSION.to_string(),
    };
    debug!(
        "Deposit {} [{}] data root: {}",
        hex::to_hex(record.pubkey.as_slice()).blue(),
        key.path,
        hex::to_hex(record.deposit_data_root.as_slice()).green()
    );

    if opts.diagnostics {
        inspect_deposit(&record, network.deposit_domain()).print();
    }
    Ok(record)
}

/// Recomputes everything the record claims, see [`VerificationReport::verdict`]
pub fn inspect_deposit(record: &DepositRecord, domain: B256) -> VerificationReport {
    let message = record.message();
    let data = record.data();

    let manual_message_root = merkle::deposit_message_root(
        record.pubkey.as_slice(),
        record.withdrawal_credentials.as_slice(),
        record.amount as u128,
    );
    let manual_data_root = merkle::deposit_data_root(
        record.pubkey.as_slice(),
        record.withdrawal_credentials.as_slice(),
        record.amount as u128,
        record.signature.as_slice(),
    );
    let signing_root = domain::compute_signing_root(&message, domain);
    let signature_valid = bls::verify(
        record.pubkey.as_slice(),
        record.signature.as_slice(),
        signing_root.as_slice(),
    );

    let encode = |root: B256| hex::to_hex(root.as_slice());
    VerificationReport {
        pubkey: hex::to_hex(record.pubkey.as_slice()),
        stored_message_root: encode(record.deposit_message_root),
        reference_message_root: encode(message.tree_hash_root()),
        manual_message_root: manual_message_root.ok().map(encode),
        stored_data_root: encode(record.deposit_data_root),
        reference_data_root: encode(data.tree_hash_root()),
        manual_data_root: manual_data_root.ok().map(encode),
        signing_root: encode(signing_root),
        signature_valid,
    }
}

pub fn verify_deposit(record: &DepositRecord, domain: B256, opts: &DepositOptions) -> Verdict {
    let report = inspect_deposit(record, domain);
    if opts.diagnostics {
        report.print();
    }
    report.verdict()
}

/// Verifies each record against the deposit domain of its own network
pub fn verify_records(records: &[DepositRecord], opts: &DepositOptions) -> Result<Vec<Verdict>> {
    records
        .iter()
        .map(|record| {
            let network = networks::get_network(&record.network_name)?;
            Ok(verify_deposit(record, network.deposit_domain(), opts))
        })
        .collect()
}

/// Input for a run over consecutive validator indices
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub mnemonic: String,
    pub mnemonic_password: Option<String>,
    pub start_index: u32,
    pub count: u32,
    pub scheme: WithdrawalScheme,
    pub execution_address: Option<String>,
    pub amount_gwei: u128,
    pub network: String,
}

#[derive(Debug)]
pub struct GeneratedDeposit {
    pub key: ValidatorKey,
    pub record: DepositRecord,
}

/// Derives, signs and self-verifies each index in order, the first failure
/// aborts the whole batch
pub fn generate_batch(request: &BatchRequest, opts: &DepositOptions) -> Result<Vec<GeneratedDeposit>> {
    let network = networks::get_network(&request.network)?;
    let end = request
        .start_index
        .checked_add(request.count)
        .ok_or(DepositError::IndexOverflow {
            start: request.start_index,
            count: request.count,
        })?;

    let mut deposits = Vec::new();
    for index in request.start_index..end {
        let key = ValidatorKey::from_mnemonic(
            &request.mnemonic,
            request.mnemonic_password.as_deref(),
            index,
        )?;
        let withdrawal_credentials = credentials::build_withdrawal_credentials(
            request.scheme,
            key.pubkey.as_slice(),
            request.execution_address.as_deref(),
        )?;
        let record = generate_deposit(
            &key,
            withdrawal_credentials,
            request.amount_gwei,
            network.name,
            opts,
        )?;

        if !verify_deposit(&record, network.deposit_domain(), opts).is_valid() {
            return Err(DepositError::CollaboratorFailure {
                context: "deposit self verification",
                reason: format!("validator {} produced an invalid record", key.path),
            });
        }
        info!(
            "{} {} {}",
            format!("[{}]", index).green().bold(),
            hex::to_hex(key.pubkey.as_slice()).blue(),
            "verified".green()
        );
        deposits.push(GeneratedDeposit { key, record });
    }
    Ok(deposits)
}

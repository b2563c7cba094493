use alloy::primitives::{B256, FixedBytes};
use serde_derive::{Deserialize, Serialize};

use crate::helpers::depositdata::{DepositData, DepositMessage};

/// Generator tag written to every record
pub const DEPOSIT_CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A signed deposit as written to `deposit_data-*.json`, field order is
/// the canonical one expected by the launchpad
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    #[serde(with = "crate::helpers::hex::unprefixed")]
    pub pubkey: FixedBytes<48>,
    #[serde(with = "crate::helpers::hex::unprefixed")]
    pub withdrawal_credentials: B256,
    /// Amount in gwei
    #[serde(with = "serde_utils::quoted_u64")]
    pub amount: u64,
    #[serde(with = "crate::helpers::hex::unprefixed")]
    pub signature: FixedBytes<96>,
    #[serde(with = "crate::helpers::hex::unprefixed")]
    pub deposit_message_root: B256,
    #[serde(with = "crate::helpers::hex::unprefixed")]
    pub deposit_data_root: B256,
    pub network_name: String,
    pub deposit_cli_version: String,
}

impl DepositRecord {
    pub fn message(&self) -> DepositMessage {
        DepositMessage {
            pubkey: self.pubkey,
            withdrawal_credentials: self.withdrawal_credentials,
            amount: self.amount,
        }
    }

    pub fn data(&self) -> DepositData {
        self.message().with_signature(self.signature)
    }
}

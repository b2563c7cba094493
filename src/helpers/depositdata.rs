use alloy::primitives::{B256, FixedBytes, aliases::B32};

/// The signed part of a deposit
#[derive(Debug, Clone, PartialEq, Eq, tree_hash_derive::TreeHash)]
pub struct DepositMessage {
    /// Validator public key
    pub pubkey: FixedBytes<48>,
    /// Withdrawal credentials
    pub withdrawal_credentials: B256,
    /// Amount of ether deposited in gwei
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, tree_hash_derive::TreeHash)]
pub struct DepositData {
    /// Validator public key
    pub pubkey: FixedBytes<48>,
    /// Withdrawal credentials
    pub withdrawal_credentials: B256,
    /// Amount of ether deposited in gwei
    pub amount: u64,
    /// Deposit signature
    pub signature: FixedBytes<96>,
}

impl DepositMessage {
    pub fn with_signature(&self, signature: FixedBytes<96>) -> DepositData {
        DepositData {
            pubkey: self.pubkey,
            withdrawal_credentials: self.withdrawal_credentials,
            amount: self.amount,
            signature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, tree_hash_derive::TreeHash)]
pub struct ForkData {
    pub current_version: B32,
    pub genesis_validators_root: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, tree_hash_derive::TreeHash)]
pub struct SigningData {
    pub object_root: B256,
    pub domain: B256,
}

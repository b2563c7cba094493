use alloy::primitives::{B256, aliases::B32, fixed_bytes};
use tree_hash::TreeHash;

use crate::helpers::depositdata::{ForkData, SigningData};

pub const DOMAIN_DEPOSIT: B32 = fixed_bytes!("0x03000000");

pub fn compute_fork_data_root(current_version: B32, genesis_validators_root: B256) -> B256 {
    ForkData {
        current_version,
        genesis_validators_root,
    }
    .tree_hash_root()
}

/// `domain_type || fork_data_root[..28]`
pub fn compute_domain(
    domain_type: B32,
    fork_version: B32,
    genesis_validators_root: B256,
) -> B256 {
    let fork_data_root = compute_fork_data_root(fork_version, genesis_validators_root);
    let mut domain = [0u8; 32];
    domain[..4].copy_from_slice(domain_type.as_slice());
    domain[4..].copy_from_slice(&fork_data_root[..28]);
    B256::from(domain)
}

pub fn compute_deposit_domain(fork_version: B32) -> B256 {
    compute_domain(DOMAIN_DEPOSIT, fork_version, B256::ZERO)
}

pub fn compute_signing_root<T: TreeHash>(object: &T, domain: B256) -> B256 {
    SigningData {
        object_root: object.tree_hash_root(),
        domain,
    }
    .tree_hash_root()
}

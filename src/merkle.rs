//! Hand rolled SSZ merkleization of `DepositMessage` and `DepositData`.
//!
//! Only SHA-256 over 32 byte chunks is used here, nothing from `tree_hash`,
//! so the roots computed below can be used to cross-check the ones returned
//! by the library.

use alloy::primitives::B256;
use sha2::{Digest, Sha256};

use crate::{
    error::{DepositError, Result},
    helpers::hex,
};

pub const BYTES_PER_CHUNK: usize = 32;

pub type Chunk = [u8; BYTES_PER_CHUNK];

const ZERO_CHUNK: Chunk = [0u8; BYTES_PER_CHUNK];

pub fn hash_pair(left: &Chunk, right: &Chunk) -> Chunk {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Zero pads `bytes` to a multiple of 32 and splits it into chunks
pub fn pack(bytes: &[u8]) -> Vec<Chunk> {
    bytes
        .chunks(BYTES_PER_CHUNK)
        .map(|piece| {
            let mut chunk = ZERO_CHUNK;
            chunk[..piece.len()].copy_from_slice(piece);
            chunk
        })
        .collect()
}

/// Folds chunks pairwise until a single root remains. An odd level is padded
/// with the root of an all zero subtree of that level's height (the zero
/// chunk itself at the leaf level).
pub fn merkleize(chunks: &[Chunk]) -> Chunk {
    if chunks.is_empty() {
        return ZERO_CHUNK;
    }
    let mut level: Vec<Chunk> = chunks.to_vec();
    let mut zero_subtree = ZERO_CHUNK;
    while level.len() > 1 {
        if level.len() % 2 == 1 {
            level.push(zero_subtree);
        }
        level = level
            .chunks(2)
            .map(|pair| hash_pair(&pair[0], &pair[1]))
            .collect();
        zero_subtree = hash_pair(&zero_subtree, &zero_subtree);
    }
    level[0]
}

/// `SHA256(pubkey || 16 zero bytes)`
pub fn pubkey_leaf(pubkey: &[u8]) -> Result<Chunk> {
    let pubkey = hex::fixed::<48>(pubkey, "pubkey")?;
    Ok(merkleize(&pack(&pubkey)))
}

/// Already a single chunk, used as is
pub fn withdrawal_credentials_leaf(withdrawal_credentials: &[u8]) -> Result<Chunk> {
    hex::fixed::<32>(withdrawal_credentials, "withdrawal_credentials")
}

/// Little endian u64 followed by 24 zero bytes
pub fn amount_leaf(amount: u128) -> Result<Chunk> {
    let amount = checked_amount(amount)?;
    let mut chunk = ZERO_CHUNK;
    chunk[..8].copy_from_slice(&amount.to_le_bytes());
    Ok(chunk)
}

/// Splits the signature into `[0..64]` and `[64..96]`, hashes both halves
/// (the latter zero padded) and then the pair
pub fn signature_root(signature: &[u8]) -> Result<Chunk> {
    let signature = hex::fixed::<96>(signature, "signature")?;
    Ok(merkleize(&pack(&signature)))
}

pub fn checked_amount(amount: u128) -> Result<u64> {
    u64::try_from(amount).map_err(|_| DepositError::InvalidLength {
        field: "amount",
        expected: 8,
        actual: (u128::BITS - amount.leading_zeros()).div_ceil(8) as usize,
    })
}

/// Root of the three field `DepositMessage` container
pub fn deposit_message_root(
    pubkey: &[u8],
    withdrawal_credentials: &[u8],
    amount: u128,
) -> Result<B256> {
    let leaves = [
        pubkey_leaf(pubkey)?,
        withdrawal_credentials_leaf(withdrawal_credentials)?,
        amount_leaf(amount)?,
    ];
    Ok(B256::from(merkleize(&leaves)))
}

/// Root of the four field `DepositData` container, a perfect depth 2 tree
pub fn deposit_data_root(
    pubkey: &[u8],
    withdrawal_credentials: &[u8],
    amount: u128,
    signature: &[u8],
) -> Result<B256> {
    let left = hash_pair(
        &pubkey_leaf(pubkey)?,
        &withdrawal_credentials_leaf(withdrawal_credentials)?,
    );
    let right = hash_pair(&amount_leaf(amount)?, &signature_root(signature)?);
    Ok(B256::from(hash_pair(&left, &right)))
}

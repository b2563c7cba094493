use alloy::primitives::B256;
use sha2::{Digest, Sha256};

use crate::{
    error::{DepositError, Result},
    helpers::hex,
};

pub const BLS_WITHDRAWAL_PREFIX: u8 = 0x00;
pub const ETH1_ADDRESS_WITHDRAWAL_PREFIX: u8 = 0x01;
pub const COMPOUNDING_WITHDRAWAL_PREFIX: u8 = 0x02;

/// Withdrawal credential type, the discriminant is the credential prefix byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WithdrawalScheme {
    Bls = BLS_WITHDRAWAL_PREFIX,
    Execution = ETH1_ADDRESS_WITHDRAWAL_PREFIX,
    Compounding = COMPOUNDING_WITHDRAWAL_PREFIX,
}

impl TryFrom<u8> for WithdrawalScheme {
    type Error = DepositError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            BLS_WITHDRAWAL_PREFIX => Ok(WithdrawalScheme::Bls),
            ETH1_ADDRESS_WITHDRAWAL_PREFIX => Ok(WithdrawalScheme::Execution),
            COMPOUNDING_WITHDRAWAL_PREFIX => Ok(WithdrawalScheme::Compounding),
            other => Err(DepositError::UnsupportedScheme(other)),
        }
    }
}

impl WithdrawalScheme {
    pub fn prefix(&self) -> u8 {
        *self as u8
    }

    /// Reads the scheme back from encoded credentials
    pub fn of(credentials: &B256) -> Result<Self> {
        WithdrawalScheme::try_from(credentials[0])
    }
}

impl std::fmt::Display for WithdrawalScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WithdrawalScheme::Bls => write!(f, "0x00 (bls)"),
            WithdrawalScheme::Execution => write!(f, "0x01 (execution)"),
            WithdrawalScheme::Compounding => write!(f, "0x02 (compounding)"),
        }
    }
}

/// Parses `0x` followed by exactly 40 hex characters
pub fn parse_execution_address(address: &str) -> Result<[u8; 20]> {
    let invalid = || DepositError::InvalidAddress(address.to_string());
    let digits = address.strip_prefix("0x").ok_or_else(invalid)?;
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    hex::fixed::<20>(&hex::from_hex(digits)?, "execution address")
}

pub fn build_withdrawal_credentials(
    scheme: WithdrawalScheme,
    pubkey: &[u8],
    address: Option<&str>,
) -> Result<B256> {
    let pubkey = hex::fixed::<48>(pubkey, "pubkey")?;
    let mut credentials = [0u8; 32];
    credentials[0] = scheme.prefix();
    match scheme {
        WithdrawalScheme::Bls => {
            let digest = Sha256::digest(pubkey);
            credentials[1..].copy_from_slice(&digest[1..]);
        }
        WithdrawalScheme::Execution | WithdrawalScheme::Compounding => {
            let address = address.ok_or(DepositError::MissingAddress(scheme.prefix()))?;
            credentials[12..].copy_from_slice(&parse_execution_address(address)?);
        }
    }
    Ok(B256::from(credentials))
}

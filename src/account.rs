use alloy::{
    primitives::FixedBytes,
    signers::local::coins_bip39::{English, Mnemonic},
};
use blst::min_pk::SecretKey;
use colored::*;
use log::*;
use std::path::{Path, PathBuf};

use crate::{
    bls,
    error::{DepositError, Result},
    helpers::{self, hex},
};

/// EIP-2334 purpose and coin type for validator keys
pub const PURPOSE: u32 = 12381;
pub const COIN_TYPE: u32 = 3600;

pub fn signing_key_path(index: u32) -> String {
    format!("m/{}/{}/{}/0/0", PURPOSE, COIN_TYPE, index)
}

/// BLS validator signing key and its compressed public key
pub struct ValidatorKey {
    pub index: u32,
    pub path: String,
    pub pubkey: FixedBytes<48>,
    secret: SecretKey,
}

// Never print the secret
impl std::fmt::Debug for ValidatorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorKey")
            .field("index", &self.index)
            .field("path", &self.path)
            .field("pubkey", &hex::to_hex(self.pubkey.as_slice()))
            .finish_non_exhaustive()
    }
}

impl ValidatorKey {
    pub fn new(index: u32, secret: SecretKey) -> Self {
        ValidatorKey {
            index,
            path: signing_key_path(index),
            pubkey: bls::public_key_from_secret(&secret),
            secret,
        }
    }

    pub fn from_secret_bytes(bytes: &[u8], index: u32) -> Result<Self> {
        Ok(ValidatorKey::new(index, bls::secret_key_from_bytes(bytes)?))
    }

    /// Derives the signing key at `m/12381/3600/{index}/0/0`
    pub fn from_mnemonic(phrase: &str, password: Option<&str>, index: u32) -> Result<Self> {
        debug!("Using derivation path {}", signing_key_path(index));
        let mnemonic = Mnemonic::<English>::new_from_phrase(phrase.trim())
            .map_err(|e| DepositError::collaborator("mnemonic parsing", e))?;
        let seed = mnemonic
            .to_seed(password)
            .map_err(|e| DepositError::collaborator("mnemonic seed", e))?;
        let master = SecretKey::derive_master_eip2333(&seed)
            .map_err(|e| DepositError::collaborator("EIP-2333 master key derivation", e))?;
        let secret = master
            .derive_child_eip2333(PURPOSE)
            .derive_child_eip2333(COIN_TYPE)
            .derive_child_eip2333(index)
            .derive_child_eip2333(0)
            .derive_child_eip2333(0);
        let key = ValidatorKey::new(index, secret);
        debug!("pubkey: {}", hex::to_hex(key.pubkey.as_slice()));
        Ok(key)
    }

    pub fn secret(&self) -> &SecretKey {
        &self.secret
    }

    pub fn keystore_filename(&self, timestamp: u64) -> String {
        format!("keystore-{}-{}.json", self.path.replace('/', "_"), timestamp)
    }

    /// Writes an EIP-2335 keystore for this key into `dir`
    pub fn export_keystore(&self, password: &str, dir: &Path, timestamp: u64) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|e| DepositError::collaborator("keystore dir", e))?;

        let filename = self.keystore_filename(timestamp);
        let mut rng = rand::thread_rng();
        let uuid = eth_keystore::v4::encrypt_key(
            dir,
            &mut rng,
            self.secret.to_bytes(),
            password,
            Some(filename.as_str()),
        )
        .map_err(|e| DepositError::collaborator("keystore encryption", e))?;

        let keypath = dir.join(&filename);
        // The deposit cli format carries the pubkey and path in the clear
        helpers::json::update(
            &keypath,
            vec![
                ("pubkey", hex::to_hex(self.pubkey.as_slice())),
                ("path", self.path.clone()),
            ],
        )
        .map_err(|e| DepositError::collaborator("keystore update", e))?;

        info!(
            "{} {} ({}): {}",
            "Keystore".white().bold(),
            uuid.blue(),
            self.path.yellow(),
            keypath.display().to_string().green(),
        );
        Ok(keypath)
    }
}

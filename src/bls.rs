use alloy::primitives::FixedBytes;
use blst::{
    BLST_ERROR,
    min_pk::{PublicKey, SecretKey, Signature},
};

use crate::error::{DepositError, Result};

/// Proof of possession ciphersuite used by the beacon chain
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

pub fn secret_key_from_bytes(bytes: &[u8]) -> Result<SecretKey> {
    SecretKey::from_bytes(bytes).map_err(|e| DepositError::collaborator("BLS secret key decoding", e))
}

pub fn public_key_from_secret(secret: &SecretKey) -> FixedBytes<48> {
    FixedBytes::from(secret.sk_to_pk().compress())
}

pub fn sign(secret: &SecretKey, message: &[u8]) -> FixedBytes<96> {
    FixedBytes::from(secret.sign(message, DST, &[]).compress())
}

/// Undecodable keys or signatures simply fail verification
pub fn verify(pubkey: &[u8], signature: &[u8], message: &[u8]) -> bool {
    let Ok(pubkey) = PublicKey::key_validate(pubkey) else {
        return false;
    };
    let Ok(signature) = Signature::from_bytes(signature) else {
        return false;
    };
    signature.verify(true, message, DST, &[], &pubkey, false) == BLST_ERROR::BLST_SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_secret() -> SecretKey {
        SecretKey::key_gen(&[7u8; 32], &[]).unwrap()
    }

    #[test]
    fn sign_and_verify() {
        let sk = test_secret();
        let pk = public_key_from_secret(&sk);
        let sig = sign(&sk, b"deposit");
        assert!(verify(pk.as_slice(), sig.as_slice(), b"deposit"));
        assert!(!verify(pk.as_slice(), sig.as_slice(), b"withdrawal"));
    }

    #[test]
    fn signatures_are_deterministic() {
        let sk = test_secret();
        assert_eq!(sign(&sk, b"root"), sign(&sk, b"root"));
    }

    #[test]
    fn garbage_fails_verification() {
        let sk = test_secret();
        let pk = public_key_from_secret(&sk);
        let sig = sign(&sk, b"root");
        assert!(!verify(&[0u8; 48], sig.as_slice(), b"root"));
        assert!(!verify(pk.as_slice(), &[0xffu8; 96], b"root"));
        assert!(!verify(&pk[..47], sig.as_slice(), b"root"));
    }

    #[test]
    fn secret_round_trip() {
        let sk = test_secret();
        let decoded = secret_key_from_bytes(&sk.to_bytes()).unwrap();
        assert_eq!(public_key_from_secret(&decoded), public_key_from_secret(&sk));
        assert!(matches!(
            secret_key_from_bytes(&[0u8; 31]),
            Err(DepositError::CollaboratorFailure { .. })
        ));
    }
}

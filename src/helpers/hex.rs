use alloy::primitives::hex;

use crate::error::{DepositError, Result};

/// Lowercase hex, no `0x` prefix
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex text with or without the `0x` prefix, odd length input
/// is treated as if it had a leading zero nibble
pub fn from_hex(text: &str) -> Result<Vec<u8>> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    // `hex::decode` would silently strip a second prefix
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DepositError::MalformedHex(text.to_string()));
    }
    let decoded = match digits.len() % 2 {
        0 => hex::decode(digits),
        _ => hex::decode(format!("0{}", digits)),
    };
    decoded.map_err(|_| DepositError::MalformedHex(text.to_string()))
}

/// Converts a slice into a fixed size array, `field` names the value in the error
pub fn fixed<const N: usize>(bytes: &[u8], field: &'static str) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| DepositError::InvalidLength {
        field,
        expected: N,
        actual: bytes.len(),
    })
}

/// Serde adapter for `FixedBytes<N>` record fields, stored as unprefixed hex
pub mod unprefixed {
    use alloy::primitives::FixedBytes;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S, const N: usize>(
        value: &FixedBytes<N>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_hex(value.as_slice()))
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<FixedBytes<N>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let bytes = super::from_hex(&text).map_err(D::Error::custom)?;
        let array = super::fixed::<N>(&bytes, "hex field").map_err(D::Error::custom)?;
        Ok(FixedBytes::from(array))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_lowercase_without_prefix() {
        assert_eq!(to_hex(&[0xde, 0xad, 0xBE, 0xef, 0x00]), "deadbeef00");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn decodes_with_and_without_prefix() {
        assert_eq!(from_hex("0xdeadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(from_hex("DEADbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn odd_length_is_left_padded() {
        assert_eq!(from_hex("abc").unwrap(), vec![0x0a, 0xbc]);
        assert_eq!(from_hex("0x1").unwrap(), vec![0x01]);
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(from_hex("").unwrap().is_empty());
        assert!(from_hex("0x").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_hex() {
        assert_eq!(
            from_hex("0xzz"),
            Err(DepositError::MalformedHex("0xzz".to_string()))
        );
        assert!(matches!(from_hex("12 4"), Err(DepositError::MalformedHex(_))));
        assert_eq!(
            from_hex("0x0xab"),
            Err(DepositError::MalformedHex("0x0xab".to_string()))
        );
        assert!(matches!(from_hex("0x0x"), Err(DepositError::MalformedHex(_))));
    }

    #[test]
    fn hex_round_trip() {
        let bytes: Vec<u8> = (0..=255u8).collect();
        assert_eq!(from_hex(&to_hex(&bytes)).unwrap(), bytes);
        assert_eq!(from_hex(&to_hex(&[0x00, 0x01])).unwrap(), vec![0x00, 0x01]);
    }

    #[test]
    fn fixed_reports_length() {
        assert_eq!(fixed::<2>(&[1, 2], "x").unwrap(), [1, 2]);
        assert_eq!(
            fixed::<4>(&[1, 2], "pubkey"),
            Err(DepositError::InvalidLength {
                field: "pubkey",
                expected: 4,
                actual: 2
            })
        );
    }
}

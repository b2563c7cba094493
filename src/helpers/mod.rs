pub mod datetime;
pub mod depositdata;
pub mod hex;
pub mod json;
pub mod reedline;

use alloy::primitives::{
    U256,
    utils::{Unit, format_units, parse_ether},
};
use eyre::{Result, eyre};

/// Fractional eth amount to gwei
pub fn eth_to_gwei(amount: f64) -> Result<u128> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(eyre!("invalid eth amount {}", amount));
    }
    let gwei: U256 = parse_ether(&amount.to_string())? / Unit::GWEI.wei();
    u128::try_from(gwei).map_err(|_| eyre!("amount {} eth is out of range", amount))
}

/// Gwei amount as eth, truncated to 9 decimals
pub fn format_gwei(amount: u64) -> String {
    let eth_str = format_units(amount, "gwei").unwrap_or_else(|_| amount.to_string());
    match eth_str.split_once('.') {
        Some((whole, fractional)) => {
            let fractional = fractional.trim_end_matches('0');
            match fractional.len() {
                0 => whole.to_string(),
                _ => format!("{}.{:.9}", whole, fractional),
            }
        }
        None => eth_str,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eth_conversion() {
        assert_eq!(eth_to_gwei(32.0).unwrap(), 32_000_000_000);
        assert_eq!(eth_to_gwei(1.5).unwrap(), 1_500_000_000);
        assert!(eth_to_gwei(-1.0).is_err());
        assert!(eth_to_gwei(f64::NAN).is_err());
    }

    #[test]
    fn gwei_formatting() {
        assert_eq!(format_gwei(32_000_000_000), "32");
        assert_eq!(format_gwei(1_500_000_000), "1.5");
        assert_eq!(format_gwei(1), "0.000000001");
    }
}

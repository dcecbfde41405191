//! Token ID parsing.
//!
//! The NFT API reports token IDs as hex strings (usually zero padded to
//! 32 bytes), so IDs are carried as [`BigUint`] rather than a machine word.

use anyhow::{anyhow, Result};
use num::{BigUint, Num};

fn strip_hex_prefix(raw: &str) -> Option<&str> {
    raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X"))
}

fn parse_radix(digits: &str, radix: u32, raw: &str) -> Result<BigUint> {
    let valid = match radix {
        16 => digits.chars().all(|c| c.is_ascii_hexdigit()),
        _ => digits.chars().all(|c| c.is_ascii_digit()),
    };
    if digits.is_empty() || !valid {
        return Err(anyhow!("invalid token id {raw:?}"));
    }
    BigUint::from_str_radix(digits, radix).map_err(|e| anyhow!("invalid token id {raw:?}: {e}"))
}

/// Parse a token ID as reported by the API: base 16, `0x` prefix optional.
pub fn parse_hex(raw: &str) -> Result<BigUint> {
    let trimmed = raw.trim();
    let digits = strip_hex_prefix(trimmed).unwrap_or(trimmed);
    parse_radix(digits, 16, raw)
}

/// Parse a user-supplied token ID: decimal, or hex when `0x`-prefixed.
pub fn parse_arg(raw: &str) -> Result<BigUint> {
    let trimmed = raw.trim();
    match strip_hex_prefix(trimmed) {
        Some(digits) => parse_radix(digits, 16, raw),
        None => parse_radix(trimmed, 10, raw),
    }
}

pub fn to_hex(id: &BigUint) -> String {
    format!("0x{}", id.to_str_radix(16))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_matches_base16() {
        assert_eq!(parse_hex("0x5").unwrap(), BigUint::from(5u64));
        assert_eq!(parse_hex("0x14").unwrap(), BigUint::from(20u64));
        assert_ne!(parse_hex("0x14").unwrap(), BigUint::from(5u64));
        assert_eq!(parse_hex("ff").unwrap(), BigUint::from(255u64));
        assert_eq!(parse_hex("0XA").unwrap(), BigUint::from(10u64));
    }

    #[test]
    fn test_parse_hex_full_width() {
        let padded = format!("0x{}", "0".repeat(63) + "5");
        assert_eq!(parse_hex(&padded).unwrap(), BigUint::from(5u64));

        let max = format!("0x{}", "f".repeat(64));
        let parsed = parse_hex(&max).unwrap();
        assert_eq!(parsed.bits(), 256);
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("").is_err());
        assert!(parse_hex("0x").is_err());
        assert!(parse_hex("0xzz").is_err());
        assert!(parse_hex("-0x5").is_err());
        assert!(parse_hex("0x_5").is_err());
    }

    #[test]
    fn test_parse_arg_decimal_and_hex() {
        assert_eq!(parse_arg("5").unwrap(), BigUint::from(5u64));
        assert_eq!(parse_arg("20").unwrap(), BigUint::from(20u64));
        assert_eq!(parse_arg("0x14").unwrap(), BigUint::from(20u64));
        assert!(parse_arg("abc").is_err());
        assert!(parse_arg("").is_err());
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(&BigUint::from(5u64)), "0x5");
        assert_eq!(to_hex(&BigUint::from(255u64)), "0xff");
    }
}

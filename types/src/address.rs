//! 20-byte account / contract address.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// An EVM account or contract address.
///
/// Equality is byte-wise, so checksummed and lowercase spellings of the same
/// address compare equal. `Display` renders lowercase `0x`-prefixed hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parse a `0x`-prefixed, 40-digit hex address (any letter case).
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(|| TypesError::InvalidAddress(format!("missing 0x prefix: {raw}")))?;
        if digits.len() != 40 {
            return Err(TypesError::InvalidAddress(format!(
                "expected 40 hex digits, got {}: {raw}",
                digits.len()
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| TypesError::InvalidAddress(format!("{e}: {raw}")))?;
        Ok(Self(bytes))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn parses_checksummed_address() {
        let addr = Address::parse(OWNER).unwrap();
        assert_eq!(addr.as_bytes()[0], 0x5a);
        assert_eq!(addr.as_bytes()[19], 0xed);
    }

    #[test]
    fn case_does_not_affect_equality() {
        let mixed = Address::parse(OWNER).unwrap();
        let lower = Address::parse(&OWNER.to_lowercase()).unwrap();
        assert_eq!(mixed, lower);
    }

    #[test]
    fn display_is_lowercase_hex() {
        let addr = Address::parse(OWNER).unwrap();
        assert_eq!(addr.to_string(), OWNER.to_lowercase());
    }

    #[test]
    fn rejects_missing_prefix() {
        let err = Address::parse("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap_err();
        assert!(matches!(err, TypesError::InvalidAddress(_)));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse(&format!("{OWNER}00")).is_err());
    }

    #[test]
    fn rejects_non_hex() {
        assert!(Address::parse("0xzzAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
    }

    #[test]
    fn serde_uses_string_form() {
        let addr = Address::parse(OWNER).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", OWNER.to_lowercase()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}

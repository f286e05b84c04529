//! Ticket identifiers.
//!
//! A ticket is keyed by a `uint256` inside the contract. QR codes carry the
//! identifier as decimal text, so parsing and rendering are decimal.

use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// An unsigned 256-bit ticket identifier, stored big-endian.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId([u8; 32]);

impl TokenId {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Big-endian bytes, which is also the ABI encoding of a `uint256`.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parse a string of ASCII decimal digits.
    ///
    /// Signs, separators, exponents and radix prefixes are all rejected.
    pub fn from_dec_str(s: &str) -> Result<Self, TypesError> {
        if s.is_empty() {
            return Err(TypesError::EmptyTokenId);
        }
        let mut bytes = [0u8; 32];
        for c in s.bytes() {
            if !c.is_ascii_digit() {
                return Err(TypesError::InvalidTokenId(s.to_string()));
            }
            if !mul_add(&mut bytes, 10, c - b'0') {
                return Err(TypesError::TokenIdOverflow(s.to_string()));
            }
        }
        Ok(Self(bytes))
    }

    /// Parse the decoded text of a scanned QR code.
    ///
    /// Surrounding whitespace is ignored; everything else follows
    /// [`TokenId::from_dec_str`].
    pub fn from_scanned(text: &str) -> Result<Self, TypesError> {
        Self::from_dec_str(text.trim())
    }
}

/// `bytes = bytes * mul + add`, returning `false` on overflow.
fn mul_add(bytes: &mut [u8; 32], mul: u8, add: u8) -> bool {
    let mut carry = add as u16;
    for byte in bytes.iter_mut().rev() {
        let v = *byte as u16 * mul as u16 + carry;
        *byte = v as u8;
        carry = v >> 8;
    }
    carry == 0
}

impl From<u64> for TokenId {
    fn from(value: u64) -> Self {
        Self::from(value as u128)
    }
}

impl From<u128> for TokenId {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl FromStr for TokenId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dec_str(s)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let mut n = self.0;
        let mut digits = Vec::with_capacity(78);
        while n != [0u8; 32] {
            let mut rem: u16 = 0;
            for byte in n.iter_mut() {
                let cur = (rem << 8) | *byte as u16;
                *byte = (cur / 10) as u8;
                rem = cur % 10;
            }
            digits.push(b'0' + rem as u8);
        }
        digits.reverse();
        // Only ASCII digits were pushed.
        f.write_str(std::str::from_utf8(&digits).map_err(|_| fmt::Error)?)
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const U256_MAX: &str =
        "115792089237316195423570985008687907853269984665640564039457584007913129639935";

    #[test]
    fn parses_small_number() {
        let id = TokenId::from_dec_str("42").unwrap();
        assert_eq!(id, TokenId::from(42u64));
        assert_eq!(id.to_be_bytes()[31], 42);
    }

    #[test]
    fn parses_zero_and_leading_zeros() {
        assert_eq!(TokenId::from_dec_str("0").unwrap(), TokenId::ZERO);
        assert_eq!(TokenId::from_dec_str("0007").unwrap(), TokenId::from(7u64));
    }

    #[test]
    fn parses_u256_max() {
        let id = TokenId::from_dec_str(U256_MAX).unwrap();
        assert_eq!(id.to_be_bytes(), [0xff; 32]);
        assert_eq!(id.to_string(), U256_MAX);
    }

    #[test]
    fn rejects_overflow() {
        let too_big =
            "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(matches!(
            TokenId::from_dec_str(too_big),
            Err(TypesError::TokenIdOverflow(_))
        ));
    }

    #[test]
    fn rejects_non_decimal_forms() {
        for bad in ["abc", "-1", "+1", "4.2", "1e3", "0x10", "1_000", " 1"] {
            assert!(
                matches!(TokenId::from_dec_str(bad), Err(TypesError::InvalidTokenId(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn empty_is_its_own_error() {
        assert_eq!(TokenId::from_dec_str(""), Err(TypesError::EmptyTokenId));
        assert_eq!(TokenId::from_scanned("   "), Err(TypesError::EmptyTokenId));
    }

    #[test]
    fn scanned_text_is_trimmed() {
        assert_eq!(TokenId::from_scanned(" 42\n").unwrap(), TokenId::from(42u64));
    }

    #[test]
    fn display_large_value() {
        let id = TokenId::from(u128::MAX);
        assert_eq!(id.to_string(), u128::MAX.to_string());
    }

    #[test]
    fn ordering_follows_numeric_value() {
        assert!(TokenId::from(9u64) < TokenId::from(10u64));
        assert!(TokenId::from(u128::MAX) < TokenId::from_dec_str(U256_MAX).unwrap());
    }
}

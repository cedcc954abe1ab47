use crate::validation::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Address length in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Account address that registered a peer or holds stake.
///
/// Rendered as lowercase hex in text and JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0; ADDRESS_LEN]);

    /// Creates an address from its raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses an address from a byte slice of exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
        let raw: [u8; ADDRESS_LEN] =
            bytes
                .try_into()
                .map_err(|_| ValidationError::WrongLength {
                    field: "address",
                    expected: ADDRESS_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(raw))
    }

    /// Parses an address from 40 hex characters.
    pub fn from_hex(value: &str) -> Result<Self, ValidationError> {
        let bytes = hex::decode(value).map_err(|_| ValidationError::PatternMismatch {
            field: "address",
            value: value.to_string(),
        })?;
        Self::from_slice(&bytes)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(value: [u8; ADDRESS_LEN]) -> Self {
        Self(value)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let mut raw = [0u8; ADDRESS_LEN];
        raw[0] = 0xab;
        raw[19] = 0x01;
        let address = Address::new(raw);
        let text = address.to_string();
        assert_eq!(text, "ab00000000000000000000000000000000000001");
        assert_eq!(text.parse::<Address>().unwrap(), address);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            Address::from_hex("abcd"),
            Err(ValidationError::WrongLength { actual: 2, .. })
        ));
    }

    #[test]
    fn rejects_non_hex() {
        assert!(matches!(
            Address::from_hex("zz"),
            Err(ValidationError::PatternMismatch { .. })
        ));
    }

    #[test]
    fn serializes_as_hex_string() {
        let json = serde_json::to_string(&Address::ZERO).unwrap();
        assert_eq!(json, format!("\"{}\"", "0".repeat(40)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Address::ZERO);
    }
}

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest as Sha2Digest, Sha256};
use std::fmt;

use crate::validation::ValidationError;

/// Supported digest algorithms for state digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlg {
    /// SHA-256.
    #[serde(rename = "sha-256")]
    Sha256,
}

/// SHA-256 digest of canonically encoded state.
///
/// Serializes as `{"alg":"sha-256","b64":"..."}` with base64url (no padding);
/// `Display` renders lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DigestRepr", into = "DigestRepr")]
pub struct StateDigest([u8; 32]);

#[derive(Serialize, Deserialize)]
struct DigestRepr {
    alg: DigestAlg,
    b64: String,
}

impl StateDigest {
    /// Hashes the given encoded bytes.
    pub fn compute(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    /// Parses a digest from its base64url (no padding) form.
    pub fn from_b64(b64: &str) -> Result<Self, ValidationError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(b64)
            .map_err(|_| ValidationError::PatternMismatch {
                field: "digest",
                value: b64.to_string(),
            })?;
        let raw: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ValidationError::WrongLength {
                field: "digest",
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self(raw))
    }

    /// Returns the digest algorithm.
    pub fn alg(&self) -> DigestAlg {
        DigestAlg::Sha256
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the base64url (no padding) form.
    pub fn to_b64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Returns the lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<StateDigest> for DigestRepr {
    fn from(value: StateDigest) -> Self {
        DigestRepr {
            alg: value.alg(),
            b64: value.to_b64(),
        }
    }
}

impl TryFrom<DigestRepr> for StateDigest {
    type Error = ValidationError;

    fn try_from(value: DigestRepr) -> Result<Self, Self::Error> {
        match value.alg {
            DigestAlg::Sha256 => StateDigest::from_b64(&value.b64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_matches_known_sha256() {
        let digest = StateDigest::compute(b"");
        assert_eq!(
            digest.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn json_shape_and_round_trip() {
        let digest = StateDigest::compute(b"\x00");
        let json = serde_json::to_value(digest).unwrap();
        assert_eq!(json["alg"], "sha-256");
        assert_eq!(json["b64"].as_str().unwrap().len(), 43);
        let back: StateDigest = serde_json::from_value(json).unwrap();
        assert_eq!(back, digest);
    }

    #[test]
    fn rejects_short_b64() {
        assert!(matches!(
            StateDigest::from_b64("Zm9v"),
            Err(ValidationError::WrongLength { actual: 3, .. })
        ));
    }
}

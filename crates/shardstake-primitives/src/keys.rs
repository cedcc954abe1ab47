//! Public-key handles and key derivation.
//!
//! Staking records carry the peer key as a hex string. Collections are keyed
//! by the *parsed* key, so the hex string is always resolved through
//! [`derive_key`] and a [`KeyParser`]. Parsers normalize keys so that two
//! serializations of the same public key produce equal handles.
//!
//! [`StandardKeyParser`] understands ECDSA over P-256 and Ed25519 only. Peers
//! registered with SM2 or with ECDSA over P-224, P-384 or P-521 fail with
//! [`KeyParseError::Unsupported`], so state holding such keys does not
//! decode with it. Implement [`KeyParser`] to accept further curves.

use p256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Key type tag: ECDSA.
pub const KEY_TYPE_ECDSA: u8 = 0x12;
/// Key type tag: SM2.
pub const KEY_TYPE_SM2: u8 = 0x13;
/// Key type tag: EdDSA.
pub const KEY_TYPE_EDDSA: u8 = 0x14;
/// Curve label: NIST P-256.
pub const CURVE_P256: u8 = 2;
/// Curve label: Ed25519.
pub const CURVE_ED25519: u8 = 25;

/// Algorithm of a parsed public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyAlgorithm {
    /// ECDSA over NIST P-256; bytes are the compressed SEC1 point.
    EcdsaP256,
    /// Ed25519; bytes are the 32-byte compressed point.
    Ed25519,
    /// Raw key bytes accepted without interpretation.
    Opaque,
}

/// Parsed, normalized public key used as a collection key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKeyHandle {
    algorithm: KeyAlgorithm,
    bytes: Vec<u8>,
}

impl PublicKeyHandle {
    /// Creates a handle from an algorithm and its normalized key bytes.
    pub fn new(algorithm: KeyAlgorithm, bytes: Vec<u8>) -> Self {
        Self { algorithm, bytes }
    }

    /// Returns the key algorithm.
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// Returns the normalized key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the normalized key bytes as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for PublicKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Failure to parse key bytes as a public key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    /// No key bytes at all.
    #[error("empty public key")]
    Empty,
    /// Too few bytes to carry a key.
    #[error("public key too short: {len} bytes")]
    TooShort {
        /// Actual length.
        len: usize,
    },
    /// Key type or curve is not supported.
    #[error("unsupported key type 0x{key_type:02x} with curve {curve}")]
    Unsupported {
        /// Key type tag.
        key_type: u8,
        /// Curve label.
        curve: u8,
    },
    /// Bytes do not encode a valid point.
    #[error("invalid key encoding: {0}")]
    InvalidEncoding(String),
}

/// Failure to derive a public-key handle from a hex string.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeyError {
    /// The string is not valid hex.
    #[error("malformed public key hex: {0}")]
    Format(#[from] hex::FromHexError),
    /// The bytes are not a valid public key.
    #[error("malformed public key: {0}")]
    Parse(#[from] KeyParseError),
}

/// Parses serialized public-key bytes into a normalized handle.
pub trait KeyParser {
    /// Parses `bytes` into a handle.
    fn parse(&self, bytes: &[u8]) -> Result<PublicKeyHandle, KeyParseError>;
}

/// Parser for the ledger's serialized key formats.
///
/// Accepted encodings:
/// - untagged SEC1 P-256 point (compressed or uncompressed)
/// - `0x12 || 0x02 || SEC1 point` (ECDSA P-256)
/// - `0x14 || 0x19 || 32 bytes` (Ed25519)
///
/// SM2 and ECDSA over any curve other than P-256 (P-224, P-384, P-521) are
/// rejected as [`KeyParseError::Unsupported`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardKeyParser;

impl KeyParser for StandardKeyParser {
    fn parse(&self, bytes: &[u8]) -> Result<PublicKeyHandle, KeyParseError> {
        if bytes.len() <= 3 {
            return Err(KeyParseError::TooShort { len: bytes.len() });
        }
        match bytes[0] {
            KEY_TYPE_ECDSA if bytes[1] == CURVE_P256 => parse_p256(&bytes[2..]),
            KEY_TYPE_EDDSA if bytes[1] == CURVE_ED25519 => parse_ed25519(&bytes[2..]),
            KEY_TYPE_ECDSA | KEY_TYPE_SM2 | KEY_TYPE_EDDSA => Err(KeyParseError::Unsupported {
                key_type: bytes[0],
                curve: bytes[1],
            }),
            _ => parse_p256(bytes),
        }
    }
}

fn parse_p256(sec1: &[u8]) -> Result<PublicKeyHandle, KeyParseError> {
    let key = p256::PublicKey::from_sec1_bytes(sec1)
        .map_err(|e| KeyParseError::InvalidEncoding(format!("p-256: {}", e)))?;
    let point = key.to_encoded_point(true);
    Ok(PublicKeyHandle::new(
        KeyAlgorithm::EcdsaP256,
        point.as_bytes().to_vec(),
    ))
}

fn parse_ed25519(raw: &[u8]) -> Result<PublicKeyHandle, KeyParseError> {
    let key: [u8; 32] = raw.try_into().map_err(|_| {
        KeyParseError::InvalidEncoding(format!("ed25519 key must be 32 bytes, got {}", raw.len()))
    })?;
    ed25519_dalek::VerifyingKey::from_bytes(&key)
        .map_err(|e| KeyParseError::InvalidEncoding(format!("ed25519: {}", e)))?;
    Ok(PublicKeyHandle::new(KeyAlgorithm::Ed25519, key.to_vec()))
}

/// Parser that uses the raw bytes as the key.
///
/// Any non-empty byte string is accepted; two keys are equal exactly when
/// their bytes are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpaqueKeyParser;

impl KeyParser for OpaqueKeyParser {
    fn parse(&self, bytes: &[u8]) -> Result<PublicKeyHandle, KeyParseError> {
        if bytes.is_empty() {
            return Err(KeyParseError::Empty);
        }
        Ok(PublicKeyHandle::new(KeyAlgorithm::Opaque, bytes.to_vec()))
    }
}

/// Derives the collection key for a hex-encoded peer key.
///
/// Hex decoding fails with [`KeyError::Format`] before the parser is
/// consulted; parse failures surface as [`KeyError::Parse`].
pub fn derive_key<P: KeyParser + ?Sized>(
    parser: &P,
    hex_key: &str,
) -> Result<PublicKeyHandle, KeyError> {
    let bytes = hex::decode(hex_key)?;
    Ok(parser.parse(&bytes)?)
}

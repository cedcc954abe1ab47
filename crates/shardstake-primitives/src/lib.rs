//! Wire primitives shared by shard stake state records.
//!
//! Every byte that ends up in committed shard state passes through this
//! crate. It provides:
//! - The primitive wire codec ([`WireWriter`] / [`WireReader`]): compact-size
//!   lengths, variable-length unsigned integers, length-prefixed strings and
//!   addresses
//! - [`Address`], the 20-byte account identifier
//! - Public-key handles and the [`KeyParser`] seam used to turn hex peer keys
//!   into map keys ([`derive_key`]); the standard parser accepts P-256 and
//!   Ed25519 keys only
//! - [`StateDigest`], the SHA-256 digest of encoded state
//!
#![deny(missing_docs)]

/// Account addresses.
pub mod address;
/// State digests over encoded bytes.
pub mod digest;
/// Error types for wire decoding and encoding.
pub mod errors;
/// Public-key handles, parsers and key derivation.
pub mod keys;
/// Validation helpers used by primitive types.
pub mod validation;
/// Primitive wire codec.
pub mod wire;

pub use address::Address;
pub use digest::{DigestAlg, StateDigest};
pub use errors::CodecError;
pub use keys::{
    derive_key, KeyAlgorithm, KeyError, KeyParseError, KeyParser, OpaqueKeyParser,
    PublicKeyHandle, StandardKeyParser,
};
pub use validation::ValidationError;
pub use wire::{WireReader, WireWriter};

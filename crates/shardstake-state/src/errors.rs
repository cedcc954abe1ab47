use shardstake_primitives::{CodecError, KeyError};
use thiserror::Error;

/// Errors that can occur while encoding, decoding or querying state collections.
#[derive(Error, Debug)]
pub enum StateError {
    /// Wire error outside any collection entry (single records, trailing bytes).
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    /// The entry count could not be read or written.
    #[error("{kind}: entry count: {source}")]
    Count {
        /// Collection kind.
        kind: &'static str,
        /// Underlying wire error.
        source: CodecError,
    },
    /// An entry could not be read or written.
    #[error("{kind}: index {index}: {source}")]
    Entry {
        /// Collection kind.
        kind: &'static str,
        /// Position of the entry in the stream.
        index: u64,
        /// Underlying wire error.
        source: CodecError,
    },
    /// A decoded entry carries a peer key that does not derive a public key.
    #[error("{kind}: index {index}: peer key '{peer_key}': {source}")]
    EntryKey {
        /// Collection kind.
        kind: &'static str,
        /// Position of the entry in the stream.
        index: u64,
        /// Offending peer key string.
        peer_key: String,
        /// Key derivation failure.
        source: KeyError,
    },
    /// Two decoded entries derive the same public key.
    #[error("{kind}: index {index}: duplicate peer key '{peer_key}'")]
    DuplicateKey {
        /// Collection kind.
        kind: &'static str,
        /// Position of the second entry in the stream.
        index: u64,
        /// Peer key string of the second entry.
        peer_key: String,
    },
    /// A caller-supplied peer key does not derive a public key.
    #[error("peer key '{peer_key}': {source}")]
    InvalidKey {
        /// Offending peer key string.
        peer_key: String,
        /// Key derivation failure.
        source: KeyError,
    },
    /// No entry exists for the requested peer.
    #[error("peer {peer_key} not exist")]
    NotFound {
        /// Requested peer key string.
        peer_key: String,
    },
    /// The collection was never initialized.
    #[error("{kind}: peers is nil")]
    NilCollection {
        /// Collection kind.
        kind: &'static str,
    },
    /// The declared entry count exceeds the configured limit.
    #[error("{kind}: entry count {count} exceeds maximum {max}")]
    TooManyEntries {
        /// Collection kind.
        kind: &'static str,
        /// Declared count.
        count: u64,
        /// Configured maximum.
        max: u64,
    },
    /// An aggregate over the collection does not fit in a `u64`.
    #[error("{what} overflows u64")]
    Overflow {
        /// Name of the aggregate.
        what: &'static str,
    },
}

impl StateError {
    /// Returns `true` for wire-level failures (truncated or malformed input).
    pub fn is_codec(&self) -> bool {
        matches!(
            self,
            StateError::Codec(_) | StateError::Count { .. } | StateError::Entry { .. }
        )
    }

    /// Returns the key derivation failure, if this error carries one.
    pub fn key_error(&self) -> Option<&KeyError> {
        match self {
            StateError::EntryKey { source, .. } | StateError::InvalidKey { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

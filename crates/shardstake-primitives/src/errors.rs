use thiserror::Error;

/// Errors that can occur while reading or writing wire primitives.
///
/// Every decoding variant names the field being read so a failure can be
/// diagnosed from the error alone.
#[derive(Error, Debug)]
pub enum CodecError {
    /// I/O error from the underlying sink or source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Input ended before the field was complete.
    #[error("truncated {field} at offset {offset}")]
    Truncated {
        /// Field being read.
        field: &'static str,
        /// Byte offset where the field starts.
        offset: u64,
    },
    /// Malformed compact-size length prefix.
    #[error("malformed length prefix for {field}: {reason}")]
    MalformedLength {
        /// Field being read.
        field: &'static str,
        /// Reason for invalidity.
        reason: String,
    },
    /// Malformed variable-length unsigned integer.
    #[error("malformed varuint for {field}: {reason}")]
    MalformedVarUint {
        /// Field being read.
        field: &'static str,
        /// Reason for invalidity.
        reason: &'static str,
    },
    /// Address payload was not exactly 20 bytes.
    #[error("malformed address for {field}: expected 20 bytes, got {len}")]
    MalformedAddress {
        /// Field being read.
        field: &'static str,
        /// Actual payload length.
        len: u64,
    },
    /// String payload was not valid UTF-8.
    #[error("invalid UTF-8 in {field}")]
    InvalidUtf8 {
        /// Field being read.
        field: &'static str,
    },
    /// Bytes remained after a complete value was decoded.
    #[error("trailing bytes after offset {offset}")]
    TrailingBytes {
        /// Offset of the first unconsumed byte.
        offset: u64,
    },
}

impl CodecError {
    /// Returns the field name the error refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            CodecError::Truncated { field, .. }
            | CodecError::MalformedLength { field, .. }
            | CodecError::MalformedVarUint { field, .. }
            | CodecError::MalformedAddress { field, .. }
            | CodecError::InvalidUtf8 { field } => Some(field),
            CodecError::Io(_) | CodecError::TrailingBytes { .. } => None,
        }
    }
}

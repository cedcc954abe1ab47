use thiserror::Error;

/// Validation errors for primitive value parsing.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// When a textual value is not valid hex or base64.
    #[error("{field} ('{value}') is not allowed")]
    PatternMismatch {
        /// Field name that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// When a decoded value has the wrong byte length.
    #[error("{field} must be {expected} bytes, got {actual}")]
    WrongLength {
        /// Field name that failed validation.
        field: &'static str,
        /// Required length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
}

//! Subcommand implementations.

use clap::ValueEnum;
use shardstake_state::DecodeOptions;

pub mod decode;
pub mod digest;
pub mod encode;
pub mod get_peer;

/// Collection kind held by a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    /// Epoch view of peer records
    View,
    /// User ledger of stake positions
    Ledger,
}

/// Public key scheme used to derive collection keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Keys {
    /// P-256 and Ed25519 keys, tagged or legacy
    Standard,
    /// Raw bytes, no curve validation
    Opaque,
}

/// Builds decode limits from command-line flags.
pub(crate) fn decode_options(max_entries: Option<u64>) -> DecodeOptions {
    let mut options = DecodeOptions::default();
    if let Some(max) = max_entries {
        options.max_entries = max;
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardstake_state::collection::DEFAULT_MAX_ENTRIES;

    #[test]
    fn max_entries_flag_overrides_default() {
        assert_eq!(decode_options(None).max_entries, DEFAULT_MAX_ENTRIES);
        assert_eq!(decode_options(Some(3)).max_entries, 3);
        assert!(!decode_options(Some(3)).allow_trailing);
    }
}

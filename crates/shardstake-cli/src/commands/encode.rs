//! Encode command implementation.

use super::{Keys, Kind};
use crate::error::CliError;
use crate::input;
use serde::de::DeserializeOwned;
use shardstake_primitives::{KeyParser, OpaqueKeyParser, StandardKeyParser};
use shardstake_state::{PeerMap, PeerRecord, StakeRecord, UserPeerStake};
use tracing::info;

pub fn run(kind: Kind, keys: Keys, input: Option<String>) -> Result<(), CliError> {
    let text = input::read_text(input.as_deref())?;
    let hex = match (kind, keys) {
        (Kind::View, Keys::Standard) => encode::<PeerRecord, StandardKeyParser>(&text)?,
        (Kind::View, Keys::Opaque) => encode::<PeerRecord, OpaqueKeyParser>(&text)?,
        (Kind::Ledger, Keys::Standard) => encode::<UserPeerStake, StandardKeyParser>(&text)?,
        (Kind::Ledger, Keys::Opaque) => encode::<UserPeerStake, OpaqueKeyParser>(&text)?,
    };
    println!("{}", hex);
    Ok(())
}

/// Builds a collection from a JSON array of records and returns its canonical hex.
fn encode<R, P>(text: &str) -> Result<String, CliError>
where
    R: StakeRecord + DeserializeOwned,
    P: KeyParser + Default,
{
    let records: Vec<R> = serde_json::from_str(text)?;
    let mut map = PeerMap::<R, P>::new();
    for record in records {
        let peer_key = record.peer_key().to_string();
        if map.insert(record)?.is_some() {
            return Err(CliError::DuplicateInput(peer_key));
        }
    }
    let bytes = map.to_bytes()?;
    let entries = map.len()?;
    info!(kind = R::KIND, entries, bytes = bytes.len(), "encoded collection");
    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_input_records_are_rejected() {
        let text = r#"[
            {"peer_key": "aa", "stake_amount": 1, "unfreeze_amount": 0},
            {"peer_key": "AA", "stake_amount": 2, "unfreeze_amount": 0}
        ]"#;
        let err = encode::<UserPeerStake, OpaqueKeyParser>(text).unwrap_err();
        assert!(matches!(err, CliError::DuplicateInput(ref key) if key == "AA"));
    }

    #[test]
    fn ledger_hex_is_canonical() {
        let text = r#"[
            {"peer_key": "0a", "stake_amount": 0, "unfreeze_amount": 0},
            {"peer_key": "0b", "stake_amount": 0, "unfreeze_amount": 0}
        ]"#;
        let hex = encode::<UserPeerStake, OpaqueKeyParser>(text).unwrap();
        assert_eq!(hex, "010202306200000230610000");
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = encode::<PeerRecord, OpaqueKeyParser>("{").unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
    }
}

//! Digest command implementation.

use super::{decode_options, Keys, Kind};
use crate::error::CliError;
use crate::input;
use shardstake_primitives::{KeyParser, OpaqueKeyParser, StandardKeyParser, StateDigest};
use shardstake_state::{DecodeOptions, PeerMap, PeerRecord, StakeRecord, UserPeerStake};

pub fn run(
    kind: Kind,
    keys: Keys,
    json: bool,
    max_entries: Option<u64>,
    input: Option<String>,
) -> Result<(), CliError> {
    let bytes = input::read_hex(input.as_deref())?;
    let options = decode_options(max_entries);
    let (digest, entries) = match (kind, keys) {
        (Kind::View, Keys::Standard) => digest::<PeerRecord, StandardKeyParser>(&bytes, &options)?,
        (Kind::View, Keys::Opaque) => digest::<PeerRecord, OpaqueKeyParser>(&bytes, &options)?,
        (Kind::Ledger, Keys::Standard) => {
            digest::<UserPeerStake, StandardKeyParser>(&bytes, &options)?
        }
        (Kind::Ledger, Keys::Opaque) => digest::<UserPeerStake, OpaqueKeyParser>(&bytes, &options)?,
    };

    if json {
        let value = serde_json::json!({
            "entries": entries,
            "digest": digest,
            "hex": digest.to_hex(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", digest);
    }
    Ok(())
}

/// Decodes and re-encodes the payload, hashing the canonical form.
///
/// Decoding first means a payload that is not canonical (or not valid at
/// all) never yields a digest.
fn digest<R, P>(bytes: &[u8], options: &DecodeOptions) -> Result<(StateDigest, usize), CliError>
where
    R: StakeRecord,
    P: KeyParser + Default,
{
    let map = PeerMap::<R, P>::from_bytes_with(bytes, P::default(), options)?;
    Ok((map.digest()?, map.len()?))
}

//! Get-peer command implementation.

use super::{decode_options, Keys};
use crate::error::CliError;
use crate::input;
use shardstake_primitives::{KeyParser, OpaqueKeyParser, StandardKeyParser};
use shardstake_state::{DecodeOptions, EpochView};

pub fn run(
    pubkey: String,
    keys: Keys,
    max_entries: Option<u64>,
    input: Option<String>,
) -> Result<(), CliError> {
    let bytes = input::read_hex(input.as_deref())?;
    let options = decode_options(max_entries);
    let value = match keys {
        Keys::Standard => lookup::<StandardKeyParser>(&bytes, &options, &pubkey)?,
        Keys::Opaque => lookup::<OpaqueKeyParser>(&bytes, &options, &pubkey)?,
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn lookup<P: KeyParser + Default>(
    bytes: &[u8],
    options: &DecodeOptions,
    pubkey: &str,
) -> Result<serde_json::Value, CliError> {
    let view = EpochView::<P>::from_bytes_with(bytes, P::default(), options)?;
    let (record, key) = view.get_peer(pubkey)?;
    Ok(serde_json::json!({
        "key": key.to_hex(),
        "algorithm": key.algorithm(),
        "record": record,
    }))
}

//! Decode command implementation.

use super::{decode_options, Keys, Kind};
use crate::error::CliError;
use crate::input;
use crate::output::{self, TableRow};
use serde::Serialize;
use shardstake_primitives::{KeyParser, OpaqueKeyParser, StandardKeyParser};
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
    match (kind, keys) {
        (Kind::View, Keys::Standard) => print::<PeerRecord, StandardKeyParser>(&bytes, &options, json),
        (Kind::View, Keys::Opaque) => print::<PeerRecord, OpaqueKeyParser>(&bytes, &options, json),
        (Kind::Ledger, Keys::Standard) => {
            print::<UserPeerStake, StandardKeyParser>(&bytes, &options, json)
        }
        (Kind::Ledger, Keys::Opaque) => {
            print::<UserPeerStake, OpaqueKeyParser>(&bytes, &options, json)
        }
    }
}

fn print<R, P>(bytes: &[u8], options: &DecodeOptions, json: bool) -> Result<(), CliError>
where
    R: StakeRecord + Serialize + TableRow,
    P: KeyParser + Default,
{
    let map = PeerMap::<R, P>::from_bytes_with(bytes, P::default(), options)?;
    let records = map.canonical_records()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        output::print_table_header::<R>();
        for record in records {
            println!("{}", record.row());
        }
    }
    Ok(())
}

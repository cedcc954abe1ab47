//! Record types and their wire codecs.
//!
//! Fields are written in declaration order; the order is the wire format and
//! never changes. Decoding checks only byte-level validity; numeric
//! invariants such as `fee_balance <= whole_fee` belong to the staking logic.

use serde::{Deserialize, Serialize};
use shardstake_primitives::{Address, CodecError, WireReader, WireWriter};
use std::io::{Read, Write};

/// A record stored in a public-key keyed collection.
pub trait StakeRecord: Sized {
    /// Collection kind used in errors and logs.
    const KIND: &'static str;

    /// Hex-encoded serialized public key of the peer.
    fn peer_key(&self) -> &str;

    /// Writes the record's fields in wire order.
    fn encode<W: Write>(&self, writer: &mut WireWriter<W>) -> Result<(), CodecError>;

    /// Reads the record's fields in wire order.
    fn decode<R: Read>(reader: &mut WireReader<R>) -> Result<Self, CodecError>;

    /// Encodes the record on its own.
    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut writer = WireWriter::new(Vec::new());
        self.encode(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Decodes exactly one record, rejecting trailing bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = WireReader::new(bytes);
        let record = Self::decode(&mut reader)?;
        reader.ensure_exhausted()?;
        Ok(record)
    }
}

/// One peer's staking and fee bookkeeping for an epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRecord {
    /// Hex-encoded serialized public key of the peer.
    pub peer_key: String,
    /// Account that registered the peer.
    pub owner: Address,
    /// Fee accrued this epoch.
    pub whole_fee: u64,
    /// Portion of `whole_fee` not yet withdrawn.
    pub fee_balance: u64,
    /// Node plus delegated stake.
    pub whole_stake_amount: u64,
    /// Amount withdrawable across all delegators.
    pub whole_unfreeze_amount: u64,
    /// Delegated (non-self) stake.
    pub user_stake_amount: u64,
    /// Ceiling on accepted delegated stake.
    pub max_authorization: u64,
    /// Fee-sharing weight toward delegators.
    pub proportion: u64,
}

impl StakeRecord for PeerRecord {
    const KIND: &'static str = "epoch view";

    fn peer_key(&self) -> &str {
        &self.peer_key
    }

    fn encode<W: Write>(&self, writer: &mut WireWriter<W>) -> Result<(), CodecError> {
        writer.write_string(&self.peer_key)?;
        writer.write_address(&self.owner)?;
        writer.write_var_uint(self.whole_fee)?;
        writer.write_var_uint(self.fee_balance)?;
        writer.write_var_uint(self.whole_stake_amount)?;
        writer.write_var_uint(self.whole_unfreeze_amount)?;
        writer.write_var_uint(self.user_stake_amount)?;
        writer.write_var_uint(self.max_authorization)?;
        writer.write_var_uint(self.proportion)
    }

    fn decode<R: Read>(reader: &mut WireReader<R>) -> Result<Self, CodecError> {
        Ok(Self {
            peer_key: reader.read_string("peer_key")?,
            owner: reader.read_address("owner")?,
            whole_fee: reader.read_var_uint("whole_fee")?,
            fee_balance: reader.read_var_uint("fee_balance")?,
            whole_stake_amount: reader.read_var_uint("whole_stake_amount")?,
            whole_unfreeze_amount: reader.read_var_uint("whole_unfreeze_amount")?,
            user_stake_amount: reader.read_var_uint("user_stake_amount")?,
            max_authorization: reader.read_var_uint("max_authorization")?,
            proportion: reader.read_var_uint("proportion")?,
        })
    }
}

/// One user's stake against one peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPeerStake {
    /// Hex-encoded serialized public key of the peer.
    pub peer_key: String,
    /// Amount the user has staked to the peer.
    pub stake_amount: u64,
    /// Amount the user can currently withdraw from the peer.
    pub unfreeze_amount: u64,
}

impl StakeRecord for UserPeerStake {
    const KIND: &'static str = "user ledger";

    fn peer_key(&self) -> &str {
        &self.peer_key
    }

    fn encode<W: Write>(&self, writer: &mut WireWriter<W>) -> Result<(), CodecError> {
        writer.write_string(&self.peer_key)?;
        writer.write_var_uint(self.stake_amount)?;
        writer.write_var_uint(self.unfreeze_amount)
    }

    fn decode<R: Read>(reader: &mut WireReader<R>) -> Result<Self, CodecError> {
        Ok(Self {
            peer_key: reader.read_string("peer_key")?,
            stake_amount: reader.read_var_uint("stake_amount")?,
            unfreeze_amount: reader.read_var_uint("unfreeze_amount")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_peer() -> PeerRecord {
        PeerRecord {
            peer_key: "aa".to_string(),
            owner: Address::new([0x11; 20]),
            whole_fee: 100,
            fee_balance: 40,
            whole_stake_amount: 1 << 40,
            whole_unfreeze_amount: 128,
            user_stake_amount: 7,
            max_authorization: u64::MAX,
            proportion: 50,
        }
    }

    #[test]
    fn peer_record_round_trip() {
        let record = sample_peer();
        let bytes = record.to_bytes().unwrap();
        assert_eq!(PeerRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn peer_record_golden_layout() {
        let record = PeerRecord {
            peer_key: "aa".to_string(),
            whole_fee: 100,
            fee_balance: 40,
            ..PeerRecord::default()
        };
        let mut expected = vec![0x02, b'a', b'a', 0x14];
        expected.extend_from_slice(&[0u8; 20]);
        expected.extend_from_slice(&[0x01, 0x64, 0x01, 0x28, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(record.to_bytes().unwrap(), expected);
    }

    #[test]
    fn user_peer_stake_golden_layout() {
        let stake = UserPeerStake {
            peer_key: "aa".to_string(),
            stake_amount: 5,
            unfreeze_amount: 0,
        };
        let bytes = stake.to_bytes().unwrap();
        assert_eq!(bytes, vec![0x02, b'a', b'a', 0x01, 0x05, 0x00]);
        assert_eq!(UserPeerStake::from_bytes(&bytes).unwrap(), stake);
    }

    #[test]
    fn decode_does_not_check_numeric_invariants() {
        let record = PeerRecord {
            peer_key: "aa".to_string(),
            whole_fee: 1,
            fee_balance: 2,
            whole_stake_amount: 1,
            user_stake_amount: 9,
            ..PeerRecord::default()
        };
        let bytes = record.to_bytes().unwrap();
        assert_eq!(PeerRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn truncated_record_names_field() {
        let bytes = sample_peer().to_bytes().unwrap();
        // peer_key (3 bytes) + owner (21 bytes) + whole_fee (2 bytes), then cut.
        let err = PeerRecord::from_bytes(&bytes[..27]).unwrap_err();
        assert_eq!(err.field(), Some("fee_balance"));
    }

    #[test]
    fn malformed_owner_names_field() {
        let mut bytes = vec![0x02, b'a', b'a', 0x13];
        bytes.extend_from_slice(&[0u8; 19]);
        let err = PeerRecord::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            CodecError::MalformedAddress { field: "owner", len: 19 }
        ));
    }

    #[test]
    fn every_strict_prefix_fails() {
        let bytes = sample_peer().to_bytes().unwrap();
        for cut in 0..bytes.len() {
            assert!(PeerRecord::from_bytes(&bytes[..cut]).is_err(), "prefix {}", cut);
        }
        let bytes = UserPeerStake {
            peer_key: "aa".to_string(),
            stake_amount: 300,
            unfreeze_amount: 1,
        }
        .to_bytes()
        .unwrap();
        for cut in 0..bytes.len() {
            assert!(UserPeerStake::from_bytes(&bytes[..cut]).is_err(), "prefix {}", cut);
        }
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes = sample_peer().to_bytes().unwrap();
        bytes.push(0);
        assert!(matches!(
            PeerRecord::from_bytes(&bytes),
            Err(CodecError::TrailingBytes { .. })
        ));
    }
}

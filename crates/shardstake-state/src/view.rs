use crate::collection::PeerMap;
use crate::errors::StateError;
use crate::record::PeerRecord;
use serde::{Deserialize, Serialize};
use shardstake_primitives::{
    CodecError, KeyParser, PublicKeyHandle, StandardKeyParser, WireReader, WireWriter,
};
use std::fmt;
use std::io::{Read, Write};

/// Shard consensus epoch index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct View(u64);

impl View {
    /// Creates a view index.
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub const fn index(self) -> u64 {
        self.0
    }

    /// Returns the following view, or `None` at `u64::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Writes the index as a varuint.
    pub fn encode<W: Write>(&self, writer: &mut WireWriter<W>) -> Result<(), CodecError> {
        writer.write_var_uint(self.0)
    }

    /// Reads an index written by [`View::encode`].
    pub fn decode<R: Read>(reader: &mut WireReader<R>) -> Result<Self, CodecError> {
        reader.read_var_uint("view").map(Self)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for View {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// All peers active in one consensus epoch, keyed by peer public key.
///
/// Wire layout: `varuint(count)` followed by `count` [`PeerRecord`]s in
/// descending `peer_key` order.
pub type EpochView<P = StandardKeyParser> = PeerMap<PeerRecord, P>;

impl<P: KeyParser> PeerMap<PeerRecord, P> {
    /// Resolves a peer by its hex public key.
    ///
    /// This is the read path for business logic that identifies a peer by
    /// its external string form.
    ///
    /// # Errors
    ///
    /// - [`StateError::NilCollection`] if the view is uninitialized
    /// - [`StateError::InvalidKey`] if the hex or key bytes are malformed;
    ///   no lookup is attempted
    /// - [`StateError::NotFound`] if the view has no such peer
    pub fn get_peer(
        &self,
        peer_key: &str,
    ) -> Result<(&PeerRecord, PublicKeyHandle), StateError> {
        self.lookup(peer_key)
    }

    /// Sum of `whole_stake_amount` over all peers.
    pub fn total_stake(&self) -> Result<u64, StateError> {
        self.checked_sum("total stake", |peer| peer.whole_stake_amount)
    }

    /// Sum of `fee_balance` over all peers.
    pub fn total_fee_balance(&self) -> Result<u64, StateError> {
        self.checked_sum("total fee balance", |peer| peer.fee_balance)
    }
}

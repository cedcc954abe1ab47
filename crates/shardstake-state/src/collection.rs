//! Public-key keyed collection and its canonical codec.

use crate::canonical::canonical_order;
use crate::errors::StateError;
use crate::record::StakeRecord;
use shardstake_primitives::{
    derive_key, KeyParser, PublicKeyHandle, StandardKeyParser, StateDigest, WireReader, WireWriter,
};
use std::collections::hash_map::{self, Entry};
use std::collections::HashMap;
use std::io::{Read, Write};
use tracing::{debug, warn};

/// Default maximum number of entries accepted by a decode.
pub const DEFAULT_MAX_ENTRIES: u64 = 1 << 20;

/// Upper bound on map capacity reserved up front from a declared count.
const PREALLOC_LIMIT: u64 = 1024;

/// Limits applied while decoding a collection.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Maximum declared entry count (default: 2^20).
    pub max_entries: u64,
    /// Whether [`PeerMap::from_bytes_with`] accepts bytes after the collection (default: false).
    pub allow_trailing: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            allow_trailing: false,
        }
    }
}

/// Mapping from parsed peer public key to record.
///
/// Every entry is stored under the key derived from the record's own
/// `peer_key`, so the two can never disagree. A map built with
/// [`Default`] is uninitialized and every operation on it except
/// [`PeerMap::is_initialized`] fails with [`StateError::NilCollection`];
/// use [`PeerMap::new`] for an empty map.
///
/// Iteration order is unspecified. Encoding always sorts entries with
/// [`canonical_order`] first, so equal contents produce equal bytes no
/// matter how the map was built.
#[derive(Debug, Clone)]
pub struct PeerMap<R, P = StandardKeyParser> {
    entries: Option<HashMap<PublicKeyHandle, R>>,
    parser: P,
}

impl<R, P: Default> Default for PeerMap<R, P> {
    fn default() -> Self {
        Self {
            entries: None,
            parser: P::default(),
        }
    }
}

impl<R: PartialEq, P> PartialEq for PeerMap<R, P> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<R: Eq, P> Eq for PeerMap<R, P> {}

impl<R: StakeRecord, P: KeyParser> PeerMap<R, P> {
    /// Creates an empty, initialized map.
    pub fn new() -> Self
    where
        P: Default,
    {
        Self::with_parser(P::default())
    }

    /// Creates an empty, initialized map using the given key parser.
    pub fn with_parser(parser: P) -> Self {
        Self {
            entries: Some(HashMap::new()),
            parser,
        }
    }

    /// Returns the key parser.
    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Returns `true` unless the map was built with [`Default`].
    ///
    /// This is the only query that succeeds on an uninitialized map.
    pub fn is_initialized(&self) -> bool {
        self.entries.is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> Result<usize, StateError> {
        Ok(self.entries()?.len())
    }

    /// Returns `true` if the map is initialized and has no entries.
    pub fn is_empty(&self) -> Result<bool, StateError> {
        Ok(self.entries()?.is_empty())
    }

    pub(crate) fn entries(&self) -> Result<&HashMap<PublicKeyHandle, R>, StateError> {
        self.entries
            .as_ref()
            .ok_or(StateError::NilCollection { kind: R::KIND })
    }

    /// Inserts a record under the key derived from its `peer_key`.
    ///
    /// Returns the record previously stored under that key, if any.
    pub fn insert(&mut self, record: R) -> Result<Option<R>, StateError> {
        let entries = self
            .entries
            .as_mut()
            .ok_or(StateError::NilCollection { kind: R::KIND })?;
        let key = derive(&self.parser, record.peer_key())?;
        Ok(entries.insert(key, record))
    }

    /// Removes the record for a hex peer key.
    pub fn remove(&mut self, peer_key: &str) -> Result<Option<R>, StateError> {
        let entries = self
            .entries
            .as_mut()
            .ok_or(StateError::NilCollection { kind: R::KIND })?;
        let key = derive(&self.parser, peer_key)?;
        Ok(entries.remove(&key))
    }

    /// Resolves a hex peer key and returns its record and derived key.
    ///
    /// Fails with [`StateError::NilCollection`] on an uninitialized map,
    /// [`StateError::InvalidKey`] before any lookup if the key does not
    /// derive, and [`StateError::NotFound`] if no entry exists.
    pub fn lookup(&self, peer_key: &str) -> Result<(&R, PublicKeyHandle), StateError> {
        let entries = self.entries()?;
        let key = derive(&self.parser, peer_key)?;
        match entries.get(&key) {
            Some(record) => Ok((record, key)),
            None => Err(StateError::NotFound {
                peer_key: peer_key.to_string(),
            }),
        }
    }

    /// Iterates entries in unspecified order.
    pub fn iter(&self) -> Result<hash_map::Iter<'_, PublicKeyHandle, R>, StateError> {
        Ok(self.entries()?.iter())
    }

    /// Returns the records in canonical encoding order.
    pub fn canonical_records(&self) -> Result<Vec<&R>, StateError> {
        let mut records: Vec<&R> = self.entries()?.values().collect();
        canonical_order(&mut records, |record| record.peer_key());
        Ok(records)
    }

    /// Writes the entry count then every record in canonical order.
    ///
    /// Nothing is written if the map is uninitialized.
    pub fn encode<W: Write>(&self, writer: &mut WireWriter<W>) -> Result<(), StateError> {
        let records = self.canonical_records()?;
        let start = writer.written();
        writer
            .write_var_uint(records.len() as u64)
            .map_err(|source| StateError::Count {
                kind: R::KIND,
                source,
            })?;
        for (index, record) in records.iter().enumerate() {
            record
                .encode(writer)
                .map_err(|source| StateError::Entry {
                    kind: R::KIND,
                    index: index as u64,
                    source,
                })?;
        }
        debug!(
            kind = R::KIND,
            count = records.len(),
            bytes = writer.written() - start,
            "encoded peer map"
        );
        Ok(())
    }

    /// Encodes the map into a new byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StateError> {
        let mut writer = WireWriter::new(Vec::new());
        self.encode(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// SHA-256 digest of the canonical encoding.
    pub fn digest(&self) -> Result<StateDigest, StateError> {
        Ok(StateDigest::compute(&self.to_bytes()?))
    }

    /// Reads a collection from a wire stream.
    ///
    /// Each record's key is derived from its own `peer_key`. Decoding stops
    /// at the first failure and never returns a partial collection.
    pub fn decode_with<Rd: Read>(
        reader: &mut WireReader<Rd>,
        parser: P,
        options: &DecodeOptions,
    ) -> Result<Self, StateError> {
        let count = reader
            .read_var_uint("count")
            .map_err(|source| StateError::Count {
                kind: R::KIND,
                source,
            })?;
        if count > options.max_entries {
            return Err(StateError::TooManyEntries {
                kind: R::KIND,
                count,
                max: options.max_entries,
            });
        }

        let mut entries = HashMap::with_capacity(count.min(PREALLOC_LIMIT) as usize);
        for index in 0..count {
            let record = R::decode(reader).map_err(|source| StateError::Entry {
                kind: R::KIND,
                index,
                source,
            })?;
            let key = derive_key(&parser, record.peer_key()).map_err(|source| {
                StateError::EntryKey {
                    kind: R::KIND,
                    index,
                    peer_key: record.peer_key().to_string(),
                    source,
                }
            })?;
            match entries.entry(key) {
                Entry::Occupied(_) => {
                    warn!(kind = R::KIND, index, peer_key = record.peer_key(), "duplicate peer key");
                    return Err(StateError::DuplicateKey {
                        kind: R::KIND,
                        index,
                        peer_key: record.peer_key().to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }

        debug!(kind = R::KIND, count, bytes = reader.position(), "decoded peer map");
        Ok(Self {
            entries: Some(entries),
            parser,
        })
    }

    /// Reads a collection with the default parser and options.
    pub fn decode<Rd: Read>(reader: &mut WireReader<Rd>) -> Result<Self, StateError>
    where
        P: Default,
    {
        Self::decode_with(reader, P::default(), &DecodeOptions::default())
    }

    /// Decodes a collection from bytes with the given parser and options.
    pub fn from_bytes_with(
        bytes: &[u8],
        parser: P,
        options: &DecodeOptions,
    ) -> Result<Self, StateError> {
        let mut reader = WireReader::new(bytes);
        let map = Self::decode_with(&mut reader, parser, options)?;
        if !options.allow_trailing {
            reader.ensure_exhausted()?;
        }
        Ok(map)
    }

    /// Decodes a collection from bytes with the default parser and options.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError>
    where
        P: Default,
    {
        Self::from_bytes_with(bytes, P::default(), &DecodeOptions::default())
    }

    /// Applies `f` to each record, failing on `u64` overflow.
    pub(crate) fn checked_sum<F>(&self, what: &'static str, f: F) -> Result<u64, StateError>
    where
        F: Fn(&R) -> u64,
    {
        self.entries()?
            .values()
            .try_fold(0u64, |acc, record| acc.checked_add(f(record)))
            .ok_or(StateError::Overflow { what })
    }
}

fn derive<P: KeyParser>(parser: &P, peer_key: &str) -> Result<PublicKeyHandle, StateError> {
    derive_key(parser, peer_key).map_err(|source| StateError::InvalidKey {
        peer_key: peer_key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::UserPeerStake;
    use shardstake_primitives::{KeyError, OpaqueKeyParser};

    type Ledger = PeerMap<UserPeerStake, OpaqueKeyParser>;

    fn stake(peer_key: &str, amount: u64) -> UserPeerStake {
        UserPeerStake {
            peer_key: peer_key.to_string(),
            stake_amount: amount,
            unfreeze_amount: 0,
        }
    }

    #[test]
    fn uninitialized_map_rejects_everything() {
        let mut map = Ledger::default();
        assert!(!map.is_initialized());
        assert!(matches!(map.to_bytes(), Err(StateError::NilCollection { .. })));
        assert!(matches!(map.insert(stake("aa", 1)), Err(StateError::NilCollection { .. })));
        assert!(matches!(map.lookup("aa"), Err(StateError::NilCollection { .. })));
        assert!(matches!(map.remove("aa"), Err(StateError::NilCollection { .. })));
        assert!(matches!(map.insert(stake("zz", 1)), Err(StateError::NilCollection { .. })));
        assert!(matches!(map.len(), Err(StateError::NilCollection { .. })));
        assert!(matches!(map.is_empty(), Err(StateError::NilCollection { .. })));
        assert!(matches!(map.iter(), Err(StateError::NilCollection { .. })));
        assert!(matches!(
            map.checked_sum("stake", |r| r.stake_amount),
            Err(StateError::NilCollection { .. })
        ));
    }

    #[test]
    fn empty_map_is_distinct_from_uninitialized() {
        let map = Ledger::new();
        assert!(map.is_initialized());
        assert_eq!(map.len().unwrap(), 0);
        assert!(map.is_empty().unwrap());
        assert_eq!(map.iter().unwrap().count(), 0);
    }

    #[test]
    fn iter_yields_derived_keys() {
        let mut map = Ledger::new();
        map.insert(stake("AA", 1)).unwrap();
        let (key, record) = map.iter().unwrap().next().unwrap();
        assert_eq!(key.as_bytes(), &[0xaa]);
        assert_eq!(record.peer_key, "AA");
    }

    #[test]
    fn encode_appends_to_existing_writer() {
        let mut map = Ledger::new();
        map.insert(stake("aa", 1)).unwrap();
        let standalone = map.to_bytes().unwrap();

        let mut writer = WireWriter::new(Vec::new());
        writer.write_string("prefix").unwrap();
        let before = writer.written();
        map.encode(&mut writer).unwrap();
        assert_eq!(writer.written() - before, standalone.len() as u64);
        assert!(writer.into_inner().ends_with(&standalone));
    }

    #[test]
    fn insert_replaces_same_key() {
        let mut map = Ledger::new();
        assert!(map.insert(stake("aa", 1)).unwrap().is_none());
        let previous = map.insert(stake("AA", 2)).unwrap().unwrap();
        assert_eq!(previous.stake_amount, 1);
        assert_eq!(map.len().unwrap(), 1);
    }

    #[test]
    fn insert_rejects_bad_key_without_mutating() {
        let mut map = Ledger::new();
        let err = map.insert(stake("zz", 1)).unwrap_err();
        assert!(matches!(err.key_error(), Some(KeyError::Format(_))));
        assert!(map.is_empty().unwrap());
    }

    #[test]
    fn remove_returns_record() {
        let mut map = Ledger::new();
        map.insert(stake("aa", 1)).unwrap();
        assert_eq!(map.remove("aa").unwrap().unwrap().stake_amount, 1);
        assert!(map.remove("aa").unwrap().is_none());
    }

    #[test]
    fn max_entries_enforced_before_reading_entries() {
        let bytes = [0x01, 0x05];
        let options = DecodeOptions {
            max_entries: 4,
            ..DecodeOptions::default()
        };
        let err = Ledger::from_bytes_with(&bytes, OpaqueKeyParser, &options).unwrap_err();
        assert!(matches!(err, StateError::TooManyEntries { count: 5, max: 4, .. }));
    }

    #[test]
    fn trailing_bytes_policy() {
        let mut map = Ledger::new();
        map.insert(stake("aa", 1)).unwrap();
        let mut bytes = map.to_bytes().unwrap();
        bytes.push(0xee);

        assert!(matches!(Ledger::from_bytes(&bytes), Err(StateError::Codec(_))));

        let options = DecodeOptions {
            allow_trailing: true,
            ..DecodeOptions::default()
        };
        let decoded = Ledger::from_bytes_with(&bytes, OpaqueKeyParser, &options).unwrap();
        assert_eq!(decoded, map);
    }

    #[test]
    fn huge_declared_count_fails_on_truncation() {
        let mut writer = WireWriter::new(Vec::new());
        writer.write_var_uint(1_000_000).unwrap();
        let err = Ledger::from_bytes(&writer.into_inner()).unwrap_err();
        assert!(matches!(err, StateError::Entry { index: 0, .. }));
    }

    #[test]
    fn checked_sum_overflow() {
        let mut map = Ledger::new();
        map.insert(stake("aa", u64::MAX)).unwrap();
        map.insert(stake("bb", 1)).unwrap();
        assert!(matches!(
            map.checked_sum("stake", |r| r.stake_amount),
            Err(StateError::Overflow { what: "stake" })
        ));
    }
}

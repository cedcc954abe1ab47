//! Canonical binary codec for shard staking state.
//!
//! This crate provides:
//! - [`PeerRecord`] and [`UserPeerStake`], the per-peer bookkeeping records
//! - [`EpochView`] and [`UserLedger`], public-key keyed collections whose
//!   encoding is canonical: entries are written in descending hex peer-key
//!   order so every node emits identical bytes for the same logical state
//! - Decoding that re-derives each map key from the record's own peer key
//!   and rejects duplicates instead of silently dropping a record
//!
//! ## Quick Start
//!
//! ```rust
//! use shardstake_primitives::{Address, OpaqueKeyParser};
//! use shardstake_state::{EpochView, PeerRecord};
//!
//! let mut view = EpochView::<OpaqueKeyParser>::new();
//! view.insert(PeerRecord {
//!     peer_key: "aa".to_string(),
//!     owner: Address::ZERO,
//!     whole_fee: 100,
//!     fee_balance: 40,
//!     ..PeerRecord::default()
//! })?;
//!
//! let bytes = view.to_bytes()?;
//! let restored = EpochView::<OpaqueKeyParser>::from_bytes(&bytes)?;
//! assert_eq!(restored, view);
//!
//! let (peer, _key) = restored.get_peer("aa")?;
//! assert_eq!(peer.fee_balance, 40);
//! # Ok::<(), shardstake_state::StateError>(())
//! ```
//!
//! ## Key Types
//!
//! - [`EpochView`] - peers active in one consensus epoch
//! - [`UserLedger`] - one user's stake against each peer
//! - [`canonical_order`] - the ordering every encoder applies
//! - [`DecodeOptions`] - limits applied while decoding

#![deny(missing_docs)]

/// Canonical entry ordering.
pub mod canonical;
/// Generic public-key keyed collection and its codec.
pub mod collection;
/// Error types for state operations.
pub mod errors;
/// User ledger collection.
pub mod ledger;
/// Record types and their wire codecs.
pub mod record;
/// Epoch view collection.
pub mod view;

pub use canonical::canonical_order;
pub use collection::{DecodeOptions, PeerMap};
pub use errors::StateError;
pub use ledger::UserLedger;
pub use record::{PeerRecord, StakeRecord, UserPeerStake};
pub use view::{EpochView, View};

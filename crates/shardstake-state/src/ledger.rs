use crate::collection::PeerMap;
use crate::errors::StateError;
use crate::record::UserPeerStake;
use shardstake_primitives::{KeyParser, PublicKeyHandle, StandardKeyParser};

/// One user's stake against every peer, keyed by peer public key.
///
/// Wire layout: `varuint(count)` followed by `count` [`UserPeerStake`]s in
/// descending `peer_key` order.
pub type UserLedger<P = StandardKeyParser> = PeerMap<UserPeerStake, P>;

impl<P: KeyParser> PeerMap<UserPeerStake, P> {
    /// Resolves the user's stake against a peer by hex public key.
    pub fn get_stake(
        &self,
        peer_key: &str,
    ) -> Result<(&UserPeerStake, PublicKeyHandle), StateError> {
        self.lookup(peer_key)
    }

    /// Sum of `stake_amount` across peers.
    pub fn total_stake(&self) -> Result<u64, StateError> {
        self.checked_sum("user stake", |stake| stake.stake_amount)
    }

    /// Sum of `unfreeze_amount` across peers.
    pub fn total_unfreeze(&self) -> Result<u64, StateError> {
        self.checked_sum("user unfreeze", |stake| stake.unfreeze_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardstake_primitives::OpaqueKeyParser;

    #[test]
    fn get_stake_and_totals() {
        let mut ledger = UserLedger::<OpaqueKeyParser>::new();
        ledger
            .insert(UserPeerStake {
                peer_key: "aa".to_string(),
                stake_amount: 10,
                unfreeze_amount: 3,
            })
            .unwrap();
        ledger
            .insert(UserPeerStake {
                peer_key: "bb".to_string(),
                stake_amount: 5,
                unfreeze_amount: 0,
            })
            .unwrap();

        let (stake, _) = ledger.get_stake("bb").unwrap();
        assert_eq!(stake.stake_amount, 5);
        assert_eq!(ledger.total_stake().unwrap(), 15);
        assert_eq!(ledger.total_unfreeze().unwrap(), 3);
        assert!(matches!(
            ledger.get_stake("cc"),
            Err(StateError::NotFound { .. })
        ));
    }
}

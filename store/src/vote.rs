//! Vote ledger storage trait.

use crate::StoreError;
use heritage_types::{MonumentId, VoteOutcome, VoteType, VoterToken};

/// Ledger of one record per (monument, voter) pair.
///
/// Keys are `(monument, voter)` pairs and are unique by construction.
pub trait VoteStore {
    /// Apply `requested` to the pair's current state and adjust the
    /// monument's counters accordingly, all in one atomic unit.
    ///
    /// Returns [`StoreError::NotFound`] if the monument does not exist and
    /// [`StoreError::Conflict`] if a concurrent writer forced the attempt to
    /// abort without effect.
    fn cast_vote(
        &self,
        monument: MonumentId,
        voter: &VoterToken,
        requested: VoteType,
    ) -> Result<VoteOutcome, StoreError>;

    /// The pair's current vote, if any.
    fn get_vote(
        &self,
        monument: MonumentId,
        voter: &VoterToken,
    ) -> Result<Option<VoteType>, StoreError>;

    /// Number of ledger records referencing `monument`.
    fn vote_count(&self, monument: MonumentId) -> Result<u64, StoreError>;
}

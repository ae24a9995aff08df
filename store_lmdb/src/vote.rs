//! LMDB implementation of VoteStore.
//!
//! Key format: `monument_id (8 bytes BE) ++ voter token (64 ASCII bytes)`.
//! One key per pair makes the pair unique by construction; the prefix groups
//! a monument's ledger rows for counting and cascade deletes.

use heritage_store::vote::VoteStore;
use heritage_store::StoreError;
use heritage_types::vote::next;
use heritage_types::{
    Monument, MonumentId, VoteOutcome, VoteState, VoteStatus, VoteType, VoterToken,
};

use crate::{LmdbEnvironment, LmdbError};

pub(crate) fn vote_key(monument: MonumentId, voter: &VoterToken) -> Vec<u8> {
    let token = voter.as_bytes();
    let mut key = Vec::with_capacity(8 + token.len());
    key.extend_from_slice(&monument.to_key());
    key.extend_from_slice(token);
    key
}

pub(crate) fn decode_vote(bytes: &[u8]) -> Result<VoteType, LmdbError> {
    match bytes {
        [b] => VoteType::from_byte(*b)
            .ok_or_else(|| LmdbError::Corruption(format!("unknown vote type byte {b}"))),
        _ => Err(LmdbError::Corruption("vote record has unexpected length".into())),
    }
}

impl VoteStore for LmdbEnvironment {
    fn cast_vote(
        &self,
        monument: MonumentId,
        voter: &VoterToken,
        requested: VoteType,
    ) -> Result<VoteOutcome, StoreError> {
        let monument_key = monument.to_key();
        let key = vote_key(monument, voter);

        // A single write transaction: LMDB serialises writers, so the read of
        // the current state and the writes below cannot interleave with
        // another vote. Any early return drops (aborts) the transaction.
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let mut record: Monument = match self
            .monuments_db
            .get(&wtxn, &monument_key)
            .map_err(LmdbError::from)?
        {
            Some(bytes) => bincode::deserialize(bytes).map_err(LmdbError::from)?,
            None => return Err(StoreError::NotFound(format!("monument {monument}"))),
        };

        let current = match self.votes_db.get(&wtxn, &key).map_err(LmdbError::from)? {
            Some(bytes) => VoteState::from(decode_vote(bytes)?),
            None => VoteState::Absent,
        };

        let transition = next(current, requested);
        if transition.is_noop() {
            return Ok(VoteOutcome {
                status: VoteStatus::AlreadyVoted,
                votes_restore: record.votes_restore,
                votes_keep: record.votes_keep,
            });
        }

        let (votes_restore, votes_keep) = transition
            .apply(record.votes_restore, record.votes_keep)
            .ok_or_else(|| {
                StoreError::Corruption(format!(
                    "monument {monument} counters disagree with its ledger"
                ))
            })?;
        record.votes_restore = votes_restore;
        record.votes_keep = votes_keep;

        self.votes_db
            .put(&mut wtxn, &key, &[requested.to_byte()])
            .map_err(LmdbError::from)?;
        let bytes = bincode::serialize(&record).map_err(LmdbError::from)?;
        self.monuments_db
            .put(&mut wtxn, &monument_key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        Ok(VoteOutcome {
            status: VoteStatus::Recorded,
            votes_restore,
            votes_keep,
        })
    }

    fn get_vote(
        &self,
        monument: MonumentId,
        voter: &VoterToken,
    ) -> Result<Option<VoteType>, StoreError> {
        let key = vote_key(monument, voter);
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self.votes_db.get(&rtxn, &key).map_err(LmdbError::from)? {
            Some(bytes) => Ok(Some(decode_vote(bytes)?)),
            None => Ok(None),
        }
    }

    fn vote_count(&self, monument: MonumentId) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self
            .votes_db
            .prefix_iter(&rtxn, &monument.to_key())
            .map_err(LmdbError::from)?;
        let mut count = 0u64;
        for entry in iter {
            entry.map_err(LmdbError::from)?;
            count += 1;
        }
        Ok(count)
    }
}

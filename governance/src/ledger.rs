//! The vote ledger: at most one active vote per (monument, voter).
//!
//! The state machine lives in [`heritage_types::vote::next`]; the store
//! applies it together with the counter deltas in one transaction. This
//! engine validates, retries on conflict and logs.

use heritage_store::VoteStore;
use heritage_types::{MonumentId, VoteOutcome, VoteStatus, VoteType, VoterToken};

use crate::{GovernanceError, RetryPolicy};

/// A voter's current choice for one monument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteStatusView {
    pub has_voted: bool,
    pub vote_type: Option<VoteType>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct VoteLedger {
    retry: RetryPolicy,
}

impl VoteLedger {
    pub fn new(retry: RetryPolicy) -> Self {
        Self { retry }
    }

    /// Cast (or repeat, or change) a vote.
    ///
    /// - no record: insert it, increment the chosen counter → `Recorded`
    /// - same choice: no mutation → `AlreadyVoted`
    /// - other choice: flip it, move one vote between counters → `Recorded`
    ///
    /// Returns the monument's counters after the operation. An unknown
    /// monument yields [`GovernanceError::NotFound`].
    pub fn cast_vote<S: VoteStore + ?Sized>(
        &self,
        store: &S,
        monument: MonumentId,
        voter: &VoterToken,
        vote_type: VoteType,
    ) -> Result<VoteOutcome, GovernanceError> {
        let outcome = self
            .retry
            .run("cast_vote", || store.cast_vote(monument, voter, vote_type))?;

        match outcome.status {
            VoteStatus::Recorded => tracing::debug!(
                monument_id = %monument,
                vote_type = %vote_type,
                votes_restore = outcome.votes_restore,
                votes_keep = outcome.votes_keep,
                "vote recorded"
            ),
            VoteStatus::AlreadyVoted => tracing::debug!(
                monument_id = %monument,
                vote_type = %vote_type,
                "repeat vote ignored"
            ),
        }
        Ok(outcome)
    }

    /// Read a voter's current vote. A visitor without a token has not voted.
    pub fn vote_status<S: VoteStore + ?Sized>(
        &self,
        store: &S,
        monument: MonumentId,
        voter: Option<&VoterToken>,
    ) -> Result<VoteStatusView, GovernanceError> {
        let Some(voter) = voter else {
            return Ok(VoteStatusView {
                has_voted: false,
                vote_type: None,
            });
        };
        let vote_type = store.get_vote(monument, voter)?;
        Ok(VoteStatusView {
            has_voted: vote_type.is_some(),
            vote_type,
        })
    }
}

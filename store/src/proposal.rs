//! Moderation queue storage trait.

use crate::StoreError;
use heritage_types::{Monument, NewMonument, ProposalDraft, ProposalId, ProposedMonument};

pub trait ProposalStore {
    /// Queue a proposal and return it with its new id.
    fn put_proposal(&self, draft: &ProposalDraft) -> Result<ProposedMonument, StoreError>;

    /// Get a proposal by id. Returns [`StoreError::NotFound`] if absent.
    fn get_proposal(&self, id: ProposalId) -> Result<ProposedMonument, StoreError>;

    /// All queued proposals, oldest first.
    fn list_proposals(&self) -> Result<Vec<ProposedMonument>, StoreError>;

    fn proposal_count(&self) -> Result<u64, StoreError>;

    /// Overwrite the fields of a queued proposal. Returns [`StoreError::NotFound`] if absent.
    fn update_proposal(
        &self,
        id: ProposalId,
        draft: &ProposalDraft,
    ) -> Result<ProposedMonument, StoreError>;

    /// Remove a proposal. Returns `false` if it was already gone.
    fn delete_proposal(&self, id: ProposalId) -> Result<bool, StoreError>;

    /// Create a monument from `fields` and remove proposal `id` in one
    /// transaction. Either both happen or neither does; an absent proposal
    /// yields [`StoreError::NotFound`] and no monument.
    fn approve_proposal(
        &self,
        id: ProposalId,
        fields: &NewMonument,
    ) -> Result<Monument, StoreError>;
}

//! Moderation queue for citizen-proposed monuments.

use std::sync::Arc;

use heritage_store::ProposalStore;
use heritage_types::{Monument, NewMonument, ProposalDraft, ProposalId, ProposedMonument};

use crate::{GovernanceError, LogNotifier, ModeratorNotifier, RetryPolicy};

#[derive(Clone)]
pub struct ModerationQueue {
    notifier: Arc<dyn ModeratorNotifier>,
    retry: RetryPolicy,
}

impl ModerationQueue {
    pub fn new(notifier: Arc<dyn ModeratorNotifier>, retry: RetryPolicy) -> Self {
        Self { notifier, retry }
    }

    /// Queue a proposal and notify moderators.
    pub fn submit<S: ProposalStore + ?Sized>(
        &self,
        store: &S,
        draft: &ProposalDraft,
    ) -> Result<ProposedMonument, GovernanceError> {
        draft.validate()?;
        let proposal = self.retry.run("submit_proposal", || store.put_proposal(draft))?;
        tracing::info!(proposal_id = %proposal.id, "proposal queued");
        if let Err(e) = self.notifier.proposal_submitted(&proposal) {
            tracing::warn!(proposal_id = %proposal.id, error = %e, "moderator notification failed");
        }
        Ok(proposal)
    }

    pub fn list<S: ProposalStore + ?Sized>(
        &self,
        store: &S,
    ) -> Result<Vec<ProposedMonument>, GovernanceError> {
        Ok(store.list_proposals()?)
    }

    pub fn get<S: ProposalStore + ?Sized>(
        &self,
        store: &S,
        id: ProposalId,
    ) -> Result<ProposedMonument, GovernanceError> {
        Ok(store.get_proposal(id)?)
    }

    pub fn count<S: ProposalStore + ?Sized>(&self, store: &S) -> Result<u64, GovernanceError> {
        Ok(store.proposal_count()?)
    }

    /// Overwrite a pending proposal. Fails with NotFound once it has been decided.
    pub fn edit<S: ProposalStore + ?Sized>(
        &self,
        store: &S,
        id: ProposalId,
        draft: &ProposalDraft,
    ) -> Result<ProposedMonument, GovernanceError> {
        draft.validate()?;
        let updated = self
            .retry
            .run("edit_proposal", || store.update_proposal(id, draft))?;
        tracing::info!(proposal_id = %id, "proposal edited");
        Ok(updated)
    }

    /// Promote a proposal into a monument. The monument is created and the
    /// proposal removed in one transaction; on any failure the proposal stays
    /// queued and no monument exists.
    pub fn approve<S: ProposalStore + ?Sized>(
        &self,
        store: &S,
        id: ProposalId,
        fields: &NewMonument,
    ) -> Result<Monument, GovernanceError> {
        fields.validate()?;
        let monument = self
            .retry
            .run("approve_proposal", || store.approve_proposal(id, fields))?;
        tracing::info!(
            proposal_id = %id,
            monument_id = %monument.id,
            status = %monument.status,
            "proposal approved"
        );
        Ok(monument)
    }

    /// Discard a proposal. Rejecting one that is already gone succeeds.
    pub fn reject<S: ProposalStore + ?Sized>(
        &self,
        store: &S,
        id: ProposalId,
    ) -> Result<(), GovernanceError> {
        let removed = self.retry.run("reject_proposal", || store.delete_proposal(id))?;
        if removed {
            tracing::info!(proposal_id = %id, "proposal rejected");
        } else {
            tracing::debug!(proposal_id = %id, "reject of absent proposal ignored");
        }
        Ok(())
    }
}

impl Default for ModerationQueue {
    fn default() -> Self {
        Self::new(Arc::new(LogNotifier), RetryPolicy::default())
    }
}

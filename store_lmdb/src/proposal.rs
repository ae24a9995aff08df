//! LMDB implementation of ProposalStore.

use heritage_store::proposal::ProposalStore;
use heritage_store::StoreError;
use heritage_types::{Monument, MonumentId, NewMonument, ProposalDraft, ProposalId, ProposedMonument};

use crate::meta::{MONUMENT_SEQ, PROPOSAL_SEQ};
use crate::{LmdbEnvironment, LmdbError};

impl ProposalStore for LmdbEnvironment {
    fn put_proposal(&self, draft: &ProposalDraft) -> Result<ProposedMonument, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let id = ProposalId::new(self.next_id(&mut wtxn, PROPOSAL_SEQ)?);
        let proposal = draft.clone().into_proposal(id);
        let bytes = bincode::serialize(&proposal).map_err(LmdbError::from)?;
        self.proposals_db
            .put(&mut wtxn, &id.to_key(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(proposal)
    }

    fn get_proposal(&self, id: ProposalId) -> Result<ProposedMonument, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .proposals_db
            .get(&rtxn, &id.to_key())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("proposal {id}")))?;
        let proposal: ProposedMonument = bincode::deserialize(val).map_err(LmdbError::from)?;
        Ok(proposal)
    }

    fn list_proposals(&self) -> Result<Vec<ProposedMonument>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.proposals_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_key, val) = entry.map_err(LmdbError::from)?;
            let proposal: ProposedMonument =
                bincode::deserialize(val).map_err(LmdbError::from)?;
            results.push(proposal);
        }
        Ok(results)
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.proposals_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }

    fn update_proposal(
        &self,
        id: ProposalId,
        draft: &ProposalDraft,
    ) -> Result<ProposedMonument, StoreError> {
        let key = id.to_key();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let exists = self
            .proposals_db
            .get(&wtxn, &key)
            .map_err(LmdbError::from)?
            .is_some();
        if !exists {
            return Err(StoreError::NotFound(format!("proposal {id}")));
        }
        let proposal = draft.clone().into_proposal(id);
        let bytes = bincode::serialize(&proposal).map_err(LmdbError::from)?;
        self.proposals_db
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(proposal)
    }

    fn delete_proposal(&self, id: ProposalId) -> Result<bool, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let existed = self
            .proposals_db
            .delete(&mut wtxn, &id.to_key())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(existed)
    }

    fn approve_proposal(
        &self,
        id: ProposalId,
        fields: &NewMonument,
    ) -> Result<Monument, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let removed = self
            .proposals_db
            .delete(&mut wtxn, &id.to_key())
            .map_err(LmdbError::from)?;
        if !removed {
            return Err(StoreError::NotFound(format!("proposal {id}")));
        }

        let monument_id = MonumentId::new(self.next_id(&mut wtxn, MONUMENT_SEQ)?);
        let monument = Monument::from_new(monument_id, fields.clone());
        let bytes = bincode::serialize(&monument).map_err(LmdbError::from)?;
        self.monuments_db
            .put(&mut wtxn, &monument_id.to_key(), &bytes)
            .map_err(LmdbError::from)?;

        // Nothing above is visible to readers until this commit succeeds.
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(monument)
    }
}

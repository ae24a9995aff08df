//! LMDB implementation of FeedbackStore.

use heritage_store::feedback::FeedbackStore;
use heritage_store::StoreError;
use heritage_types::{Feedback, FeedbackId, NewFeedback, Timestamp};

use crate::meta::FEEDBACK_SEQ;
use crate::{LmdbEnvironment, LmdbError};

impl FeedbackStore for LmdbEnvironment {
    fn put_feedback(
        &self,
        message: &NewFeedback,
        received_at: Timestamp,
    ) -> Result<Feedback, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let id = FeedbackId::new(self.next_id(&mut wtxn, FEEDBACK_SEQ)?);
        let stored = message.clone().into_feedback(id, received_at);
        let bytes = bincode::serialize(&stored).map_err(LmdbError::from)?;
        self.feedback_db
            .put(&mut wtxn, &id.to_key(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(stored)
    }

    fn get_feedback(&self, id: FeedbackId) -> Result<Feedback, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .feedback_db
            .get(&rtxn, &id.to_key())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("feedback {id}")))?;
        let message: Feedback = bincode::deserialize(val).map_err(LmdbError::from)?;
        Ok(message)
    }

    fn list_feedback(&self, limit: usize) -> Result<Vec<Feedback>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in self.feedback_db.rev_iter(&rtxn).map_err(LmdbError::from)? {
            if results.len() >= limit {
                break;
            }
            let (_key, val) = entry.map_err(LmdbError::from)?;
            results.push(bincode::deserialize::<Feedback>(val).map_err(LmdbError::from)?);
        }
        Ok(results)
    }
}

//! Contact-form message storage trait.

use crate::StoreError;
use heritage_types::{Feedback, FeedbackId, NewFeedback, Timestamp};

pub trait FeedbackStore {
    /// Store a message under a freshly allocated id.
    fn put_feedback(
        &self,
        message: &NewFeedback,
        received_at: Timestamp,
    ) -> Result<Feedback, StoreError>;

    fn get_feedback(&self, id: FeedbackId) -> Result<Feedback, StoreError>;

    /// Messages newest first, at most `limit`.
    fn list_feedback(&self, limit: usize) -> Result<Vec<Feedback>, StoreError>;
}

//! Contact-form inbox.

use std::sync::Arc;

use heritage_store::FeedbackStore;
use heritage_types::{Feedback, NewFeedback, Timestamp};

use crate::{GovernanceError, LogNotifier, ModeratorNotifier, RetryPolicy};

#[derive(Clone)]
pub struct FeedbackInbox {
    notifier: Arc<dyn ModeratorNotifier>,
    retry: RetryPolicy,
}

impl FeedbackInbox {
    pub fn new(notifier: Arc<dyn ModeratorNotifier>, retry: RetryPolicy) -> Self {
        Self { notifier, retry }
    }

    /// Store a message, then tell the moderators. The message is kept even
    /// when the notification cannot be delivered.
    pub fn submit<S: FeedbackStore + ?Sized>(
        &self,
        store: &S,
        message: &NewFeedback,
        received_at: Timestamp,
    ) -> Result<Feedback, GovernanceError> {
        message.validate()?;
        let stored = self
            .retry
            .run("submit_feedback", || store.put_feedback(message, received_at))?;
        tracing::info!(feedback_id = %stored.id, "feedback stored");
        if let Err(e) = self.notifier.feedback_received(&stored) {
            tracing::warn!(feedback_id = %stored.id, error = %e, "feedback notification failed");
        }
        Ok(stored)
    }

    /// Newest messages first.
    pub fn recent<S: FeedbackStore + ?Sized>(
        &self,
        store: &S,
        limit: usize,
    ) -> Result<Vec<Feedback>, GovernanceError> {
        Ok(store.list_feedback(limit)?)
    }
}

impl Default for FeedbackInbox {
    fn default() -> Self {
        Self::new(Arc::new(LogNotifier), RetryPolicy::default())
    }
}

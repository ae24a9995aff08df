//! Nullable notifier — records moderation events instead of delivering them.

use heritage_governance::{ModeratorNotifier, NotifyError};
use heritage_types::{Feedback, FeedbackId, ProposalId, ProposedMonument};
use std::sync::Mutex;

#[derive(Default)]
pub struct RecordingNotifier {
    submitted: Mutex<Vec<ProposalId>>,
    feedback: Mutex<Vec<FeedbackId>>,
    undeliverable: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose deliveries all fail. Events are still recorded.
    pub fn failing() -> Self {
        Self {
            undeliverable: true,
            ..Self::default()
        }
    }

    /// Ids of every proposal announced so far, in order.
    pub fn submitted(&self) -> Vec<ProposalId> {
        self.submitted.lock().unwrap().clone()
    }

    /// Ids of every feedback message announced so far, in order.
    pub fn feedback(&self) -> Vec<FeedbackId> {
        self.feedback.lock().unwrap().clone()
    }

    fn outcome(&self) -> Result<(), NotifyError> {
        if self.undeliverable {
            return Err(NotifyError("recording notifier set to fail".into()));
        }
        Ok(())
    }
}

impl ModeratorNotifier for RecordingNotifier {
    fn proposal_submitted(&self, proposal: &ProposedMonument) -> Result<(), NotifyError> {
        self.submitted.lock().unwrap().push(proposal.id);
        self.outcome()
    }

    fn feedback_received(&self, message: &Feedback) -> Result<(), NotifyError> {
        self.feedback.lock().unwrap().push(message.id);
        self.outcome()
    }
}

//! Notification seam for moderation events.
//!
//! Delivery (chat bots, e-mail) lives outside this crate. A delivery error is
//! logged by the caller and never fails the operation that triggered it.

use heritage_types::{Feedback, ProposedMonument};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("notification not delivered: {0}")]
pub struct NotifyError(pub String);

pub trait ModeratorNotifier: Send + Sync {
    /// Called after a proposal has been durably queued.
    fn proposal_submitted(&self, proposal: &ProposedMonument) -> Result<(), NotifyError>;

    /// Called after a contact-form message has been stored.
    fn feedback_received(&self, message: &Feedback) -> Result<(), NotifyError>;
}

/// Writes moderation events to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl ModeratorNotifier for LogNotifier {
    fn proposal_submitted(&self, proposal: &ProposedMonument) -> Result<(), NotifyError> {
        tracing::info!(
            proposal_id = %proposal.id,
            title = %proposal.title,
            latitude = proposal.coordinates.latitude,
            longitude = proposal.coordinates.longitude,
            "new monument proposal awaiting review"
        );
        Ok(())
    }

    fn feedback_received(&self, message: &Feedback) -> Result<(), NotifyError> {
        tracing::info!(
            feedback_id = %message.id,
            name = %message.name,
            email = %message.email,
            message_type = %message.message_type,
            "new feedback message"
        );
        Ok(())
    }
}

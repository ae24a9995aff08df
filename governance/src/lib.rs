//! Citizen voting and moderation for the heritage-site platform.
//!
//! Five cooperating parts:
//! - [`IdentityResolver`]: maps an anonymous visitor to a stable voter token.
//! - [`VoteLedger`]: idempotent vote casting, at most one vote per (monument, voter).
//! - [`MonumentRegistry`]: monument CRUD; never touches the vote counters.
//! - [`ModerationQueue`]: proposals awaiting approval or rejection.
//! - [`FeedbackInbox`]: contact-form messages for the moderators.
//!
//! None of them own a store. Every operation takes the store handle as an
//! argument, so the same engines run against LMDB in production and against
//! the nullable store in tests. Atomicity comes from the store: each
//! multi-record change is one store call, retried a bounded number of times
//! on write conflicts.

pub mod error;
pub mod feedback;
pub mod identity;
pub mod ledger;
pub mod moderation;
pub mod monuments;
pub mod notify;
pub mod retry;

pub use error::GovernanceError;
pub use feedback::FeedbackInbox;
pub use identity::{EntropySource, IdentityResolver, OsEntropy, ResolvedVoter};
pub use ledger::{VoteLedger, VoteStatusView};
pub use moderation::ModerationQueue;
pub use monuments::MonumentRegistry;
pub use notify::{LogNotifier, ModeratorNotifier, NotifyError};
pub use retry::RetryPolicy;

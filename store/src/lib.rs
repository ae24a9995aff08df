//! Abstract storage traits for the heritage-site platform.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.
//!
//! Operations that touch more than one record (casting a vote, approving a
//! proposal, deleting a monument with its votes) are single trait methods so
//! that each backend can run them inside one transaction.

pub mod error;
pub mod feedback;
pub mod meta;
pub mod monument;
pub mod news;
pub mod proposal;
pub mod vote;

pub use error::StoreError;
pub use feedback::FeedbackStore;
pub use meta::MetaStore;
pub use monument::MonumentStore;
pub use news::NewsStore;
pub use proposal::ProposalStore;
pub use vote::VoteStore;

/// Everything the HTTP layer needs from a backend, as one object-safe bound.
pub trait HeritageStore:
    MonumentStore + VoteStore + ProposalStore + NewsStore + FeedbackStore + Send + Sync
{
}

impl<T> HeritageStore for T where
    T: MonumentStore + VoteStore + ProposalStore + NewsStore + FeedbackStore + Send + Sync
{
}

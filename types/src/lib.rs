//! Fundamental types for the heritage-site platform.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! identifiers, voter tokens, coordinates, monument and proposal records,
//! news articles, visitor feedback, and the vote state machine.

pub mod error;
pub mod feedback;
pub mod geo;
pub mod id;
pub mod monument;
pub mod news;
pub mod proposal;
pub mod time;
pub mod vote;
pub mod voter;

pub use error::TypeError;
pub use feedback::{Feedback, NewFeedback};
pub use geo::Coordinates;
pub use id::{FeedbackId, MonumentId, NewsId, ProposalId};
pub use monument::{Monument, MonumentStatus, NewMonument};
pub use news::{NewNewsArticle, NewsArticle, NewsSection};
pub use proposal::{ProposalDraft, ProposedMonument};
pub use time::Timestamp;
pub use vote::{Transition, VoteOutcome, VoteState, VoteStatus, VoteType};
pub use voter::VoterToken;

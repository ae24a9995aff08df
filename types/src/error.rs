//! Validation errors raised when parsing or constructing domain values.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid vote type: {0}")]
    InvalidVoteType(String),

    #[error("invalid monument status: {0}")]
    InvalidStatus(String),

    #[error("invalid news section: {0}")]
    InvalidSection(String),

    #[error("invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("invalid voter token")]
    InvalidVoterToken,

    #[error("invalid e-mail address: {0}")]
    InvalidEmail(String),

    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),
}

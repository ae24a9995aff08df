//! Numeric record identifiers.
//!
//! Identifiers are allocated by the store from per-table sequences and never
//! reused. The big-endian byte form is used as the storage key so that key
//! order matches allocation order.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn get(&self) -> u64 {
                self.0
            }

            /// Big-endian key bytes.
            pub fn to_key(&self) -> [u8; 8] {
                self.0.to_be_bytes()
            }

            /// Decode a key produced by [`Self::to_key`]. Returns `None` on a length mismatch.
            pub fn from_key(bytes: &[u8]) -> Option<Self> {
                let arr: [u8; 8] = bytes.try_into().ok()?;
                Some(Self(u64::from_be_bytes(arr)))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

record_id!(
    /// Identifier of an approved monument.
    MonumentId
);
record_id!(
    /// Identifier of a pending proposal.
    ProposalId
);
record_id!(
    /// Identifier of a news article.
    NewsId
);
record_id!(
    /// Identifier of a visitor feedback message.
    FeedbackId
);

//! Vote types and the per-(monument, voter) state machine.
//!
//! Each pair is in one of three states: absent, restore or keep. [`next`]
//! computes the successor state together with the counter deltas the
//! monument must absorb. It is pure, so the counter invariant can be checked
//! without any store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypeError;

/// A voter's choice for a monument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    /// The monument should be restored.
    Restore,
    /// The monument should be kept as it is.
    Keep,
}

impl VoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restore => "restore",
            Self::Keep => "keep",
        }
    }

    /// Single-byte storage encoding.
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Restore => 1,
            Self::Keep => 2,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(Self::Restore),
            2 => Some(Self::Keep),
            _ => None,
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restore" => Ok(Self::Restore),
            "keep" => Ok(Self::Keep),
            other => Err(TypeError::InvalidVoteType(other.to_string())),
        }
    }
}

/// Current ledger state of one (monument, voter) pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VoteState {
    #[default]
    Absent,
    Restore,
    Keep,
}

impl VoteState {
    pub fn vote_type(&self) -> Option<VoteType> {
        match self {
            Self::Absent => None,
            Self::Restore => Some(VoteType::Restore),
            Self::Keep => Some(VoteType::Keep),
        }
    }
}

impl From<VoteType> for VoteState {
    fn from(v: VoteType) -> Self {
        match v {
            VoteType::Restore => Self::Restore,
            VoteType::Keep => Self::Keep,
        }
    }
}

impl From<Option<VoteType>> for VoteState {
    fn from(v: Option<VoteType>) -> Self {
        v.map(Self::from).unwrap_or(Self::Absent)
    }
}

/// Result of applying a requested vote to a pair's current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: VoteState,
    pub delta_restore: i8,
    pub delta_keep: i8,
}

impl Transition {
    /// Whether the request changes nothing (the voter repeated their vote).
    pub fn is_noop(&self) -> bool {
        self.delta_restore == 0 && self.delta_keep == 0
    }

    /// Apply the deltas to a pair of counters. Returns `None` if a counter
    /// would drop below zero or overflow, which means the stored counters no
    /// longer agree with the ledger.
    pub fn apply(&self, votes_restore: u64, votes_keep: u64) -> Option<(u64, u64)> {
        Some((
            shift(votes_restore, self.delta_restore)?,
            shift(votes_keep, self.delta_keep)?,
        ))
    }
}

fn shift(counter: u64, delta: i8) -> Option<u64> {
    if delta >= 0 {
        counter.checked_add(delta as u64)
    } else {
        counter.checked_sub(delta.unsigned_abs() as u64)
    }
}

/// The ledger transition function.
///
/// | current | requested | new     | Δrestore | Δkeep |
/// |---------|-----------|---------|----------|-------|
/// | absent  | restore   | restore | +1       | 0     |
/// | absent  | keep      | keep    | 0        | +1    |
/// | restore | restore   | restore | 0        | 0     |
/// | keep    | keep      | keep    | 0        | 0     |
/// | restore | keep      | keep    | -1       | +1    |
/// | keep    | restore   | restore | +1       | -1    |
pub fn next(current: VoteState, requested: VoteType) -> Transition {
    let state = VoteState::from(requested);
    let (delta_restore, delta_keep) = match (current, requested) {
        (VoteState::Absent, VoteType::Restore) => (1, 0),
        (VoteState::Absent, VoteType::Keep) => (0, 1),
        (VoteState::Restore, VoteType::Restore) | (VoteState::Keep, VoteType::Keep) => (0, 0),
        (VoteState::Restore, VoteType::Keep) => (-1, 1),
        (VoteState::Keep, VoteType::Restore) => (1, -1),
    };
    Transition {
        state,
        delta_restore,
        delta_keep,
    }
}

/// Whether a vote request changed the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteStatus {
    Recorded,
    AlreadyVoted,
}

/// Outcome of a vote: the status and the monument's post-mutation counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    pub status: VoteStatus,
    pub votes_restore: u64,
    pub votes_keep: u64,
}

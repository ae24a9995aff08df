//! Citizen-submitted monument proposals awaiting moderation.

use serde::{Deserialize, Serialize};

use crate::{Coordinates, ProposalId, TypeError};

/// A queued proposal. It carries no status: it either sits in the queue or is gone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProposedMonument {
    pub id: ProposalId,
    pub title: String,
    pub coordinates: Coordinates,
}

/// Fields of a proposal as submitted or edited.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProposalDraft {
    pub title: String,
    pub coordinates: Coordinates,
}

impl ProposalDraft {
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.title.trim().is_empty() {
            return Err(TypeError::EmptyField("title"));
        }
        Coordinates::new(self.coordinates.latitude, self.coordinates.longitude)?;
        Ok(())
    }

    pub fn into_proposal(self, id: ProposalId) -> ProposedMonument {
        ProposedMonument {
            id,
            title: self.title,
            coordinates: self.coordinates,
        }
    }
}

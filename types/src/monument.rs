//! Monument records and their restoration status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Coordinates, MonumentId, TypeError};

/// Restoration status of a monument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonumentStatus {
    /// Nobody has assessed the site yet.
    #[default]
    NotEvaluated,
    /// The site needs restoration work.
    RequiresRestoration,
    /// The site has been restored.
    Restored,
}

impl MonumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotEvaluated => "not_evaluated",
            Self::RequiresRestoration => "requires_restoration",
            Self::Restored => "restored",
        }
    }

    /// Marker colour used on the public map.
    pub fn color_class(&self) -> &'static str {
        match self {
            Self::NotEvaluated => "gray",
            Self::RequiresRestoration => "red",
            Self::Restored => "green",
        }
    }
}

impl fmt::Display for MonumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonumentStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_evaluated" => Ok(Self::NotEvaluated),
            "requires_restoration" => Ok(Self::RequiresRestoration),
            "restored" => Ok(Self::Restored),
            other => Err(TypeError::InvalidStatus(other.to_string())),
        }
    }
}

/// A recorded heritage site with its vote tallies.
///
/// `votes_restore + votes_keep` always equals the number of ledger records
/// referencing this monument. Only the vote ledger changes the counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Monument {
    pub id: MonumentId,
    pub title: String,
    pub description: String,
    pub city: String,
    pub coordinates: Coordinates,
    pub status: MonumentStatus,
    /// Image file names; the files themselves live in external storage.
    pub images: Vec<String>,
    pub votes_restore: u64,
    pub votes_keep: u64,
}

impl Monument {
    /// Materialise a monument from creation fields with zeroed counters.
    pub fn from_new(id: MonumentId, fields: NewMonument) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            city: fields.city,
            coordinates: fields.coordinates,
            status: fields.status,
            images: fields.images,
            votes_restore: 0,
            votes_keep: 0,
        }
    }

    pub fn total_votes(&self) -> u64 {
        self.votes_restore + self.votes_keep
    }
}

/// Fields supplied when a monument is created (directly or by approving a proposal).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewMonument {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub city: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub status: MonumentStatus,
    #[serde(default)]
    pub images: Vec<String>,
}

impl NewMonument {
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.title.trim().is_empty() {
            return Err(TypeError::EmptyField("title"));
        }
        if self.city.trim().is_empty() {
            return Err(TypeError::EmptyField("city"));
        }
        Coordinates::new(self.coordinates.latitude, self.coordinates.longitude)?;
        Ok(())
    }
}

//! News articles shown on the landing page.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{NewsId, Timestamp, TypeError};

/// Landing-page section an article belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsSection {
    Restored,
    Upcoming,
    Latest,
}

impl NewsSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restored => "restored",
            Self::Upcoming => "upcoming",
            Self::Latest => "latest",
        }
    }
}

impl fmt::Display for NewsSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsSection {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restored" => Ok(Self::Restored),
            "upcoming" => Ok(Self::Upcoming),
            "latest" => Ok(Self::Latest),
            other => Err(TypeError::InvalidSection(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: NewsId,
    pub title: String,
    pub content: String,
    pub section: NewsSection,
    pub image: Option<String>,
    pub additional_images: Vec<String>,
    pub created_at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNewsArticle {
    pub title: String,
    pub content: String,
    pub section: NewsSection,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub additional_images: Vec<String>,
}

impl NewNewsArticle {
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.title.trim().is_empty() {
            return Err(TypeError::EmptyField("title"));
        }
        if self.content.trim().is_empty() {
            return Err(TypeError::EmptyField("content"));
        }
        Ok(())
    }

    pub fn into_article(self, id: NewsId, created_at: Timestamp) -> NewsArticle {
        NewsArticle {
            id,
            title: self.title,
            content: self.content,
            section: self.section,
            image: self.image,
            additional_images: self.additional_images,
            created_at,
        }
    }
}

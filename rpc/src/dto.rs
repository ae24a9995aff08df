//! Request and response bodies.

use heritage_types::{
    Coordinates, Feedback, Monument, MonumentStatus, NewFeedback, NewMonument, NewsArticle,
    NewsSection,
    ProposalDraft, ProposedMonument, TypeError, VoteOutcome, VoteStatus, VoteType,
};
use serde::{Deserialize, Serialize};

use crate::pagination::PaginationMeta;

// ── Generic ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    AlreadyVoted,
}

/// `{"status": "success"}`, optionally with the id of what was created.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            id: None,
        }
    }

    pub fn created(id: u64) -> Self {
        Self {
            status: Status::Success,
            id: Some(id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

// ── Voting ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[serde(deserialize_with = "number_or_string")]
    pub monument_id: u64,
    /// Kept as a string so an unknown value is a 400 with a clear message.
    pub vote_type: String,
}

/// Form-encoded clients send ids as strings; both `1` and `"1"` are accepted.
fn number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("invalid id {s:?}: expected a non-negative integer"))
        }),
    }
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub status: Status,
    pub votes_restore: u64,
    pub votes_keep: u64,
}

impl From<VoteOutcome> for VoteResponse {
    fn from(o: VoteOutcome) -> Self {
        Self {
            status: match o.status {
                VoteStatus::Recorded => Status::Success,
                VoteStatus::AlreadyVoted => Status::AlreadyVoted,
            },
            votes_restore: o.votes_restore,
            votes_keep: o.votes_keep,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatusResponse {
    pub has_voted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vote_type: Option<VoteType>,
}

// ── Monuments ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MonumentView {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: MonumentStatus,
    pub images: Vec<String>,
    pub votes_restore: u64,
    pub votes_keep: u64,
    pub color_class: &'static str,
}

impl From<Monument> for MonumentView {
    fn from(m: Monument) -> Self {
        Self {
            id: m.id.get(),
            color_class: m.status.color_class(),
            title: m.title,
            description: m.description,
            city: m.city,
            latitude: m.coordinates.latitude,
            longitude: m.coordinates.longitude,
            status: m.status,
            images: m.images,
            votes_restore: m.votes_restore,
            votes_keep: m.votes_keep,
        }
    }
}

/// Monument fields as flat JSON, used for direct creation.
#[derive(Debug, Deserialize)]
pub struct MonumentFields {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub status: MonumentStatus,
    #[serde(default)]
    pub images: Vec<String>,
}

impl TryFrom<MonumentFields> for NewMonument {
    type Error = TypeError;

    fn try_from(f: MonumentFields) -> Result<Self, Self::Error> {
        Ok(NewMonument {
            title: f.title,
            description: f.description,
            city: f.city,
            coordinates: Coordinates::new(f.latitude, f.longitude)?,
            status: f.status,
            images: f.images,
        })
    }
}

/// Approval body: the proposal to promote plus the moderator's final fields.
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub proposal_id: u64,
    #[serde(flatten)]
    pub monument: MonumentFields,
}

// ── Proposals ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProposalFields {
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl TryFrom<ProposalFields> for ProposalDraft {
    type Error = TypeError;

    fn try_from(f: ProposalFields) -> Result<Self, Self::Error> {
        Ok(ProposalDraft {
            title: f.title,
            coordinates: Coordinates::new(f.latitude, f.longitude)?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProposalView {
    pub id: u64,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<ProposedMonument> for ProposalView {
    fn from(p: ProposedMonument) -> Self {
        Self {
            id: p.id.get(),
            title: p.title,
            latitude: p.coordinates.latitude,
            longitude: p.coordinates.longitude,
        }
    }
}

// ── News ─────────────────────────────────────────────────────────────────

/// Where uploaded images are served from.
pub const IMAGE_URL_PREFIX: &str = "/static/images/";

#[derive(Debug, Deserialize)]
pub struct NewsFilter {
    pub section: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewsView {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub section: NewsSection,
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub additional_images: Vec<String>,
    pub created_at: u64,
}

impl From<NewsArticle> for NewsView {
    fn from(a: NewsArticle) -> Self {
        Self {
            id: a.id.get(),
            image_url: a.image.as_ref().map(|img| format!("{IMAGE_URL_PREFIX}{img}")),
            title: a.title,
            content: a.content,
            section: a.section,
            image: a.image,
            additional_images: a.additional_images,
            created_at: a.created_at.as_secs(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NewsPage {
    pub news: Vec<NewsView>,
    #[serde(flatten)]
    pub pagination: PaginationMeta,
}

// ── Feedback ─────────────────────────────────────────────────────────────

/// Contact form body. Missing fields read as empty so validation can name them.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeedbackForm {
    pub name: String,
    pub email: String,
    pub message_type: String,
    pub message: String,
}

impl From<FeedbackForm> for NewFeedback {
    fn from(f: FeedbackForm) -> Self {
        Self {
            name: f.name,
            email: f.email,
            message_type: f.message_type,
            message: f.message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedbackView {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub message_type: String,
    pub message: String,
    pub created_at: u64,
}

impl From<Feedback> for FeedbackView {
    fn from(f: Feedback) -> Self {
        Self {
            id: f.id.get(),
            name: f.name,
            email: f.email,
            message_type: f.message_type,
            message: f.message,
            created_at: f.created_at.as_secs(),
        }
    }
}

// ── Stats ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub cities_count: u64,
    pub monuments_count: u64,
    pub pending_proposals: u64,
}

//! Request handlers.
//!
//! Each handler extracts and validates its input, runs the store work on the
//! blocking pool via [`blocking`], and maps the result to JSON. Errors
//! become `{"status":"error","message":…}` through [`RpcError`].

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use heritage_governance::GovernanceError;
use heritage_types::{
    MonumentId, NewFeedback, NewMonument, NewNewsArticle, NewsId, NewsSection, ProposalDraft, ProposalId,
    Timestamp, VoteType,
};
use serde_json::json;

use crate::cookie::{append_set_cookie, read_cookie, voter_cookie};
use crate::dto::{
    ApproveRequest, CityQuery, CountResponse, FeedbackForm, FeedbackView, MonumentFields,
    MonumentView, NewsFilter, NewsPage, NewsView, ProposalFields, ProposalView, StatsResponse, StatusResponse, VoteRequest,
    VoteResponse, VoteStatusResponse,
};
use crate::pagination::{next_cursor, PaginationMeta, PaginationParams};
use crate::state::{blocking, AppState};
use crate::RpcError;

type ApiResult<T> = Result<Json<T>, RpcError>;

/// Header carrying the moderator key.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), RpcError> {
    let Some(expected) = state.config.admin_key.as_deref() else {
        return Err(RpcError::Forbidden);
    };
    let presented = headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if constant_time_eq(presented.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(RpcError::Forbidden)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn require_proposal_reader(state: &AppState, headers: &HeaderMap) -> Result<(), RpcError> {
    if state.config.public_proposals {
        Ok(())
    } else {
        require_admin(state, headers)
    }
}

// ── Health ───────────────────────────────────────────────────────────────

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

// ── Voting ───────────────────────────────────────────────────────────────

/// `POST /api/vote`. Mints a voter cookie on first contact.
pub async fn cast_vote(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Response, RpcError> {
    let Json(req) = payload?;
    let vote_type: VoteType = req.vote_type.parse()?;
    let monument = MonumentId::new(req.monument_id);

    let presented = read_cookie(&headers, &state.config.voter_cookie_name);
    let voter = state.identity.resolve(presented.as_deref())?;
    let token = voter.token.clone();

    let outcome = blocking(&state, move |s| {
        s.ledger.cast_vote(s.store.as_ref(), monument, &token, vote_type)
    })
    .await?;

    let mut response = Json(VoteResponse::from(outcome)).into_response();
    if voter.minted {
        let cookie = voter_cookie(
            &state.config.voter_cookie_name,
            voter.token.as_str(),
            state.config.voter_cookie_max_age_secs,
        );
        append_set_cookie(response.headers_mut(), &cookie)?;
    }
    Ok(response)
}

/// `GET /api/monuments/:id/vote-status`. Never mints a token.
pub async fn vote_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> ApiResult<VoteStatusResponse> {
    let presented = read_cookie(&headers, &state.config.voter_cookie_name);
    let voter = state.identity.existing(presented.as_deref());
    let view = blocking(&state, move |s| {
        s.ledger
            .vote_status(s.store.as_ref(), MonumentId::new(id), voter.as_ref())
    })
    .await?;
    Ok(Json(VoteStatusResponse {
        has_voted: view.has_voted,
        vote_type: view.vote_type,
    }))
}

// ── Monuments ────────────────────────────────────────────────────────────

pub async fn list_monuments(
    State(state): State<Arc<AppState>>,
    query: Result<Query<CityQuery>, QueryRejection>,
) -> ApiResult<Vec<MonumentView>> {
    let Query(query) = query?;
    // Only an absent parameter selects the default; `?city=` matches nothing.
    let city = query
        .city
        .unwrap_or_else(|| state.config.default_city.clone());
    let monuments = blocking(&state, move |s| {
        s.registry.list_by_city(s.store.as_ref(), &city)
    })
    .await?;
    Ok(Json(monuments.into_iter().map(MonumentView::from).collect()))
}

pub async fn get_monument(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<MonumentView> {
    let monument = blocking(&state, move |s| {
        s.registry.get(s.store.as_ref(), MonumentId::new(id))
    })
    .await?;
    Ok(Json(monument.into()))
}

pub async fn create_monument(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<MonumentFields>, JsonRejection>,
) -> ApiResult<StatusResponse> {
    require_admin(&state, &headers)?;
    let Json(fields) = payload?;
    let fields = NewMonument::try_from(fields)?;
    let monument = blocking(&state, move |s| s.registry.create(s.store.as_ref(), &fields)).await?;
    Ok(Json(StatusResponse::created(monument.id.get())))
}

/// `DELETE /api/monuments/:id`. Removes the monument and its votes.
pub async fn delete_monument(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> ApiResult<StatusResponse> {
    require_admin(&state, &headers)?;
    blocking(&state, move |s| {
        s.registry.delete(s.store.as_ref(), MonumentId::new(id))
    })
    .await?;
    Ok(Json(StatusResponse::success()))
}

// ── Proposals ────────────────────────────────────────────────────────────

pub async fn propose_monument(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProposalFields>, JsonRejection>,
) -> ApiResult<StatusResponse> {
    let Json(fields) = payload?;
    let draft = ProposalDraft::try_from(fields)?;
    let proposal = blocking(&state, move |s| s.queue.submit(s.store.as_ref(), &draft)).await?;
    Ok(Json(StatusResponse::created(proposal.id.get())))
}

pub async fn list_proposals(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Vec<ProposalView>> {
    require_proposal_reader(&state, &headers)?;
    let proposals = blocking(&state, |s| s.queue.list(s.store.as_ref())).await?;
    Ok(Json(proposals.into_iter().map(ProposalView::from).collect()))
}

pub async fn count_proposals(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<CountResponse> {
    require_proposal_reader(&state, &headers)?;
    let count = blocking(&state, |s| s.queue.count(s.store.as_ref())).await?;
    Ok(Json(CountResponse { count }))
}

pub async fn get_proposal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> ApiResult<ProposalView> {
    require_proposal_reader(&state, &headers)?;
    let proposal = blocking(&state, move |s| {
        s.queue.get(s.store.as_ref(), ProposalId::new(id))
    })
    .await?;
    Ok(Json(proposal.into()))
}

pub async fn update_proposal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    payload: Result<Json<ProposalFields>, JsonRejection>,
) -> ApiResult<StatusResponse> {
    require_admin(&state, &headers)?;
    let Json(fields) = payload?;
    let draft = ProposalDraft::try_from(fields)?;
    blocking(&state, move |s| {
        s.queue.edit(s.store.as_ref(), ProposalId::new(id), &draft)
    })
    .await?;
    Ok(Json(StatusResponse::success()))
}

/// `DELETE /api/proposed-monuments/:id` and `POST /api/reject-monument/:id`.
pub async fn reject_proposal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> ApiResult<StatusResponse> {
    require_admin(&state, &headers)?;
    blocking(&state, move |s| {
        s.queue.reject(s.store.as_ref(), ProposalId::new(id))
    })
    .await?;
    Ok(Json(StatusResponse::success()))
}

pub async fn approve_proposal(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<ApproveRequest>, JsonRejection>,
) -> ApiResult<StatusResponse> {
    require_admin(&state, &headers)?;
    let Json(req) = payload?;
    let proposal = ProposalId::new(req.proposal_id);
    let fields = NewMonument::try_from(req.monument)?;
    let monument = blocking(&state, move |s| {
        s.queue.approve(s.store.as_ref(), proposal, &fields)
    })
    .await?;
    Ok(Json(StatusResponse::created(monument.id.get())))
}

// ── News ─────────────────────────────────────────────────────────────────

/// `GET /api/news?section=&count=&cursor=`, newest first.
pub async fn list_news(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<NewsFilter>, QueryRejection>,
    page: Result<Query<PaginationParams>, QueryRejection>,
) -> ApiResult<NewsPage> {
    let Query(filter) = filter?;
    let Query(page) = page?;
    let section = filter
        .section
        .as_deref()
        .map(str::parse::<NewsSection>)
        .transpose()?;
    let offset = page.decode_offset();
    let count = page.effective_count();

    let articles = blocking(&state, move |s| {
        Ok(s.store.list_news(section, offset, count as usize)?)
    })
    .await?;
    let cursor = next_cursor(offset, articles.len(), count);
    Ok(Json(NewsPage {
        news: articles.into_iter().map(NewsView::from).collect(),
        pagination: PaginationMeta { cursor },
    }))
}

pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<NewsView> {
    let article = blocking(&state, move |s| Ok(s.store.get_news(NewsId::new(id))?)).await?;
    Ok(Json(article.into()))
}

pub async fn create_news(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<NewNewsArticle>, JsonRejection>,
) -> ApiResult<StatusResponse> {
    require_admin(&state, &headers)?;
    let Json(article) = payload?;
    article.validate()?;
    let stored = blocking(&state, move |s| {
        Ok(s.store.put_news(&article, Timestamp::now())?)
    })
    .await?;
    tracing::info!(news_id = %stored.id, section = %stored.section, "news published");
    Ok(Json(StatusResponse::created(stored.id.get())))
}

pub async fn delete_news(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> ApiResult<StatusResponse> {
    require_admin(&state, &headers)?;
    let id = NewsId::new(id);
    blocking(&state, move |s| {
        if s.store.delete_news(id)? {
            Ok(())
        } else {
            Err(GovernanceError::NotFound(format!("news {id}")))
        }
    })
    .await?;
    tracing::info!(news_id = %id, "news deleted");
    Ok(Json(StatusResponse::success()))
}

// ── Feedback ─────────────────────────────────────────────────────────────

/// `POST /api/feedback`. Public contact form.
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FeedbackForm>, JsonRejection>,
) -> ApiResult<StatusResponse> {
    let Json(form) = payload?;
    let message = NewFeedback::from(form);
    let stored = blocking(&state, move |s| {
        s.inbox.submit(s.store.as_ref(), &message, Timestamp::now())
    })
    .await?;
    Ok(Json(StatusResponse::created(stored.id.get())))
}

/// `GET /api/feedback`. Newest messages, `count` at most.
pub async fn list_feedback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    page: Result<Query<PaginationParams>, QueryRejection>,
) -> ApiResult<Vec<FeedbackView>> {
    require_admin(&state, &headers)?;
    let Query(page) = page?;
    let limit = page.effective_count() as usize;
    let messages = blocking(&state, move |s| s.inbox.recent(s.store.as_ref(), limit)).await?;
    Ok(Json(messages.into_iter().map(FeedbackView::from).collect()))
}

// ── Stats ────────────────────────────────────────────────────────────────

pub async fn stats(State(state): State<Arc<AppState>>) -> ApiResult<StatsResponse> {
    let stats = blocking(&state, |s| {
        Ok(StatsResponse {
            cities_count: s.store.city_count()?,
            monuments_count: s.store.monument_count()?,
            pending_proposals: s.store.proposal_count()?,
        })
    })
    .await?;
    Ok(Json(stats))
}

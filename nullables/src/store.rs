//! Nullable store — thread-safe in-memory storage for testing.
//!
//! All tables live behind one mutex, so every trait method is atomic with
//! respect to every other. Failures can be injected to exercise retry and
//! rollback paths; an injected failure fires before any mutation.

use heritage_store::feedback::FeedbackStore;
use heritage_store::monument::MonumentStore;
use heritage_store::news::NewsStore;
use heritage_store::proposal::ProposalStore;
use heritage_store::vote::VoteStore;
use heritage_store::StoreError;
use heritage_types::vote::next;
use heritage_types::{
    Feedback, FeedbackId, Monument, MonumentId, NewFeedback, NewMonument, NewNewsArticle, NewsArticle, NewsId, NewsSection,
    ProposalDraft, ProposalId, ProposedMonument, Timestamp, VoteOutcome, VoteState, VoteStatus,
    VoteType, VoterToken,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    monuments: BTreeMap<MonumentId, Monument>,
    votes: HashMap<(MonumentId, VoterToken), VoteType>,
    proposals: BTreeMap<ProposalId, ProposedMonument>,
    news: BTreeMap<NewsId, NewsArticle>,
    feedback: BTreeMap<FeedbackId, Feedback>,
    last_monument: u64,
    last_proposal: u64,
    last_news: u64,
    last_feedback: u64,
    conflicts_pending: u32,
    backend_failures_pending: u32,
}

impl Tables {
    /// Consume one injected failure, if any. Called at the top of every write.
    fn injected_failure(&mut self) -> Result<(), StoreError> {
        if self.conflicts_pending > 0 {
            self.conflicts_pending -= 1;
            return Err(StoreError::Conflict("injected conflict".into()));
        }
        if self.backend_failures_pending > 0 {
            self.backend_failures_pending -= 1;
            return Err(StoreError::Backend("injected backend failure".into()));
        }
        Ok(())
    }
}

/// An in-memory implementation of every store trait for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
#[derive(Default)]
pub struct NullStore {
    tables: Mutex<Tables>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` write operations fail with [`StoreError::Conflict`].
    pub fn inject_conflicts(&self, n: u32) {
        self.lock().conflicts_pending = n;
    }

    /// Make the next `n` write operations fail with [`StoreError::Backend`].
    pub fn inject_backend_failures(&self, n: u32) {
        self.lock().backend_failures_pending = n;
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }
}

impl MonumentStore for NullStore {
    fn create_monument(&self, fields: &NewMonument) -> Result<Monument, StoreError> {
        let mut t = self.lock();
        t.injected_failure()?;
        t.last_monument += 1;
        let id = MonumentId::new(t.last_monument);
        let monument = Monument::from_new(id, fields.clone());
        t.monuments.insert(id, monument.clone());
        Ok(monument)
    }

    fn get_monument(&self, id: MonumentId) -> Result<Monument, StoreError> {
        self.lock()
            .monuments
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("monument {id}")))
    }

    fn list_monuments_by_city(&self, city: &str) -> Result<Vec<Monument>, StoreError> {
        Ok(self
            .lock()
            .monuments
            .values()
            .filter(|m| m.city == city)
            .cloned()
            .collect())
    }

    fn monument_count(&self) -> Result<u64, StoreError> {
        Ok(self.lock().monuments.len() as u64)
    }

    fn city_count(&self) -> Result<u64, StoreError> {
        let t = self.lock();
        let cities: HashSet<&str> = t.monuments.values().map(|m| m.city.as_str()).collect();
        Ok(cities.len() as u64)
    }

    fn delete_monument(&self, id: MonumentId) -> Result<bool, StoreError> {
        let mut t = self.lock();
        t.injected_failure()?;
        if t.monuments.remove(&id).is_none() {
            return Ok(false);
        }
        t.votes.retain(|(monument, _), _| *monument != id);
        Ok(true)
    }
}

impl VoteStore for NullStore {
    fn cast_vote(
        &self,
        monument: MonumentId,
        voter: &VoterToken,
        requested: VoteType,
    ) -> Result<VoteOutcome, StoreError> {
        let mut t = self.lock();
        t.injected_failure()?;

        let record = t
            .monuments
            .get(&monument)
            .ok_or_else(|| StoreError::NotFound(format!("monument {monument}")))?;
        let (restore, keep) = (record.votes_restore, record.votes_keep);

        let key = (monument, voter.clone());
        let current = VoteState::from(t.votes.get(&key).copied());
        let transition = next(current, requested);
        if transition.is_noop() {
            return Ok(VoteOutcome {
                status: VoteStatus::AlreadyVoted,
                votes_restore: restore,
                votes_keep: keep,
            });
        }

        let (votes_restore, votes_keep) = transition.apply(restore, keep).ok_or_else(|| {
            StoreError::Corruption(format!("monument {monument} counters disagree with its ledger"))
        })?;
        t.votes.insert(key, requested);
        if let Some(record) = t.monuments.get_mut(&monument) {
            record.votes_restore = votes_restore;
            record.votes_keep = votes_keep;
        }
        Ok(VoteOutcome {
            status: VoteStatus::Recorded,
            votes_restore,
            votes_keep,
        })
    }

    fn get_vote(
        &self,
        monument: MonumentId,
        voter: &VoterToken,
    ) -> Result<Option<VoteType>, StoreError> {
        Ok(self.lock().votes.get(&(monument, voter.clone())).copied())
    }

    fn vote_count(&self, monument: MonumentId) -> Result<u64, StoreError> {
        Ok(self
            .lock()
            .votes
            .keys()
            .filter(|(m, _)| *m == monument)
            .count() as u64)
    }
}

impl ProposalStore for NullStore {
    fn put_proposal(&self, draft: &ProposalDraft) -> Result<ProposedMonument, StoreError> {
        let mut t = self.lock();
        t.injected_failure()?;
        t.last_proposal += 1;
        let id = ProposalId::new(t.last_proposal);
        let proposal = draft.clone().into_proposal(id);
        t.proposals.insert(id, proposal.clone());
        Ok(proposal)
    }

    fn get_proposal(&self, id: ProposalId) -> Result<ProposedMonument, StoreError> {
        self.lock()
            .proposals
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("proposal {id}")))
    }

    fn list_proposals(&self) -> Result<Vec<ProposedMonument>, StoreError> {
        Ok(self.lock().proposals.values().cloned().collect())
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        Ok(self.lock().proposals.len() as u64)
    }

    fn update_proposal(
        &self,
        id: ProposalId,
        draft: &ProposalDraft,
    ) -> Result<ProposedMonument, StoreError> {
        let mut t = self.lock();
        t.injected_failure()?;
        let slot = t
            .proposals
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("proposal {id}")))?;
        *slot = draft.clone().into_proposal(id);
        Ok(slot.clone())
    }

    fn delete_proposal(&self, id: ProposalId) -> Result<bool, StoreError> {
        let mut t = self.lock();
        t.injected_failure()?;
        Ok(t.proposals.remove(&id).is_some())
    }

    fn approve_proposal(
        &self,
        id: ProposalId,
        fields: &NewMonument,
    ) -> Result<Monument, StoreError> {
        let mut t = self.lock();
        t.injected_failure()?;
        if t.proposals.remove(&id).is_none() {
            return Err(StoreError::NotFound(format!("proposal {id}")));
        }
        t.last_monument += 1;
        let monument_id = MonumentId::new(t.last_monument);
        let monument = Monument::from_new(monument_id, fields.clone());
        t.monuments.insert(monument_id, monument.clone());
        Ok(monument)
    }
}

impl NewsStore for NullStore {
    fn put_news(
        &self,
        article: &NewNewsArticle,
        created_at: Timestamp,
    ) -> Result<NewsArticle, StoreError> {
        let mut t = self.lock();
        t.injected_failure()?;
        t.last_news += 1;
        let id = NewsId::new(t.last_news);
        let stored = article.clone().into_article(id, created_at);
        t.news.insert(id, stored.clone());
        Ok(stored)
    }

    fn get_news(&self, id: NewsId) -> Result<NewsArticle, StoreError> {
        self.lock()
            .news
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("news {id}")))
    }

    fn list_news(
        &self,
        section: Option<NewsSection>,
        offset: u64,
        limit: usize,
    ) -> Result<Vec<NewsArticle>, StoreError> {
        Ok(self
            .lock()
            .news
            .values()
            .rev()
            .filter(|a| section.map_or(true, |s| s == a.section))
            .skip(offset as usize)
            .take(limit)
            .cloned()
            .collect())
    }

    fn delete_news(&self, id: NewsId) -> Result<bool, StoreError> {
        let mut t = self.lock();
        t.injected_failure()?;
        Ok(t.news.remove(&id).is_some())
    }
}

impl FeedbackStore for NullStore {
    fn put_feedback(
        &self,
        message: &NewFeedback,
        received_at: Timestamp,
    ) -> Result<Feedback, StoreError> {
        let mut t = self.lock();
        t.injected_failure()?;
        t.last_feedback += 1;
        let id = FeedbackId::new(t.last_feedback);
        let stored = message.clone().into_feedback(id, received_at);
        t.feedback.insert(id, stored.clone());
        Ok(stored)
    }

    fn get_feedback(&self, id: FeedbackId) -> Result<Feedback, StoreError> {
        self.lock()
            .feedback
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("feedback {id}")))
    }

    fn list_feedback(&self, limit: usize) -> Result<Vec<Feedback>, StoreError> {
        Ok(self
            .lock()
            .feedback
            .values()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}

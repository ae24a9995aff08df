//! Integration tests wiring the governance engines to real and nullable
//! stores: identity → vote ledger → counters, and proposal → moderation →
//! monument.

use std::sync::Arc;
use std::thread;

use heritage_governance::{
    FeedbackInbox, GovernanceError, IdentityResolver, ModerationQueue, MonumentRegistry,
    RetryPolicy, VoteLedger,
};
use heritage_nullables::{NullRandom, NullStore, RecordingNotifier};
use heritage_store::{FeedbackStore, HeritageStore, MonumentStore, ProposalStore, VoteStore};
use heritage_store_lmdb::{check_integrity, LmdbEnvironment};
use heritage_types::{
    Coordinates, MonumentId, MonumentStatus, NewFeedback, NewMonument, ProposalDraft, ProposalId,
    Timestamp, VoteStatus, VoteType, VoterToken,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
    let dir = tempfile::tempdir().expect("temp dir");
    let env = LmdbEnvironment::open(dir.path(), 8, 16 * 1024 * 1024).expect("open env");
    (dir, env)
}

fn noginsk() -> Coordinates {
    Coordinates::new(55.8547, 38.4419).unwrap()
}

fn fields(title: &str, city: &str) -> NewMonument {
    NewMonument {
        title: title.into(),
        description: "Памятник архитектуры".into(),
        city: city.into(),
        coordinates: noginsk(),
        status: MonumentStatus::NotEvaluated,
        images: vec!["tower.jpg".into()],
    }
}

fn voter(n: u8) -> VoterToken {
    VoterToken::from_bytes([n; VoterToken::BYTES])
}

fn assert_counters_match_ledger(store: &dyn HeritageStore, id: MonumentId) {
    let m = store.get_monument(id).unwrap();
    assert_eq!(m.total_votes(), store.vote_count(id).unwrap());
}

// ---------------------------------------------------------------------------
// Vote ledger
// ---------------------------------------------------------------------------

fn run_vote_sequence(store: &dyn HeritageStore) {
    let registry = MonumentRegistry;
    let ledger = VoteLedger::default();
    let id = registry
        .create(store, &fields("Водонапорная башня", "Ногинск"))
        .unwrap()
        .id;
    let a = voter(1);

    let first = ledger.cast_vote(store, id, &a, VoteType::Restore).unwrap();
    assert_eq!(first.status, VoteStatus::Recorded);
    assert_eq!((first.votes_restore, first.votes_keep), (1, 0));

    let repeat = ledger.cast_vote(store, id, &a, VoteType::Restore).unwrap();
    assert_eq!(repeat.status, VoteStatus::AlreadyVoted);
    assert_eq!((repeat.votes_restore, repeat.votes_keep), (1, 0));

    let flip = ledger.cast_vote(store, id, &a, VoteType::Keep).unwrap();
    assert_eq!(flip.status, VoteStatus::Recorded);
    assert_eq!((flip.votes_restore, flip.votes_keep), (0, 1));

    let b = voter(2);
    ledger.cast_vote(store, id, &b, VoteType::Keep).unwrap();

    let status = ledger.vote_status(store, id, Some(&a)).unwrap();
    assert!(status.has_voted);
    assert_eq!(status.vote_type, Some(VoteType::Keep));
    let stranger = ledger.vote_status(store, id, Some(&voter(3))).unwrap();
    assert!(!stranger.has_voted);
    assert_eq!(stranger.vote_type, None);

    let m = store.get_monument(id).unwrap();
    assert_eq!((m.votes_restore, m.votes_keep), (0, 2));
    assert_counters_match_ledger(store, id);
}

#[test]
fn vote_sequence_against_null_store() {
    run_vote_sequence(&NullStore::new());
}

#[test]
fn vote_sequence_against_lmdb() {
    let (_dir, env) = temp_env();
    run_vote_sequence(&env);
    let report = check_integrity(&env).unwrap();
    assert!(report.is_healthy(), "{:?}", report.errors);
}

#[test]
fn vote_on_unknown_monument_is_not_found() {
    let store = NullStore::new();
    let err = VoteLedger::default()
        .cast_vote(&store, MonumentId::new(404), &voter(1), VoteType::Keep)
        .unwrap_err();
    assert!(matches!(err, GovernanceError::NotFound(_)));
}

#[test]
fn anonymous_visitor_has_not_voted() {
    let store = NullStore::new();
    let status = VoteLedger::default()
        .vote_status(&store, MonumentId::new(1), None)
        .unwrap();
    assert!(!status.has_voted);
}

#[test]
fn conflicts_within_budget_are_retried() {
    let store = NullStore::new();
    let id = store.create_monument(&fields("Собор", "Ногинск")).unwrap().id;
    store.inject_conflicts(2);
    let outcome = VoteLedger::new(RetryPolicy::new(3))
        .cast_vote(&store, id, &voter(1), VoteType::Restore)
        .unwrap();
    assert_eq!(outcome.status, VoteStatus::Recorded);
    assert_eq!(outcome.votes_restore, 1);
}

#[test]
fn conflicts_beyond_budget_surface_without_effect() {
    let store = NullStore::new();
    let id = store.create_monument(&fields("Собор", "Ногинск")).unwrap().id;
    store.inject_conflicts(5);
    let err = VoteLedger::new(RetryPolicy::new(3))
        .cast_vote(&store, id, &voter(1), VoteType::Restore)
        .unwrap_err();
    assert!(matches!(err, GovernanceError::Conflict(_)));
    assert_eq!(store.vote_count(id).unwrap(), 0);
    assert_eq!(store.get_monument(id).unwrap().total_votes(), 0);
}

#[test]
fn storage_failure_is_not_retried() {
    let store = NullStore::new();
    let id = store.create_monument(&fields("Собор", "Ногинск")).unwrap().id;
    store.inject_backend_failures(1);
    let err = VoteLedger::default()
        .cast_vote(&store, id, &voter(1), VoteType::Keep)
        .unwrap_err();
    assert!(matches!(err, GovernanceError::StorageUnavailable(_)));
    // The single injected failure was consumed; the next call goes through.
    assert!(VoteLedger::default()
        .cast_vote(&store, id, &voter(1), VoteType::Keep)
        .is_ok());
}

fn run_concurrent_voters(store: Arc<dyn HeritageStore>) {
    let id = store.create_monument(&fields("Усадьба", "Ногинск")).unwrap().id;
    let ledger = VoteLedger::default();

    let handles: Vec<_> = (0..24u8)
        .map(|n| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let choice = if n % 3 == 0 { VoteType::Keep } else { VoteType::Restore };
                // Every voter repeats itself; only the first call counts.
                for _ in 0..3 {
                    ledger.cast_vote(store.as_ref(), id, &voter(n), choice).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let m = store.get_monument(id).unwrap();
    assert_eq!(m.votes_keep, 8);
    assert_eq!(m.votes_restore, 16);
    assert_counters_match_ledger(store.as_ref(), id);
}

#[test]
fn concurrent_voters_against_null_store() {
    run_concurrent_voters(Arc::new(NullStore::new()));
}

#[test]
fn concurrent_voters_against_lmdb() {
    let (_dir, env) = temp_env();
    run_concurrent_voters(Arc::new(env));
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

fn draft(title: &str) -> ProposalDraft {
    ProposalDraft {
        title: title.into(),
        coordinates: noginsk(),
    }
}

#[test]
fn submit_notifies_moderators() {
    let store = NullStore::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let queue = ModerationQueue::new(notifier.clone(), RetryPolicy::default());

    let p = queue.submit(&store, &draft("Старая мельница")).unwrap();
    assert_eq!(notifier.submitted(), vec![p.id]);
    assert_eq!(queue.count(&store).unwrap(), 1);
}

#[test]
fn invalid_draft_is_rejected_before_storage() {
    let store = NullStore::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let queue = ModerationQueue::new(notifier.clone(), RetryPolicy::default());

    let err = queue.submit(&store, &draft("   ")).unwrap_err();
    assert!(matches!(err, GovernanceError::InvalidArgument(_)));
    assert!(notifier.submitted().is_empty());
    assert_eq!(store.proposal_count().unwrap(), 0);
}

#[test]
fn undeliverable_notification_keeps_proposal() {
    let store = NullStore::new();
    let notifier = Arc::new(RecordingNotifier::failing());
    let queue = ModerationQueue::new(notifier.clone(), RetryPolicy::default());

    let p = queue.submit(&store, &draft("Мост")).unwrap();
    assert_eq!(notifier.submitted(), vec![p.id]);
    assert_eq!(store.get_proposal(p.id).unwrap(), p);
}

fn run_approval(store: &dyn HeritageStore) {
    let queue = ModerationQueue::default();
    let p = queue.submit(store, &draft("Часовня")).unwrap();

    let monument = queue
        .approve(store, p.id, &fields("Часовня", "Ногинск"))
        .unwrap();
    assert_eq!((monument.votes_restore, monument.votes_keep), (0, 0));
    assert!(matches!(
        store.get_proposal(p.id),
        Err(heritage_store::StoreError::NotFound(_))
    ));
    assert_eq!(store.get_monument(monument.id).unwrap().title, "Часовня");

    // The proposal is gone, so a second approval creates nothing.
    let err = queue
        .approve(store, p.id, &fields("Часовня", "Ногинск"))
        .unwrap_err();
    assert!(matches!(err, GovernanceError::NotFound(_)));
    assert_eq!(store.monument_count().unwrap(), 1);
}

#[test]
fn approval_against_null_store() {
    run_approval(&NullStore::new());
}

#[test]
fn approval_against_lmdb() {
    let (_dir, env) = temp_env();
    run_approval(&env);
}

#[test]
fn failed_approval_leaves_proposal_queued() {
    let store = NullStore::new();
    let queue = ModerationQueue::default();
    let p = queue.submit(&store, &draft("Часовня")).unwrap();

    store.inject_backend_failures(1);
    assert!(queue.approve(&store, p.id, &fields("Часовня", "Ногинск")).is_err());
    assert_eq!(queue.get(&store, p.id).unwrap().title, "Часовня");
    assert_eq!(store.monument_count().unwrap(), 0);
}

#[test]
fn reject_is_idempotent() {
    let store = NullStore::new();
    let queue = ModerationQueue::default();
    let p = queue.submit(&store, &draft("Часовня")).unwrap();

    queue.reject(&store, p.id).unwrap();
    queue.reject(&store, p.id).unwrap();
    queue.reject(&store, ProposalId::new(999)).unwrap();
    assert_eq!(queue.count(&store).unwrap(), 0);
    assert_eq!(store.monument_count().unwrap(), 0);
}

#[test]
fn edit_of_decided_proposal_is_not_found() {
    let store = NullStore::new();
    let queue = ModerationQueue::default();
    let p = queue.submit(&store, &draft("Часовня")).unwrap();

    let edited = queue.edit(&store, p.id, &draft("Часовня Николая")).unwrap();
    assert_eq!(edited.title, "Часовня Николая");

    queue.reject(&store, p.id).unwrap();
    let err = queue.edit(&store, p.id, &draft("поздно")).unwrap_err();
    assert!(matches!(err, GovernanceError::NotFound(_)));
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[test]
fn identity_is_deterministic_with_null_random() {
    let resolver = IdentityResolver::new(Arc::new(NullRandom::new(7)));
    let first = resolver.resolve(None).unwrap();
    let second = resolver.resolve(None).unwrap();
    assert!(first.minted && second.minted);
    assert_ne!(first.token, second.token);

    let kept = resolver.resolve(Some(first.token.as_str())).unwrap();
    assert!(!kept.minted);
    assert_eq!(kept.token, first.token);

    let replaced = resolver.resolve(Some("not-a-token")).unwrap();
    assert!(replaced.minted);
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

/// A visitor proposes a site, a moderator approves it, visitors vote on it,
/// then the city listing reflects the tally.
#[test]
fn proposal_to_tally_in_noginsk() {
    let (_dir, env) = temp_env();
    let queue = ModerationQueue::default();
    let ledger = VoteLedger::default();
    let registry = MonumentRegistry;
    let identity = IdentityResolver::new(Arc::new(NullRandom::default()));

    let p = queue.submit(&env, &draft("Дом купца Шибаева")).unwrap();
    let mut approved = fields("Дом купца Шибаева", "Ногинск");
    approved.status = MonumentStatus::RequiresRestoration;
    let monument = queue.approve(&env, p.id, &approved).unwrap();
    registry
        .create(&env, &fields("Торговые ряды", "Электросталь"))
        .unwrap();

    let visitors: Vec<_> = (0..3)
        .map(|_| identity.resolve(None).unwrap().token)
        .collect();
    ledger
        .cast_vote(&env, monument.id, &visitors[0], VoteType::Restore)
        .unwrap();
    ledger
        .cast_vote(&env, monument.id, &visitors[1], VoteType::Restore)
        .unwrap();
    ledger
        .cast_vote(&env, monument.id, &visitors[2], VoteType::Keep)
        .unwrap();

    let listed = registry.list_by_city(&env, "Ногинск").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, MonumentStatus::RequiresRestoration);
    assert_eq!((listed[0].votes_restore, listed[0].votes_keep), (2, 1));
    assert_eq!(env.city_count().unwrap(), 2);

    registry.delete(&env, monument.id).unwrap();
    assert_eq!(env.vote_count(monument.id).unwrap(), 0);
    assert!(check_integrity(&env).unwrap().is_healthy());
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

fn feedback(message: &str) -> NewFeedback {
    NewFeedback {
        name: "Ирина".into(),
        email: "irina@example.org".into(),
        message_type: "question".into(),
        message: message.into(),
    }
}

fn run_feedback_flow(store: &dyn HeritageStore) {
    let notifier = Arc::new(RecordingNotifier::new());
    let inbox = FeedbackInbox::new(notifier.clone(), RetryPolicy::default());

    let first = inbox
        .submit(store, &feedback("Когда субботник?"), Timestamp::new(100))
        .unwrap();
    let second = inbox
        .submit(store, &feedback("Спасибо за карту"), Timestamp::new(200))
        .unwrap();
    assert_eq!(notifier.feedback(), vec![first.id, second.id]);
    assert!(notifier.submitted().is_empty());

    let recent = inbox.recent(store, 10).unwrap();
    assert_eq!(recent, vec![second.clone(), first.clone()]);
    assert_eq!(store.get_feedback(first.id).unwrap().created_at, Timestamp::new(100));
}

#[test]
fn feedback_flow_null() {
    run_feedback_flow(&NullStore::new());
}

#[test]
fn feedback_flow_lmdb() {
    let (_dir, env) = temp_env();
    run_feedback_flow(&env);
}

#[test]
fn blank_feedback_is_not_stored_or_announced() {
    let store = NullStore::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let inbox = FeedbackInbox::new(notifier.clone(), RetryPolicy::default());

    let err = inbox
        .submit(&store, &feedback(" \n "), Timestamp::new(1))
        .unwrap_err();
    assert!(matches!(err, GovernanceError::InvalidArgument(_)));
    assert!(store.list_feedback(10).unwrap().is_empty());
    assert!(notifier.feedback().is_empty());
}

#[test]
fn undeliverable_notification_keeps_feedback() {
    let store = NullStore::new();
    let notifier = Arc::new(RecordingNotifier::failing());
    let inbox = FeedbackInbox::new(notifier.clone(), RetryPolicy::default());

    let stored = inbox
        .submit(&store, &feedback("Плитка треснула"), Timestamp::new(7))
        .unwrap();
    assert_eq!(notifier.feedback(), vec![stored.id]);
    assert_eq!(store.get_feedback(stored.id).unwrap(), stored);
}

#[test]
fn feedback_write_retries_past_conflicts() {
    let store = NullStore::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let inbox = FeedbackInbox::new(notifier.clone(), RetryPolicy::default());

    store.inject_conflicts(2);
    let stored = inbox
        .submit(&store, &feedback("Повторная попытка"), Timestamp::new(3))
        .unwrap();
    assert_eq!(notifier.feedback(), vec![stored.id]);
    assert_eq!(store.list_feedback(10).unwrap().len(), 1);
}

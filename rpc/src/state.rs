//! Shared handler state.

use std::sync::Arc;

use heritage_governance::{
    FeedbackInbox, GovernanceError, IdentityResolver, LogNotifier, ModerationQueue,
    MonumentRegistry, RetryPolicy, VoteLedger,
};
use heritage_store::HeritageStore;

use crate::RpcError;

/// HTTP-facing settings, derived from the daemon configuration.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// City listed when `GET /api/monuments` has no `city` parameter.
    pub default_city: String,
    pub voter_cookie_name: String,
    pub voter_cookie_max_age_secs: u64,
    pub vote_retry_limit: u32,
    /// Admin routes answer 403 while this is `None`.
    pub admin_key: Option<String>,
    /// Whether proposal reads are open to the public.
    pub public_proposals: bool,
    pub cors_allow_any_origin: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            default_city: "Ногинск".to_string(),
            voter_cookie_name: "session_id".to_string(),
            voter_cookie_max_age_secs: 60 * 60 * 24 * 365,
            vote_retry_limit: RetryPolicy::DEFAULT_ATTEMPTS,
            admin_key: None,
            public_proposals: true,
            cors_allow_any_origin: false,
        }
    }
}

pub struct AppState {
    pub store: Arc<dyn HeritageStore>,
    pub ledger: VoteLedger,
    pub queue: ModerationQueue,
    pub inbox: FeedbackInbox,
    pub registry: MonumentRegistry,
    pub identity: IdentityResolver,
    pub config: RpcConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn HeritageStore>, config: RpcConfig) -> Self {
        let retry = RetryPolicy::new(config.vote_retry_limit);
        Self {
            store,
            ledger: VoteLedger::new(retry),
            queue: ModerationQueue::new(Arc::new(LogNotifier), retry),
            inbox: FeedbackInbox::new(Arc::new(LogNotifier), retry),
            registry: MonumentRegistry,
            identity: IdentityResolver::default(),
            config,
        }
    }

    pub fn with_identity(mut self, identity: IdentityResolver) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_queue(mut self, queue: ModerationQueue) -> Self {
        self.queue = queue;
        self
    }

    pub fn with_inbox(mut self, inbox: FeedbackInbox) -> Self {
        self.inbox = inbox;
        self
    }
}

/// Run a blocking store operation on the blocking pool.
pub(crate) async fn blocking<T, F>(state: &Arc<AppState>, op: F) -> Result<T, RpcError>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> Result<T, GovernanceError> + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || op(&state))
        .await
        .map_err(|e| RpcError::Internal(format!("store task failed: {e}")))?
        .map_err(RpcError::from)
}

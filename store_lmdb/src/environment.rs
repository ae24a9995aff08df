//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::LmdbError;

/// Names of every database the environment creates.
pub(crate) const DATABASE_NAMES: &[&str] =
    &["monuments", "votes", "proposals", "news", "feedback", "meta"];

/// Minimum number of named databases the environment must be opened with.
pub const MIN_MAX_DBS: u32 = 8;

/// Wraps the LMDB environment and all database handles.
///
/// Cloning is cheap; clones share the same environment.
#[derive(Clone)]
pub struct LmdbEnvironment {
    pub(crate) env: Arc<Env>,
    /// `MonumentId` (BE) → bincode `Monument`.
    pub(crate) monuments_db: Database<Bytes, Bytes>,
    /// `MonumentId` (BE) ++ voter token → one vote-type byte.
    pub(crate) votes_db: Database<Bytes, Bytes>,
    /// `ProposalId` (BE) → bincode `ProposedMonument`.
    pub(crate) proposals_db: Database<Bytes, Bytes>,
    /// `NewsId` (BE) → bincode `NewsArticle`.
    pub(crate) news_db: Database<Bytes, Bytes>,
    /// `FeedbackId` (BE) → bincode `Feedback`.
    pub(crate) feedback_db: Database<Bytes, Bytes>,
    /// Schema version and id sequences.
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// The directory is created if missing. `max_dbs` is raised to
    /// [`MIN_MAX_DBS`] if smaller.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per path by this process and
        // the memory map is never modified outside of LMDB transactions.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs.max(MIN_MAX_DBS))
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let monuments_db = env.create_database(&mut wtxn, Some("monuments"))?;
        let votes_db = env.create_database(&mut wtxn, Some("votes"))?;
        let proposals_db = env.create_database(&mut wtxn, Some("proposals"))?;
        let news_db = env.create_database(&mut wtxn, Some("news"))?;
        let feedback_db = env.create_database(&mut wtxn, Some("feedback"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            monuments_db,
            votes_db,
            proposals_db,
            news_db,
            feedback_db,
            meta_db,
        })
    }

    /// The underlying heed environment.
    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }
}

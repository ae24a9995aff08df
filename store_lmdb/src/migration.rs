//! Schema versioning for the LMDB environment.
//!
//! The version lives in `meta`. A fresh environment reads as version 0 and is
//! walked forward one step at a time; each step runs only after the previous
//! one succeeded, and the version is stamped once all steps are done.

use heritage_store::MetaStore;

use crate::LmdbError;

/// Layout written by this build: five named databases, BE id keys,
/// `monument ++ token` vote keys, bincode values.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

pub struct Migrator;

impl Migrator {
    /// Bring the stored schema up to [`CURRENT_SCHEMA_VERSION`] and return
    /// the version found on disk. An environment written by a newer build is
    /// refused untouched.
    pub fn run(meta: &impl MetaStore) -> Result<u32, LmdbError> {
        let found = meta
            .get_schema_version()
            .map_err(|e| LmdbError::Schema(format!("reading version: {e}")))?;

        if found > CURRENT_SCHEMA_VERSION {
            return Err(LmdbError::Schema(format!(
                "environment is at version {found}, this build understands up to {CURRENT_SCHEMA_VERSION}"
            )));
        }
        if found == CURRENT_SCHEMA_VERSION {
            tracing::debug!(version = found, "schema current");
            return Ok(found);
        }

        for from in found..CURRENT_SCHEMA_VERSION {
            tracing::info!(from, to = from + 1, "migrating schema");
            step(from)?;
        }
        meta.set_schema_version(CURRENT_SCHEMA_VERSION)
            .map_err(|e| LmdbError::Schema(format!("stamping version: {e}")))?;
        tracing::info!(from = found, to = CURRENT_SCHEMA_VERSION, "schema migrated");
        Ok(found)
    }
}

/// Upgrade from `from` to `from + 1`.
fn step(from: u32) -> Result<(), LmdbError> {
    match from {
        // The databases are created when the environment opens; stamping is all.
        0 => Ok(()),
        other => Err(LmdbError::Schema(format!("no upgrade path from version {other}"))),
    }
}

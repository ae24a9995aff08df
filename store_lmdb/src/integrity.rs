//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the server starts
//! accepting votes. Besides confirming every table is readable, the check
//! recounts each monument's ledger and compares it with the stored counters.

use std::collections::HashMap;
use std::path::Path;

use heritage_types::{Monument, MonumentId, VoteType};

use crate::environment::DATABASE_NAMES;
use crate::vote::decode_vote;
use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug)]
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub monuments_checked: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check database integrity on startup.
///
/// Read failures and counter mismatches are recorded in the report rather
/// than causing a hard error; only failing to open a read transaction is fatal.
pub fn check_integrity(store: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        databases_checked: 0,
        total_entries: 0,
        monuments_checked: 0,
        errors: Vec::new(),
    };

    let rtxn = store.env.read_txn()?;

    for &db_name in DATABASE_NAMES {
        match store
            .env
            .open_database::<heed::types::Bytes, heed::types::Bytes>(&rtxn, Some(db_name))
        {
            Ok(Some(db)) => {
                report.databases_checked += 1;
                match db.len(&rtxn) {
                    Ok(count) => report.total_entries += count,
                    Err(e) => report
                        .errors
                        .push(format!("failed to read database '{}': {}", db_name, e)),
                }
            }
            Ok(None) => report
                .errors
                .push(format!("database '{}' is missing", db_name)),
            Err(e) => report
                .errors
                .push(format!("failed to open database '{}': {}", db_name, e)),
        }
    }

    // Recount the ledger: (restore, keep) per monument.
    let mut tallies: HashMap<MonumentId, (u64, u64)> = HashMap::new();
    for entry in store.votes_db.iter(&rtxn)? {
        let (key, val) = entry?;
        let Some(monument) = key.get(..8).and_then(MonumentId::from_key) else {
            report.errors.push("vote key shorter than a monument id".into());
            continue;
        };
        let tally = tallies.entry(monument).or_default();
        match decode_vote(val) {
            Ok(VoteType::Restore) => tally.0 += 1,
            Ok(VoteType::Keep) => tally.1 += 1,
            Err(e) => report.errors.push(format!("monument {monument}: {e}")),
        }
    }

    for entry in store.monuments_db.iter(&rtxn)? {
        let (_key, val) = entry?;
        let monument: Monument = match bincode::deserialize(val) {
            Ok(m) => m,
            Err(e) => {
                report.errors.push(format!("undecodable monument record: {e}"));
                continue;
            }
        };
        report.monuments_checked += 1;
        let counted = tallies.remove(&monument.id).unwrap_or((0, 0));
        let stored = (monument.votes_restore, monument.votes_keep);
        if counted != stored {
            report.errors.push(format!(
                "monument {}: counters {:?} disagree with ledger {:?}",
                monument.id, stored, counted
            ));
        }
    }

    for (orphan, _) in tallies {
        report
            .errors
            .push(format!("ledger rows reference missing monument {orphan}"));
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing, which suggests
/// corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}

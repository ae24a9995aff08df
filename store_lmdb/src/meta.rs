//! LMDB implementation of MetaStore, plus the id sequences kept in `meta`.

use heed::RwTxn;

use heritage_store::meta::MetaStore;
use heritage_store::StoreError;

use crate::{LmdbEnvironment, LmdbError};

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

pub(crate) const MONUMENT_SEQ: &[u8] = b"seq:monuments";
pub(crate) const PROPOSAL_SEQ: &[u8] = b"seq:proposals";
pub(crate) const NEWS_SEQ: &[u8] = b"seq:news";
pub(crate) const FEEDBACK_SEQ: &[u8] = b"seq:feedback";

impl LmdbEnvironment {
    /// Allocate the next id from `sequence` inside `wtxn`. Ids start at 1 and
    /// are never reused; the bump is discarded if the transaction aborts.
    pub(crate) fn next_id(&self, wtxn: &mut RwTxn, sequence: &[u8]) -> Result<u64, LmdbError> {
        let last = match self.meta_db.get(wtxn, sequence)? {
            Some(bytes) => {
                let arr: [u8; 8] = bytes.try_into().map_err(|_| {
                    LmdbError::Corruption(format!(
                        "sequence {} has unexpected byte length",
                        String::from_utf8_lossy(sequence)
                    ))
                })?;
                u64::from_be_bytes(arr)
            }
            None => 0,
        };
        let next = last + 1;
        self.meta_db.put(wtxn, sequence, &next.to_be_bytes())?;
        Ok(next)
    }
}

impl MetaStore for LmdbEnvironment {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, key.as_bytes(), value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .meta_db
            .get(&rtxn, key.as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("meta key '{}'", key)))?;
        Ok(val.to_vec())
    }

    fn delete_meta(&self, key: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .delete(&mut wtxn, key.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .meta_db
            .get(&rtxn, SCHEMA_VERSION_KEY)
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Serialization("schema_version has unexpected byte length".into())
                })?;
                Ok(u32::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        let bytes = version.to_le_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, SCHEMA_VERSION_KEY, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

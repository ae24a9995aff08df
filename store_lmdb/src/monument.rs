//! LMDB implementation of MonumentStore.

use std::collections::HashSet;

use heritage_store::monument::MonumentStore;
use heritage_store::StoreError;
use heritage_types::{Monument, MonumentId, NewMonument};

use crate::meta::MONUMENT_SEQ;
use crate::{LmdbEnvironment, LmdbError};

impl LmdbEnvironment {
    /// Iterate every monument, decoding each record.
    fn all_monuments(&self) -> Result<Vec<Monument>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let mut results = Vec::new();
        for entry in self.monuments_db.iter(&rtxn)? {
            let (_key, val) = entry?;
            results.push(bincode::deserialize::<Monument>(val)?);
        }
        Ok(results)
    }
}

impl MonumentStore for LmdbEnvironment {
    fn create_monument(&self, fields: &NewMonument) -> Result<Monument, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let id = MonumentId::new(self.next_id(&mut wtxn, MONUMENT_SEQ)?);
        let monument = Monument::from_new(id, fields.clone());
        let bytes = bincode::serialize(&monument).map_err(LmdbError::from)?;
        self.monuments_db
            .put(&mut wtxn, &id.to_key(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(monument)
    }

    fn get_monument(&self, id: MonumentId) -> Result<Monument, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .monuments_db
            .get(&rtxn, &id.to_key())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("monument {id}")))?;
        let monument: Monument = bincode::deserialize(val).map_err(LmdbError::from)?;
        Ok(monument)
    }

    fn list_monuments_by_city(&self, city: &str) -> Result<Vec<Monument>, StoreError> {
        let mut monuments = self.all_monuments()?;
        monuments.retain(|m| m.city == city);
        Ok(monuments)
    }

    fn monument_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.monuments_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }

    fn city_count(&self) -> Result<u64, StoreError> {
        let monuments = self.all_monuments()?;
        let cities: HashSet<&str> = monuments.iter().map(|m| m.city.as_str()).collect();
        Ok(cities.len() as u64)
    }

    fn delete_monument(&self, id: MonumentId) -> Result<bool, StoreError> {
        let key = id.to_key();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let existed = self
            .monuments_db
            .delete(&mut wtxn, &key)
            .map_err(LmdbError::from)?;
        if !existed {
            return Ok(false);
        }

        // cascade: every ledger row for this monument shares the id prefix
        let vote_keys: Vec<Vec<u8>> = {
            let iter = self
                .votes_db
                .prefix_iter(&wtxn, &key)
                .map_err(LmdbError::from)?;
            let mut keys = Vec::new();
            for entry in iter {
                let (k, _) = entry.map_err(LmdbError::from)?;
                keys.push(k.to_vec());
            }
            keys
        };
        for k in &vote_keys {
            self.votes_db
                .delete(&mut wtxn, k)
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;

        tracing::debug!(monument_id = %id, votes_removed = vote_keys.len(), "monument deleted");
        Ok(true)
    }
}

//! Monument aggregate: CRUD that never writes the vote counters.

use heritage_store::MonumentStore;
use heritage_types::{Monument, MonumentId, NewMonument};

use crate::GovernanceError;

#[derive(Clone, Copy, Debug, Default)]
pub struct MonumentRegistry;

impl MonumentRegistry {
    /// Create a monument directly (administrative path). Counters start at zero.
    pub fn create<S: MonumentStore + ?Sized>(
        &self,
        store: &S,
        fields: &NewMonument,
    ) -> Result<Monument, GovernanceError> {
        fields.validate()?;
        let monument = store.create_monument(fields)?;
        tracing::info!(monument_id = %monument.id, city = %monument.city, "monument created");
        Ok(monument)
    }

    pub fn get<S: MonumentStore + ?Sized>(
        &self,
        store: &S,
        id: MonumentId,
    ) -> Result<Monument, GovernanceError> {
        Ok(store.get_monument(id)?)
    }

    pub fn list_by_city<S: MonumentStore + ?Sized>(
        &self,
        store: &S,
        city: &str,
    ) -> Result<Vec<Monument>, GovernanceError> {
        Ok(store.list_monuments_by_city(city)?)
    }

    /// Delete a monument and its ledger records.
    pub fn delete<S: MonumentStore + ?Sized>(
        &self,
        store: &S,
        id: MonumentId,
    ) -> Result<(), GovernanceError> {
        if store.delete_monument(id)? {
            tracing::info!(monument_id = %id, "monument deleted");
            Ok(())
        } else {
            Err(GovernanceError::NotFound(format!("monument {id}")))
        }
    }
}

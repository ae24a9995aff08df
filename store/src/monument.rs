//! Monument aggregate storage trait.

use crate::StoreError;
use heritage_types::{Monument, MonumentId, NewMonument};

/// CRUD over monument records.
///
/// There is deliberately no method that writes `votes_restore`/`votes_keep`:
/// the counters change only through [`crate::VoteStore::cast_vote`].
pub trait MonumentStore {
    /// Insert a monument with zeroed counters and return it with its new id.
    fn create_monument(&self, fields: &NewMonument) -> Result<Monument, StoreError>;

    /// Get a monument by id. Returns [`StoreError::NotFound`] if absent.
    fn get_monument(&self, id: MonumentId) -> Result<Monument, StoreError>;

    /// All monuments in `city`, in id order.
    fn list_monuments_by_city(&self, city: &str) -> Result<Vec<Monument>, StoreError>;

    fn monument_count(&self) -> Result<u64, StoreError>;

    /// Number of distinct cities that have at least one monument.
    fn city_count(&self) -> Result<u64, StoreError>;

    /// Delete a monument and every ledger record referencing it.
    /// Returns `false` if the monument did not exist.
    fn delete_monument(&self, id: MonumentId) -> Result<bool, StoreError>;
}

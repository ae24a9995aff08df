//! Metadata storage trait (schema version, arbitrary key-value).

use crate::StoreError;

pub trait MetaStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
    fn get_meta(&self, key: &str) -> Result<Vec<u8>, StoreError>;
    fn delete_meta(&self, key: &str) -> Result<(), StoreError>;

    /// Read the stored schema version. Returns 0 if no version has been set.
    fn get_schema_version(&self) -> Result<u32, StoreError>;
    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;
}

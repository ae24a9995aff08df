//! LMDB storage backend for the heritage-site platform.
//!
//! Implements all storage traits from `heritage-store` using the `heed` LMDB
//! bindings. Each table maps to one named LMDB database within a single
//! environment. LMDB admits one write transaction at a time, so every
//! multi-record operation runs serialised inside its own write transaction
//! and either commits whole or is aborted when the transaction is dropped.

pub mod environment;
pub mod error;
pub mod feedback;
pub mod integrity;
pub mod meta;
pub mod migration;
pub mod monument;
pub mod news;
pub mod proposal;
pub mod vote;

pub use environment::{LmdbEnvironment, MIN_MAX_DBS};
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};

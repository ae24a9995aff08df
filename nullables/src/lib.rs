//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies (storage, entropy, notification delivery) are
//! abstracted behind traits. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (e.g. injected write conflicts)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod notify;
pub mod random;
pub mod store;

pub use notify::RecordingNotifier;
pub use random::NullRandom;
pub use store::NullStore;

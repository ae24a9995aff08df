//! HTTP API for the heritage platform.
//!
//! Provides endpoints for:
//! - Voting on monuments (cookie-scoped voter identity)
//! - Monument listing by city and administration
//! - Citizen proposals and their moderation
//! - News articles
//! - Landing-page statistics and a health probe
//!
//! Store calls are blocking (LMDB), so every handler runs them on tokio's
//! blocking pool.

pub mod cookie;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod pagination;
pub mod server;
pub mod state;

pub use error::RpcError;
pub use server::{router, RpcServer};
pub use state::{AppState, RpcConfig};

//! Axum-based HTTP server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::{HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers::{self, ADMIN_KEY_HEADER};
use crate::{AppState, RpcError};

/// Build the full API router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.cors_allow_any_origin);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/vote", post(handlers::cast_vote))
        .route(
            "/api/monuments",
            get(handlers::list_monuments).post(handlers::create_monument),
        )
        .route(
            "/api/monuments/:id",
            get(handlers::get_monument).delete(handlers::delete_monument),
        )
        .route("/api/monuments/:id/vote-status", get(handlers::vote_status))
        .route("/api/propose-monument", post(handlers::propose_monument))
        .route("/api/proposed-monuments", get(handlers::list_proposals))
        .route("/api/proposed-monuments/count", get(handlers::count_proposals))
        .route(
            "/api/proposed-monuments/:id",
            get(handlers::get_proposal)
                .put(handlers::update_proposal)
                .delete(handlers::reject_proposal),
        )
        .route("/api/approve-monument", post(handlers::approve_proposal))
        .route("/api/reject-monument/:id", post(handlers::reject_proposal))
        .route(
            "/api/news",
            get(handlers::list_news).post(handlers::create_news),
        )
        .route(
            "/api/news/:id",
            get(handlers::get_news).delete(handlers::delete_news),
        )
        .route(
            "/api/feedback",
            get(handlers::list_feedback).post(handlers::submit_feedback),
        )
        .route("/api/stats", get(handlers::stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(allow_any_origin: bool) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, COOKIE, HeaderName::from_static(ADMIN_KEY_HEADER)])
        .max_age(Duration::from_secs(60 * 60));
    if allow_any_origin {
        cors.allow_origin(Any)
    } else {
        cors
    }
}

pub struct RpcServer {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
}

impl RpcServer {
    pub fn new(addr: SocketAddr, state: Arc<AppState>) -> Self {
        Self { addr, state }
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn start<F>(self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = router(self.state);
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {}: {e}", self.addr)))?;
        info!(addr = %self.addr, "HTTP API listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        info!("HTTP API stopped");
        Ok(())
    }
}

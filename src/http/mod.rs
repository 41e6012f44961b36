//! HTTP API transport.
//!
//! Mounts the task, capture, reflection, and planner endpoints on an
//! axum router sharing one [`AppState`].

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::GlobalConfig;
use crate::generative::GenerativeTextClient;
use crate::persistence::db::Database;
use crate::planner::Planner;
use crate::{AppError, Result};

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<GlobalConfig>,
    /// Database pool.
    pub db: Arc<Database>,
    /// Process-wide generative text client.
    pub client: Arc<dyn GenerativeTextClient>,
    /// Daily planning pipeline.
    pub planner: Planner,
}

impl AppState {
    /// Assemble state, deriving the planner from the other parts.
    #[must_use]
    pub fn new(
        config: Arc<GlobalConfig>,
        db: Arc<Database>,
        client: Arc<dyn GenerativeTextClient>,
    ) -> Self {
        let planner = Planner::new(Arc::clone(&db), Arc::clone(&client), &config);
        Self {
            config,
            db,
            client,
            planner,
        }
    }
}

/// Build the API router.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/tasks",
            post(handlers::create_task).get(handlers::list_tasks),
        )
        .route("/api/tasks/{id}", patch(handlers::update_task))
        .route("/api/capture", post(handlers::capture))
        .route("/api/reflections", post(handlers::create_reflection))
        .route("/api/planner/daily", get(handlers::daily_plan))
        .with_state(state)
}

/// Bind `127.0.0.1:config.http_port` and serve until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Io` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    let bind = SocketAddr::from(([127, 0, 0, 1], state.config.http_port));
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|err| AppError::Io(format!("failed to bind {bind}: {err}")))?;
    serve_on(listener, state, ct).await
}

/// Serve on an already-bound listener until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Io` if the server fails.
pub async fn serve_on(
    listener: TcpListener,
    state: Arc<AppState>,
    ct: CancellationToken,
) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "http api listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await
        .map_err(|err| AppError::Io(format!("http server failed: {err}")))
}

//! # sbe-http
//!
//! HTTP service for the substrate editor.
//!
//! Routes:
//! - `GET /`: browser form for upload, edit and download
//! - `POST /upload`: store a file and return its `substrate1` record
//! - `POST /update-substrate1`: overwrite the record in a stored file
//! - `GET /download-updated-json/{file_name}`: fetch a stored file
//! - `GET /healthz`: liveness probe
//!
//! Requests are independent read/modify/write cycles against the upload
//! directory. There is no locking: concurrent updates to one file race and
//! the last writer wins.

pub mod config;
pub mod error;
pub mod form;
pub mod routes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use sbe_vault::{Vault, VaultError};

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("cannot open upload directory: {0}")]
    Vault(#[from] VaultError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared, read-only handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub vault: Vault,
}

impl AppState {
    /// Build state from `config`, creating the upload directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError`] if the upload directory cannot be created.
    pub fn new(config: ServerConfig) -> Result<Self, VaultError> {
        let vault = Vault::open(&config.upload_dir)?;
        Ok(Self {
            config: Arc::new(config),
            vault,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(form::index))
        .route("/healthz", get(routes::healthz))
        .route("/upload", post(routes::upload))
        .route("/update-substrate1", post(routes::update_substrate))
        .route(
            "/download-updated-json/{file_name}",
            get(routes::download),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to `config.bind` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns [`ServeError`] if the upload directory or listener cannot be
/// set up, or the server fails while running.
pub async fn serve(config: ServerConfig) -> Result<(), ServeError> {
    let state = AppState::new(config)?;
    let listener = TcpListener::bind(state.config.bind).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        upload_dir = %state.vault.root().display(),
        "server listening"
    );
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}

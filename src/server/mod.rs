//! HTTP front end for a [`Repository`].
//!
//! Routes:
//! - `GET  /topic` - list topics
//! - `GET  /topic/{topic}` - topic summary
//! - `POST /topic/{topic}/message` - publish
//! - `GET  /topic/{topic}/message/{message_id}` - fetch one message
//! - `POST /topic/{topic}/poll` - next window for a subscription
//! - `PUT  /topic/{topic}/subscription/{subscription}/position` - reposition
//!
//! Handlers only see the repository trait; ids and published times are
//! assigned here before a message reaches the store.

mod error;
mod handlers;
mod request;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;

use crate::repository::Repository;

pub use error::{ApiError, ApiJson};
pub use request::{MessageResponse, PollRequest, PublishRequest, SubscriptionPositionRequest};

/// Listener settings.
#[derive(Clone, Debug, clap::Args)]
pub struct ServerConfig {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0", env = "KITSUNE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080, env = "KITSUNE_PORT")]
    pub port: u16,
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    repo: Arc<dyn Repository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }
}

/// Build the router.
pub fn router(repo: Arc<dyn Repository>) -> Router {
    Router::new()
        .route("/topic", get(handlers::get_topics))
        .route("/topic/{topic}", get(handlers::get_topic))
        .route("/topic/{topic}/message", post(handlers::publish))
        .route("/topic/{topic}/message/{message_id}", get(handlers::get_message))
        .route("/topic/{topic}/poll", post(handlers::poll))
        .route(
            "/topic/{topic}/subscription/{subscription}/position",
            put(handlers::set_position),
        )
        .with_state(AppState::new(repo))
}

/// Serve `repo` until Ctrl-C.
pub async fn run(config: &ServerConfig, repo: Arc<dyn Repository>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router(repo))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutting down..."),
        Err(e) => {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}

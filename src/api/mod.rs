//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the HTTP and websocket surface of the league engine using Axum.
// Spectators subscribe to a match over a websocket; the record-keeping side posts match
// saves and events, which flow through the lifecycle orchestrator.
//
// | Component      | Description                                                |
// |----------------|------------------------------------------------------------|
// | API            | Main API structure coordinating routes and services        |
// | Routes         | Handler functions for API endpoints                        |
// | States         | Shared application state                                   |
// | DTOs           | Data transfer objects for API responses                    |
//
//--------------------------------------------------------------------------------------------------
// STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name           | Description                                       | Key Methods       |
// |----------------|---------------------------------------------------|-------------------|
// | AppState       | Shared application state                          | new               |
// | Api            | Main API structure                                | routes, serve     |
// | Error          | API error types                                   | from              |
//--------------------------------------------------------------------------------------------------

mod routes;
mod dto;
mod error;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    Router,
    Extension,
    routing::{get, post},
    http::{Method, header, HeaderValue},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::services::{
    broadcast::{Broadcaster, SubscriptionRegistry},
    match_lifecycle::{MatchLifecycleService, MatchLifecycleServiceImpl},
};
use crate::outbounds::in_memory_store::InMemoryRecordStore;

pub use error::{ApiError, ApiResult};
pub use dto::*;

/// Shared application state accessible by all handlers
pub struct AppState {
    /// Record store matches, events and standings are persisted to
    pub store: Arc<InMemoryRecordStore>,
    /// Live websocket subscriptions per match
    pub registry: Arc<SubscriptionRegistry>,
    /// Orchestrator invoked after every persisted mutation
    pub lifecycle: Arc<dyn MatchLifecycleService>,
    /// Queue depth of each websocket subscriber
    pub subscriber_buffer: usize,
}

impl AppState {
    /// Wires the registry, broadcaster and orchestrator around a record store
    pub fn new(store: Arc<InMemoryRecordStore>, config: &Config) -> Self {
        let registry = Arc::new(SubscriptionRegistry::new());
        let broadcaster = Broadcaster::new(Arc::clone(&registry), config.delivery_timeout);
        let lifecycle = MatchLifecycleServiceImpl::new(
            store.clone(),
            broadcaster,
            config.aggregation_attempts,
        );

        Self {
            store,
            registry,
            lifecycle: Arc::new(lifecycle),
            subscriber_buffer: config.subscriber_buffer,
        }
    }
}

/// Main API structure
pub struct Api {
    /// API address
    addr: SocketAddr,
    /// Origins allowed by the CORS layer
    allowed_origins: Vec<HeaderValue>,
    /// Shared application state
    state: Arc<AppState>,
}

impl Api {
    /// Creates a new API instance
    pub fn new(config: &Config, state: Arc<AppState>) -> Self {
        let allowed_origins = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin {}", origin);
                    None
                }
            })
            .collect();

        Self { addr: config.bind_addr, allowed_origins, state }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Creates all routes for the API
    pub fn routes(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(self.allowed_origins.clone())
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
            ])
            .allow_credentials(true);

        Router::new()
            // Health check
            .route("/health", get(routes::health))

            // Spectator stream
            .route("/ws/match/:match_id", get(routes::watch_match))

            // Mutations from the record-keeping side
            .route("/matches", post(routes::save_match))
            .route("/events", post(routes::record_event))

            // League tables
            .route("/leagues/:league_id/standings", get(routes::get_standings))

            // Attach application state
            .layer(Extension(self.state.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Starts the API server and runs until `shutdown` resolves
    pub async fn serve<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.routes();

        let listener = TcpListener::bind(self.addr).await?;
        info!("API listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

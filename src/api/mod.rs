// src/api/mod.rs — HTTP relay API

pub mod auth;
pub mod handlers;
pub mod types;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::infra::config::{Config, ServerConfig};
use crate::relay::RelayService;
pub use auth::GateSettings;
pub use types::ScenarioRating;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub relay: Arc<RelayService>,
    pub gate: GateSettings,
    /// Prompt ratings submitted by testers; kept for the life of the process.
    pub ratings: Arc<Mutex<Vec<ScenarioRating>>>,
}

impl ApiState {
    pub fn new(relay: RelayService, gate: GateSettings) -> Self {
        Self {
            relay: Arc::new(relay),
            gate,
            ratings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            RelayService::from_config(&config.upstream),
            GateSettings::from(&config.gate),
        )
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {o}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/api/scenarios", get(handlers::list_scenarios))
        .route("/api/scenarios/test", post(handlers::relay_completion))
        .route(
            "/api/scenarios/feedback-generate",
            post(handlers::relay_feedback),
        )
        .route(
            "/api/scenarios/feedback",
            post(handlers::save_rating).get(handlers::list_ratings),
        )
        .route("/api/coming-soon-auth", post(auth::coming_soon_auth))
        .route("/api/health", get(handlers::health))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server (blocks until Ctrl-C).
pub async fn start_server(config: &ServerConfig, state: ApiState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);

    if !state.relay.is_configured() {
        tracing::warn!("Serving without an upstream API key; relay endpoints will return 500");
    }
    let router = build_router(state, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("API server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down API server");
        })
        .await?;
    Ok(())
}

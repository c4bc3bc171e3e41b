//! HTTP gateway for DocQuery.
//!
//! Serves the single-page UI at `/`, the JSON API under `/v1` and a
//! liveness probe at `/health`.
//!
//! Built on Axum for high performance async HTTP.

pub mod api_v1;
pub mod frontend;

use axum::extract::DefaultBodyLimit;
use axum::{Router, response::Json, routing::get};
use docquery_agent::QueryAgent;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub agent: Arc<QueryAgent>,
    /// Base URL that source file names are appended to.
    pub source_link: String,
    pub title: String,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    pub fn new(agent: Arc<QueryAgent>, gateway: &docquery_config::GatewayConfig) -> Self {
        Self {
            agent,
            source_link: gateway.source_link.clone(),
            title: gateway.title.clone(),
        }
    }
}

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", api_v1::v1_router(state))
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
///
/// Builds both collaborator clients and the query agent once; every request
/// shares them.
pub async fn start(config: docquery_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate_credentials()?;

    let provider = docquery_providers::build_from_config(&config)?;
    let store = docquery_vectordb::build_from_config(&config)?;
    let agent = Arc::new(QueryAgent::from_config(&config, provider, store)?);

    let state = Arc::new(GatewayState::new(agent, &config.gateway));
    let app = build_router(state);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    info!(addr = %addr, model = %config.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

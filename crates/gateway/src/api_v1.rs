//! HTTP API v1.
//!
//! Endpoints:
//!
//! - `POST /v1/ask`  — answer a question, with source links
//! - `GET  /v1/info` — model, collection and budget the UI shows

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use docquery_core::error::Error;
use docquery_core::result::QueryResult;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::SharedState;

/// Build the v1 API router (mounted under `/v1`).
pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/ask", post(ask_handler))
        .route("/info", get(info_handler))
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub query: String,
    #[serde(default)]
    pub num_chunks: Option<usize>,
}

/// The query result plus a display URL per source.
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(flatten)]
    pub result: QueryResult,
    pub links: Vec<String>,
}

#[derive(Debug, Serialize)]
struct InfoResponse {
    title: String,
    llm: String,
    context_length: usize,
    version: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// HTTP status for a pipeline failure.
pub fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: Error) -> ApiError {
    let status = error_status(&err);
    if status.is_server_error() {
        warn!(error = %err, "Query failed");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Malformed or incomplete request bodies get the same JSON error shape.
fn bad_body(rejection: JsonRejection) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: rejection.body_text(),
        }),
    )
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn ask_handler(
    State(state): State<SharedState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(payload) = payload.map_err(bad_body)?;
    info!(
        query_len = payload.query.len(),
        num_chunks = ?payload.num_chunks,
        "v1/ask request"
    );

    let result = match payload.num_chunks {
        Some(n) => state.agent.ask_with(&payload.query, n).await,
        None => state.agent.ask(&payload.query).await,
    }
    .map_err(api_error)?;

    let links = result.links(&state.source_link);
    Ok(Json(AskResponse { result, links }))
}

async fn info_handler(State(state): State<SharedState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        title: state.title.clone(),
        llm: state.agent.llm().to_string(),
        context_length: state.agent.context_length(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

//! HTTP JSON API over the live search index.
//!
//! The server starts immediately and builds the index in the background;
//! until the first build commits, responses report `is_loading: true`.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/search?q=&limit=&type=` | Filter the index |
//! | `GET`  | `/records` | The whole committed collection |
//! | `GET`  | `/sources` | Resource reachability |
//! | `POST` | `/rebuild` | Start a rebuild in the background |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "limit must be >= 1" } }
//! ```
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the site itself can
//! query a locally running server.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use fezcodex_index_core::filter::filter_items;
use fezcodex_index_core::models::SearchableRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::index::SearchIndex;
use crate::search::narrow_by_type;
use crate::sources::{get_sources, open_source, ResourceStatus};

#[derive(Clone)]
struct AppState {
    index: Arc<SearchIndex>,
    default_limit: usize,
}

/// Starts the server on `[server].bind` and kicks off the first build.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let index = Arc::new(SearchIndex::new(
        open_source(&config.content)?,
        config.index.catalog(),
    ));
    spawn_rebuild(&index);

    let app = router(index, config.search.default_limit);
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "search server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// The API router, exposed for embedding and tests.
pub fn router(index: Arc<SearchIndex>, default_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/search", get(handle_search))
        .route("/records", get(handle_records))
        .route("/sources", get(handle_sources))
        .route("/rebuild", post(handle_rebuild))
        .layer(cors)
        .with_state(AppState {
            index,
            default_limit,
        })
}

/// Claim a generation now and build it on a background task.
fn spawn_rebuild(index: &Arc<SearchIndex>) -> u64 {
    let generation = index.begin_build();
    let index = index.clone();
    tokio::spawn(async move { index.run_build(generation).await });
    generation
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /search ============

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    is_loading: bool,
    generation: u64,
    /// Matches before `limit` was applied.
    total: usize,
    results: Vec<SearchableRecord>,
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let limit = params.limit.unwrap_or(state.default_limit);
    if limit == 0 {
        return Err(bad_request("limit must be >= 1"));
    }

    let snapshot = state.index.snapshot();
    let matches = filter_items(&snapshot.items, &params.q)
        .into_iter()
        .cloned()
        .collect();
    let mut results = narrow_by_type(matches, params.kind.as_deref());
    let total = results.len();
    results.truncate(limit);

    Ok(Json(SearchResponse {
        query: params.q,
        is_loading: snapshot.is_loading,
        generation: snapshot.generation,
        total,
        results,
    }))
}

// ============ GET /records ============

#[derive(Serialize)]
struct RecordsResponse {
    is_loading: bool,
    generation: u64,
    error: Option<String>,
    skipped_categories: Vec<String>,
    built_at: Option<DateTime<Utc>>,
    items: Vec<SearchableRecord>,
}

async fn handle_records(State(state): State<AppState>) -> Json<RecordsResponse> {
    let snapshot = state.index.snapshot();
    Json(RecordsResponse {
        is_loading: snapshot.is_loading,
        generation: snapshot.generation,
        error: snapshot.error,
        skipped_categories: snapshot.skipped_categories,
        built_at: snapshot.built_at,
        items: snapshot.items.as_ref().clone(),
    })
}

// ============ GET /sources ============

#[derive(Serialize)]
struct SourcesResponse {
    sources: Vec<ResourceStatus>,
}

async fn handle_sources(State(state): State<AppState>) -> Json<SourcesResponse> {
    let sources = get_sources(state.index.source(), state.index.catalog()).await;
    Json(SourcesResponse { sources })
}

// ============ POST /rebuild ============

#[derive(Serialize)]
struct RebuildResponse {
    generation: u64,
}

async fn handle_rebuild(State(state): State<AppState>) -> (StatusCode, Json<RebuildResponse>) {
    let generation = spawn_rebuild(&state.index);
    (StatusCode::ACCEPTED, Json(RebuildResponse { generation }))
}

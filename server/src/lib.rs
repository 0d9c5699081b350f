use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use schoolsearch_core::loader::load_schools;
use schoolsearch_core::{DocId, School, SchoolIndex, SearchConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

/// Upper bound on `k` accepted from clients.
pub const MAX_K: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    /// Defaults to the index's configured top-N.
    #[serde(default)]
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub rank: usize,
    pub doc_id: DocId,
    pub name: String,
    pub city: String,
    pub state: String,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<SchoolIndex>,
}

/// Load the CSV at `data_path`, build the index and wire up the routes.
pub fn build_app<P: AsRef<std::path::Path>>(data_path: P, config: SearchConfig) -> Result<Router> {
    let records = load_schools(data_path)?;
    let index = SchoolIndex::build(records, config)?;
    Ok(router(index))
}

pub fn router(index: SchoolIndex) -> Router {
    let app_state = AppState { index: Arc::new(index) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/school/:doc_id", get(school_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let k = params.k.unwrap_or(state.index.config().top_n).clamp(1, MAX_K);
    let doc_ids = state.index.search_top(&params.q, k);

    let results = doc_ids
        .into_iter()
        .enumerate()
        .filter_map(|(i, doc_id)| {
            let school = state.index.school(doc_id)?;
            Some(SearchHit {
                rank: i + 1,
                doc_id,
                name: school.name.clone(),
                city: school.city.clone(),
                state: school.state.clone(),
            })
        })
        .collect();

    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), results })
}

pub async fn school_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<School>, (StatusCode, String)> {
    match state.index.school(doc_id) {
        Some(school) => Ok(Json(school.clone())),
        None => Err((StatusCode::NOT_FOUND, format!("no school with id {doc_id}"))),
    }
}

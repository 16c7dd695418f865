use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use cinesearch_core::{
    actor_results, load_corpus, rank_with_total, Corpus, DocId, Document, IndexCache, RankParams,
    RankedResult, SearchRequest, DEFAULT_TOP_N,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { DEFAULT_TOP_N }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub mode: &'static str,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub id: DocId,
    pub title: String,
    pub overview: String,
    pub cast: Vec<String>,
    pub score: f32,
}

impl From<RankedResult<'_>> for SearchHit {
    fn from(hit: RankedResult<'_>) -> Self {
        let doc = hit.document;
        Self {
            id: doc.id,
            title: doc.title.clone(),
            overview: doc.overview.clone(),
            cast: doc.cast.clone(),
            score: hit.score,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub corpus: Arc<Corpus>,
    pub cache: Arc<Mutex<IndexCache>>,
}

/// Load the corpus at `corpus_path` and build the router over it.
pub fn build_app(corpus_path: &str) -> Result<Router> {
    let corpus = load_corpus(corpus_path)?;
    Ok(router(corpus))
}

pub fn router(corpus: Corpus) -> Router {
    let state = AppState { corpus: Arc::new(corpus), cache: Arc::new(Mutex::new(IndexCache::new())) };

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
        .route("/movie/:id", get(movie_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let request = SearchRequest::from_inputs(params.actor.as_deref(), params.q.as_deref())
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let k = params.k.clamp(1, 100);

    let (results, total_hits): (Vec<SearchHit>, usize) = match &request {
        SearchRequest::Actor(name) => {
            let hits: Vec<SearchHit> = actor_results(&state.corpus, name).into_iter().map(SearchHit::from).collect();
            let total = hits.len();
            (hits, total)
        }
        SearchRequest::Description(query) => {
            // Only hold the lock long enough to clone the index handle.
            let index = state.cache.lock().get_or_build(&state.corpus);
            let ranking = rank_with_total(&state.corpus, &index, query, RankParams::with_top_n(k));
            (ranking.results.into_iter().map(SearchHit::from).collect(), ranking.total_hits)
        }
    };

    let elapsed = start.elapsed();
    tracing::debug!(mode = request.mode(), hits = results.len(), total_hits, "search served");
    Ok(Json(SearchResponse {
        query: request.query().to_string(),
        mode: request.mode(),
        took_ms: elapsed.as_millis(),
        took_s: elapsed.as_secs_f64(),
        total_hits,
        results,
    }))
}

pub async fn movie_handler(
    State(state): State<AppState>,
    Path(id): Path<DocId>,
) -> Result<Json<Document>, (StatusCode, String)> {
    state
        .corpus
        .find(id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("movie {id} not found")))
}

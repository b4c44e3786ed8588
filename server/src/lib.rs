use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use phrasebook_core::{EngineStats, PhraseBook, SearchEngine, SearchOptions};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub phrases: Arc<PhraseBook>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub category: Option<String>,
    pub level: Option<String>,
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    10
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHitJson>,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub id: String,
    pub score: u32,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
}

pub fn build_app(engine: SearchEngine, phrases: PhraseBook) -> Router {
    let state = AppState { engine: Arc::new(engine), phrases: Arc::new(phrases) };
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/suggest", get(suggest_handler))
        .route("/translate", get(translate_handler))
        .route("/stats", get(stats_handler))
        .with_state(state)
        .layer(cors)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let start = Instant::now();
    let options = SearchOptions {
        category: params.category,
        level: params.level,
        limit: params.k.clamp(1, 100),
    };
    let hits = state.engine.search(&params.q, &options);
    let results: Vec<SearchHitJson> = hits
        .into_iter()
        .map(|hit| SearchHitJson {
            id: hit.record.id.unwrap_or_default(),
            score: hit.score,
            question: hit.record.question,
            answer: hit.record.answer,
            category: hit.record.category,
            level: hit.record.level,
        })
        .collect();
    Json(SearchResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        total_hits: results.len(),
        results,
    })
}

#[derive(Deserialize)]
pub struct SuggestParams {
    pub q: String,
    #[serde(default = "default_suggest_k")]
    pub k: usize,
}

fn default_suggest_k() -> usize {
    5
}

pub async fn suggest_handler(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Json<serde_json::Value> {
    let suggestions = state.engine.suggestions(&params.q, params.k.clamp(1, 50));
    Json(json!({ "query": params.q, "suggestions": suggestions }))
}

#[derive(Deserialize)]
pub struct TranslateParams {
    pub q: String,
}

pub async fn translate_handler(
    State(state): State<AppState>,
    Query(params): Query<TranslateParams>,
) -> Json<serde_json::Value> {
    let translation = state.phrases.lookup(&params.q);
    Json(json!({ "query": params.q, "translation": translation }))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<EngineStats> {
    Json(state.engine.stats())
}

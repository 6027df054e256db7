use anyhow::Result;
use ascent_core::cache::{ArtifactCache, HttpFetcher};
use ascent_core::config::RankingConfig;
use ascent_core::persist::{ArtifactPaths, ARTIFACT_FILES};
use ascent_core::{DocId, SearchEngine};
use axum::body::Bytes;
use axum::{extract::{Path, State}, routing::{get, post}, Json, Router};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod errors;

use errors::ApiError;

/// Where the artifacts live and how to rank against them.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub artifacts_dir: PathBuf,
    /// Object-store prefix to fetch missing artifacts from.
    pub remote_base: Option<String>,
    pub fetch_timeout: Duration,
    pub ranking: RankingConfig,
}

#[derive(Serialize)]
pub struct ArticlesResponse {
    pub query: String,
    pub took_s: f64,
    /// Vocabulary terms the query was compared on.
    pub terms: Vec<String>,
    pub results: Vec<ArticleHit>,
}

#[derive(Serialize)]
pub struct ArticleHit {
    pub doc_id: DocId,
    pub title: String,
    pub url: Option<String>,
    pub content: String,
    pub readability_score: f32,
    pub distance: f32,
    pub rank: usize,
    pub visible: bool,
}

#[derive(Serialize)]
pub struct DocResponse {
    pub doc_id: DocId,
    pub external_id: String,
    pub title: String,
    pub url: Option<String>,
    pub content: String,
    pub readability_score: f32,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
}

/// Fetch any missing artifacts, then load and validate them.
pub async fn load_engine(config: &ServerConfig) -> Result<SearchEngine> {
    if let Some(base) = &config.remote_base {
        let cache = ArtifactCache::new(&config.artifacts_dir, HttpFetcher::new(config.fetch_timeout)?);
        cache.ensure_all(base, &ARTIFACT_FILES).await?;
    }
    let engine = SearchEngine::from_artifacts(&ArtifactPaths::new(&config.artifacts_dir), config.ranking)?;
    Ok(engine)
}

pub fn build_app(engine: SearchEngine) -> Router {
    let app_state = AppState { engine: Arc::new(engine) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
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
        .route("/predict", post(predict_handler))
        .route("/articles", post(articles_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Query text from a JSON payload of any shape: strings are taken verbatim,
/// anything else is serialized back to compact JSON text.
pub fn payload_text(body: &[u8]) -> Result<String, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("request body must be JSON".into()));
    }
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("malformed JSON payload: {e}")))?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Run a corpus scan on the blocking pool; it is CPU-bound and linear in
/// the corpus size.
async fn scan<T, F>(state: &AppState, text: String, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&SearchEngine, String) -> ascent_core::Result<T> + Send + 'static,
{
    let engine = state.engine.clone();
    let outcome = tokio::task::spawn_blocking(move || f(&engine, text))
        .await
        .map_err(|e| ApiError::Internal(format!("ranking task failed: {e}")))?;
    Ok(outcome?)
}

/// Content of the single nearest article.
pub async fn predict_handler(State(state): State<AppState>, body: Bytes) -> Result<Json<String>, ApiError> {
    let text = payload_text(&body)?;
    let best = scan(&state, text, |engine, text| engine.nearest(&text)).await?;
    let doc = state
        .engine
        .document(best.document.doc_id)
        .ok_or_else(|| ApiError::Internal(format!("document {} has no metadata", best.document.doc_id)))?;
    tracing::debug!(doc_id = best.document.doc_id, distance = best.document.distance, "predict");
    Ok(Json(doc.content.clone()))
}

/// The nearest articles ordered by readability, with the display window marked.
pub async fn articles_handler(State(state): State<AppState>, body: Bytes) -> Result<Json<ArticlesResponse>, ApiError> {
    let start = std::time::Instant::now();
    let text = payload_text(&body)?;
    let (rows, terms) = scan(&state, text.clone(), |engine, text| {
        let rows = engine.window(&text)?;
        let terms = engine.query_terms(&text)?.into_iter().map(|(term, _)| term).collect::<Vec<_>>();
        Ok((rows, terms))
    })
    .await?;

    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(doc) = state.engine.document(row.doc_id) {
            results.push(ArticleHit {
                doc_id: row.doc_id,
                title: doc.title.clone(),
                url: doc.url.clone(),
                content: doc.content.clone(),
                readability_score: row.readability_score,
                distance: row.distance,
                rank: row.rank,
                visible: row.visible,
            });
        }
    }
    let took_s = start.elapsed().as_secs_f64();
    tracing::debug!(results = results.len(), took_s, "articles");
    Ok(Json(ArticlesResponse { query: text, took_s, terms, results }))
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<DocResponse>, ApiError> {
    let doc = state.engine.document(doc_id).ok_or_else(|| ApiError::NotFound(format!("document {doc_id} not found")))?;
    Ok(Json(DocResponse {
        doc_id,
        external_id: doc.external_id.clone(),
        title: doc.title.clone(),
        url: doc.url.clone(),
        content: doc.content.clone(),
        readability_score: doc.readability_score,
    }))
}

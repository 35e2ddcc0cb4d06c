use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::types::*;
use crate::error::PlagdexError;
use crate::index;
use crate::models::{current_timestamp, Document};

use super::router::AppState;

/// Error wrapper for API handlers
pub enum ApiError {
    Plagdex(PlagdexError),
    BadRequest(String),
}

impl From<PlagdexError> for ApiError {
    fn from(e: PlagdexError) -> Self {
        ApiError::Plagdex(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::Plagdex(e) => {
                let error_type = match &e {
                    PlagdexError::Io(_) => "io_error",
                    PlagdexError::Json(_) => "json_error",
                    PlagdexError::Serialization(_) => "serialization_error",
                    PlagdexError::FormatMismatch(_) => "format_mismatch",
                    PlagdexError::InvariantViolation(_) => "invariant_violation",
                    PlagdexError::EngineNotLoaded => "engine_not_loaded",
                    PlagdexError::InvalidRequest(_) => "invalid_request",
                    PlagdexError::IndexError(_) => "index_error",
                    PlagdexError::Internal(_) => "internal_error",
                };
                let status = match &e {
                    PlagdexError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, error_type, e.to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
        };

        let error_response = ErrorResponse::new(error_type, message);
        (status, Json(error_response)).into_response()
    }
}

/// Upsert a document into the catalog
pub async fn upsert_document(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpsertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let doc = Document {
        doc_id: req.doc_id,
        text: req.text,
        title: req.title,
        author: req.author,
    };
    state.catalog.upsert_document(&doc)?;
    state.metrics.documents_upserted.inc();

    Ok(Json(UpsertResponse {
        ok: true,
        doc_id: doc.doc_id,
    }))
}

async fn run_corpus_build(
    state: &Arc<AppState>,
    corpus_path: Option<String>,
) -> Result<CorpusBuildResponse, ApiError> {
    let corpus_path = corpus_path
        .map(PathBuf::from)
        .unwrap_or_else(|| state.config.corpus_path.clone());

    let catalog = state.catalog.clone();
    let path = corpus_path.clone();
    let written = tokio::task::spawn_blocking(move || catalog.build_corpus(&path))
        .await
        .map_err(|e| ApiError::Plagdex(PlagdexError::Internal(e.to_string())))??;

    state.metrics.corpus_builds.inc();
    Ok(CorpusBuildResponse {
        ok: true,
        corpus_path: corpus_path.display().to_string(),
        corpus_docs: written,
    })
}

async fn run_index_build(
    state: &Arc<AppState>,
    req: IndexBuildRequest,
) -> Result<IndexBuildResponse, ApiError> {
    let corpus_path = req
        .corpus_path
        .map(PathBuf::from)
        .unwrap_or_else(|| state.config.corpus_path.clone());
    let version = match req.version {
        Some(v) if !v.is_empty() => v,
        _ => format!("v{}", current_timestamp()),
    };
    let index_dir = state.config.index_root.join(&version);

    let start = std::time::Instant::now();
    let dir = index_dir.clone();
    let summary =
        tokio::task::spawn_blocking(move || index::build_index(&corpus_path, &dir))
            .await
            .map_err(|e| ApiError::Plagdex(PlagdexError::Internal(e.to_string())))??;
    state.metrics.record_build(start.elapsed().as_secs_f64());

    Ok(IndexBuildResponse {
        ok: true,
        version,
        index_dir: index_dir.display().to_string(),
        summary,
    })
}

/// Dump the catalog into a corpus JSONL file
pub async fn build_corpus(
    State(state): State<Arc<AppState>>,
    req: Option<Json<CorpusBuildRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let req = req.map(|Json(r)| r).unwrap_or_default();
    let resp = run_corpus_build(&state, req.corpus_path).await?;
    Ok(Json(resp))
}

/// Build a versioned index directory from a corpus
pub async fn build_index(
    State(state): State<Arc<AppState>>,
    req: Option<Json<IndexBuildRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let req = req.map(|Json(r)| r).unwrap_or_default();
    let resp = run_index_build(&state, req).await?;
    Ok(Json(resp))
}

/// Corpus build followed by index build
pub async fn rebuild_index(
    State(state): State<Arc<AppState>>,
    req: Option<Json<IndexBuildRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let req = req.map(|Json(r)| r).unwrap_or_default();
    let corpus = run_corpus_build(&state, req.corpus_path.clone()).await?;
    let build = run_index_build(&state, req).await?;
    Ok(Json(RebuildResponse {
        ok: true,
        corpus,
        build,
    }))
}

/// Persist the current-index pointer
pub async fn set_current(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetCurrentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.index_dir.is_empty() {
        return Err(ApiError::BadRequest("index_dir required".to_string()));
    }
    if !std::path::Path::new(&req.index_dir).exists() {
        return Err(ApiError::BadRequest(format!(
            "index_dir does not exist: {}",
            req.index_dir
        )));
    }

    state.catalog.set_current(&req.version, &req.index_dir)?;
    Ok(Json(SetCurrentResponse {
        ok: true,
        current_version: req.version,
        current_index_dir: req.index_dir,
    }))
}

/// Load an index into the engine, defaulting to the current pointer
pub async fn load_index(
    State(state): State<Arc<AppState>>,
    req: Option<Json<IndexLoadRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let req = req.map(|Json(r)| r).unwrap_or_default();
    let index_dir = match req.index_dir {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let Some((_, dir)) = state.catalog.current_index()? else {
                return Err(ApiError::BadRequest(
                    "no current index set, call /v1/index/set_current".to_string(),
                ));
            };
            PathBuf::from(dir)
        }
    };

    let engine = state.engine.clone();
    let dir = index_dir.clone();
    let summary = tokio::task::spawn_blocking(move || engine.load_index(&dir))
        .await
        .map_err(|e| ApiError::Plagdex(PlagdexError::Internal(e.to_string())))??;
    state.metrics.record_load(summary.docs, summary.postings);

    Ok(Json(IndexLoadResponse {
        ok: true,
        index_dir: index_dir.display().to_string(),
        docs: summary.docs,
        postings: summary.postings,
    }))
}

/// Ranked search over the loaded index
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequestApi>,
) -> Result<impl IntoResponse, ApiError> {
    let start = std::time::Instant::now();

    if req.q.is_empty() {
        return Ok(Json(SearchResponseApi {
            hits_total: 0,
            documents: Vec::new(),
            took_ms: 0,
        }));
    }

    let hits = state.engine.search_text(&req.q, req.top).map_err(|e| {
        state.metrics.record_search_error();
        ApiError::Plagdex(e)
    })?;
    state.metrics.record_search(start.elapsed().as_secs_f64());

    let documents: Vec<SearchDoc> = hits.into_iter().map(SearchDoc::from).collect();
    Ok(Json(SearchResponseApi {
        hits_total: documents.len(),
        documents,
        took_ms: start.elapsed().as_millis() as u64,
    }))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = state.metrics.registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(axum::http::header::CONTENT_TYPE, "text/plain")],
            e.to_string().into_bytes(),
        );
    }

    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4",
        )],
        buffer,
    )
}

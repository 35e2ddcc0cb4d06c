use serde::{Deserialize, Serialize};

use crate::index::BuildSummary;
use crate::models::SearchHit;

/// Request to upsert a document into the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertRequest {
    pub doc_id: String,
    pub text: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertResponse {
    pub ok: bool,
    pub doc_id: String,
}

/// Request to dump the catalog into a corpus JSONL file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusBuildRequest {
    #[serde(default)]
    pub corpus_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusBuildResponse {
    pub ok: bool,
    pub corpus_path: String,
    pub corpus_docs: usize,
}

/// Request to build a versioned index directory from a corpus
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexBuildRequest {
    #[serde(default)]
    pub corpus_path: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexBuildResponse {
    pub ok: bool,
    pub version: String,
    pub index_dir: String,
    #[serde(flatten)]
    pub summary: BuildSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebuildResponse {
    pub ok: bool,
    pub corpus: CorpusBuildResponse,
    pub build: IndexBuildResponse,
}

/// Request to persist the current-index pointer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCurrentRequest {
    #[serde(default)]
    pub version: String,
    pub index_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetCurrentResponse {
    pub ok: bool,
    pub current_version: String,
    pub current_index_dir: String,
}

/// Request to load an index into the engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexLoadRequest {
    #[serde(default)]
    pub index_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexLoadResponse {
    pub ok: bool,
    pub index_dir: String,
    pub docs: u32,
    pub postings: u64,
}

/// Search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequestApi {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_top")]
    pub top: usize,
}

fn default_top() -> usize {
    10
}

/// One hit in the search response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDoc {
    pub doc_id: String,
    pub score: f64,
    #[serde(rename = "J9")]
    pub j9: f64,
    #[serde(rename = "C9")]
    pub c9: f64,
    #[serde(rename = "J13")]
    pub j13: f64,
    #[serde(rename = "C13")]
    pub c13: f64,
    pub cand_hits: u32,
    pub simhash_sim: f64,
}

impl From<SearchHit> for SearchDoc {
    fn from(hit: SearchHit) -> Self {
        Self {
            doc_id: hit.doc_id,
            score: hit.score,
            j9: hit.j9,
            c9: hit.c9,
            j13: hit.j13,
            c13: hit.c13,
            cand_hits: hit.cand_hits,
            simhash_sim: hit.simhash_sim,
        }
    }
}

/// Search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponseApi {
    pub hits_total: usize,
    pub documents: Vec<SearchDoc>,
    pub took_ms: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// API Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

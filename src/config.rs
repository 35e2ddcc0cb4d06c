use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Similarity thresholds published in the index metadata sidecar.
///
/// `plag_thr` marks likely wholesale copies, `partial_thr` partial overlap.
/// Consumers read them from `index_native_meta.json`; the engine itself does
/// not filter by them.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Thresholds {
    pub plag_thr: f64,
    pub partial_thr: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            plag_thr: 0.7,
            partial_thr: 0.3,
        }
    }
}

/// Configuration for the HTTP host process.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Address the HTTP API binds to.
    pub http_addr: String,
    /// Base directory for the document catalog.
    pub data_dir: PathBuf,
    /// Directory under which versioned index directories are created.
    pub index_root: PathBuf,
    /// Default path for the corpus JSONL produced from the catalog.
    pub corpus_path: PathBuf,
    /// Default number of hits returned by a search.
    pub default_top: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            data_dir: PathBuf::from("./data"),
            index_root: PathBuf::from("./data/index"),
            corpus_path: PathBuf::from("./data/corpus.jsonl"),
            default_top: 10,
        }
    }
}

impl ServiceConfig {
    /// Directory holding the catalog keyspaces.
    pub fn catalog_dir(&self) -> PathBuf {
        self.data_dir.join("catalog")
    }
}

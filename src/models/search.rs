use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One scored hit returned by the search engine.
///
/// `score` is the 9-gram Jaccard similarity (`j9`); `j13`/`c13` are reserved
/// for a longer-shingle index and are always 0.0 in this version.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchHit {
    /// External document identifier.
    pub doc_id: String,
    /// Dense internal index within the loaded index.
    pub doc_idx: u32,
    pub score: f64,
    pub j9: f64,
    pub c9: f64,
    pub j13: f64,
    pub c13: f64,
    /// Number of query-shingle posting matches accumulated for the document.
    pub cand_hits: u32,
    /// SimHash-128 similarity between query and document fingerprints.
    pub simhash_sim: f64,
}

/// Summary of a successful index load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoadSummary {
    pub index_dir: PathBuf,
    pub docs: u32,
    pub postings: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_serializes_reserved_fields() {
        let hit = SearchHit {
            doc_id: "A".to_string(),
            doc_idx: 0,
            score: 0.5,
            j9: 0.5,
            c9: 1.0,
            j13: 0.0,
            c13: 0.0,
            cand_hits: 1,
            simhash_sim: 1.0,
        };
        let json = serde_json::to_string(&hit).unwrap();
        assert!(json.contains("\"j13\":0.0"));
        assert!(json.contains("\"cand_hits\":1"));
    }
}

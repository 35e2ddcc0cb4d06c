use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use tracing::info;

use crate::error::PlagdexError;
use crate::index::IndexReader;
use crate::models::{LoadSummary, SearchHit};
use crate::tokenizer::{normalize, shingle_hashes, simhash128, tokenize_spans, SHINGLE_K};
use crate::Result;

use super::scoring::{containment9, jaccard9, simhash_similarity};

/// Long-lived search engine hosting at most one loaded index.
///
/// `load_index` calls are serialized and swap the index pointer atomically;
/// a failed load leaves the previous index untouched. Searches take a
/// snapshot of the pointer and run lock-free against immutable data, so an
/// in-flight search keeps its index alive across a concurrent reload.
pub struct SearchEngine {
    index: ArcSwapOption<IndexReader>,
    load_lock: Mutex<()>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self {
            index: ArcSwapOption::empty(),
            load_lock: Mutex::new(()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.index.load().is_some()
    }

    /// Parse and validate an index directory, then make it current.
    pub fn load_index(&self, index_dir: &Path) -> Result<LoadSummary> {
        let _guard = self.load_lock.lock();

        let reader = IndexReader::open(index_dir)?;
        let summary = LoadSummary {
            index_dir: index_dir.to_path_buf(),
            docs: reader.n_docs(),
            postings: reader.n_post9(),
        };
        self.index.store(Some(Arc::new(reader)));
        info!(
            index_dir = %index_dir.display(),
            docs = summary.docs,
            postings = summary.postings,
            "index loaded"
        );
        Ok(summary)
    }

    /// Rank documents against a text query.
    ///
    /// Returns up to `top` hits in descending score order; a query with
    /// fewer than K tokens yields zero hits. Fails only when no index is
    /// loaded.
    pub fn search_text(&self, query: &str, top: usize) -> Result<Vec<SearchHit>> {
        let index = self
            .index
            .load_full()
            .ok_or(PlagdexError::EngineNotLoaded)?;
        Ok(search_index(&index, query, top))
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn search_index(index: &IndexReader, query: &str, top: usize) -> Vec<SearchHit> {
    let norm = normalize(query);
    let spans = tokenize_spans(&norm);
    if spans.len() < SHINGLE_K {
        return Vec::new();
    }

    // The multiset of query shingle occurrences, matching the builder's
    // duplicate-preserving emission.
    let hashes: Vec<u64> = shingle_hashes(&norm, &spans).collect();
    let query_shingles = hashes.len() as u64;
    let query_simhash = simhash128(&norm, &spans);

    let mut cand_hits: HashMap<u32, u32> = HashMap::new();
    for &hash in &hashes {
        for i in index.postings_range(hash) {
            *cand_hits.entry(index.posting(i).doc_idx).or_insert(0) += 1;
        }
    }

    let mut hits: Vec<SearchHit> = cand_hits
        .into_iter()
        .map(|(doc_idx, hits)| {
            let meta = index.doc_meta(doc_idx);
            // Stride-1 shingle count of the document, clamped to >= 1.
            let doc_shingles = (meta.tok_len as u64)
                .saturating_sub(SHINGLE_K as u64 - 1)
                .max(1);
            let j9 = jaccard9(hits, query_shingles, doc_shingles);
            let c9 = containment9(hits, query_shingles, doc_shingles);
            SearchHit {
                doc_id: index.doc_id(doc_idx).to_string(),
                doc_idx,
                score: j9,
                j9,
                c9,
                j13: 0.0,
                c13: 0.0,
                cand_hits: hits,
                simhash_sim: simhash_similarity(
                    query_simhash,
                    (meta.simhash_hi, meta.simhash_lo),
                ),
            }
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.cand_hits.cmp(&a.cand_hits))
            .then_with(|| a.doc_idx.cmp(&b.doc_idx))
    });
    hits.truncate(top);
    hits
}

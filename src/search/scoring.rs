//! Scoring functions for shingle-overlap search

/// Jaccard-style similarity over 9-gram multisets.
///
/// `query_shingles` and `doc_shingles` are multiset sizes; `cand_hits` is
/// the accumulated posting-match count. A non-positive union estimate (only
/// possible with heavy shingle repetition on both sides) scores 0.0.
pub fn jaccard9(cand_hits: u32, query_shingles: u64, doc_shingles: u64) -> f64 {
    let union = query_shingles as i64 + doc_shingles as i64 - cand_hits as i64;
    if union <= 0 {
        return 0.0;
    }
    cand_hits as f64 / union as f64
}

/// Containment-style similarity over 9-gram multisets.
pub fn containment9(cand_hits: u32, query_shingles: u64, doc_shingles: u64) -> f64 {
    let smaller = query_shingles.min(doc_shingles).max(1);
    cand_hits as f64 / smaller as f64
}

/// Similarity of two SimHash-128 fingerprints: `1 - hamming/128`.
pub fn simhash_similarity(a: (u64, u64), b: (u64, u64)) -> f64 {
    let distance = (a.0 ^ b.0).count_ones() + (a.1 ^ b.1).count_ones();
    1.0 - distance as f64 / 128.0
}

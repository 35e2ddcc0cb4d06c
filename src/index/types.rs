//! Core types and constants for the shingle index

use serde::{Deserialize, Serialize};

/// Magic bytes at offset 0 of `index_native.bin`.
pub const INDEX_MAGIC: [u8; 4] = *b"PLAG";
/// Binary format version understood by this build.
pub const INDEX_VERSION: u32 = 1;

/// Tokens beyond this cap are dropped before fingerprinting.
pub const MAX_TOKENS_PER_DOC: usize = 100_000;
/// Postings emitted per document are capped at this count.
pub const MAX_SHINGLES_PER_DOC: usize = 50_000;
/// Token advance between consecutive shingle windows.
pub const SHINGLE_STRIDE: usize = 1;

/// File names within an index directory.
pub const INDEX_BIN: &str = "index_native.bin";
pub const INDEX_DOCIDS: &str = "index_native_docids.json";
pub const INDEX_META: &str = "index_native_meta.json";

/// Fixed-width record sizes, little-endian, no padding.
pub const HEADER_LEN: usize = 28;
pub const DOC_META_LEN: usize = 20;
pub const POSTING_LEN: usize = 12;

/// Per-document metadata packed into the binary index (20 bytes on disk:
/// `tok_len` u32, `simhash_hi` u64, `simhash_lo` u64).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DocMeta {
    /// Token count after truncation; always >= K for an accepted document.
    pub tok_len: u32,
    pub simhash_hi: u64,
    pub simhash_lo: u64,
}

/// One `(shingle_hash, doc_idx)` pair (12 bytes on disk: u64 then u32).
///
/// `doc_idx` is the dense internal ordinal, not the external `doc_id`.
/// Duplicates are permitted when a shingle repeats within a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Posting {
    pub shingle_hash: u64,
    pub doc_idx: u32,
}

/// External identity of an accepted document, kept for the sidecars.
#[derive(Clone, Debug, Default)]
pub struct DocInfo {
    pub doc_id: String,
    pub title: String,
    pub author: String,
}

/// Counters reported by the builder CLI and the build endpoint.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct BuildSummary {
    pub docs: u32,
    pub postings: u64,
    pub skipped_bad_json: u64,
    pub skipped_bad_doc: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_sort_order() {
        let mut postings = vec![
            Posting { shingle_hash: 2, doc_idx: 0 },
            Posting { shingle_hash: 1, doc_idx: 5 },
            Posting { shingle_hash: 1, doc_idx: 2 },
            Posting { shingle_hash: 1, doc_idx: 2 },
        ];
        postings.sort_unstable();
        assert_eq!(postings[0], Posting { shingle_hash: 1, doc_idx: 2 });
        assert_eq!(postings[1], Posting { shingle_hash: 1, doc_idx: 2 });
        assert_eq!(postings[2], Posting { shingle_hash: 1, doc_idx: 5 });
        assert_eq!(postings[3], Posting { shingle_hash: 2, doc_idx: 0 });
    }
}

//! Batch index builder
//!
//! Consumes a JSON-lines corpus, drives the text pipeline and accumulates
//! per-document metadata plus postings, then sorts and hands everything to
//! the writer. Strictly single-threaded; a failed build leaves the output
//! directory invalid and the caller cleans it up.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::error::PlagdexError;
use crate::models::Document;
use crate::tokenizer::{normalize, shingle_hashes, simhash128, tokenize_spans, SHINGLE_K};
use crate::Result;

use super::types::{
    BuildSummary, DocInfo, DocMeta, Posting, MAX_SHINGLES_PER_DOC, MAX_TOKENS_PER_DOC,
    SHINGLE_STRIDE,
};
use super::writer::write_index;

/// Accumulates accepted documents and their postings for one build run.
pub struct IndexBuilder {
    docs: Vec<DocMeta>,
    infos: Vec<DocInfo>,
    postings: Vec<Posting>,
    skipped_bad_json: u64,
    skipped_bad_doc: u64,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self {
            docs: Vec::with_capacity(1024),
            infos: Vec::with_capacity(1024),
            postings: Vec::with_capacity(1024 * 64),
            skipped_bad_json: 0,
            skipped_bad_doc: 0,
        }
    }

    /// Number of documents accepted so far.
    pub fn doc_count(&self) -> u32 {
        self.docs.len() as u32
    }

    /// Process one corpus line. Blank lines are ignored; unparseable lines
    /// and lines with an empty `doc_id` or `text` are counted and skipped.
    pub fn add_line(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        let doc = match serde_json::from_str::<Document>(line) {
            Ok(doc) => doc,
            Err(_) => {
                self.skipped_bad_json += 1;
                return;
            }
        };
        if !doc.is_indexable() {
            self.skipped_bad_json += 1;
            return;
        }
        self.add_document(&doc);
    }

    /// Normalize, tokenize, fingerprint and emit postings for one document.
    ///
    /// Returns the assigned internal index, or `None` when the document is
    /// too short after truncation. Rejected documents consume no index.
    pub fn add_document(&mut self, doc: &Document) -> Option<u32> {
        let norm = normalize(&doc.text);
        let mut spans = tokenize_spans(&norm);
        if spans.is_empty() {
            self.skipped_bad_doc += 1;
            return None;
        }

        if spans.len() > MAX_TOKENS_PER_DOC {
            spans.truncate(MAX_TOKENS_PER_DOC);
        }
        if spans.len() < SHINGLE_K {
            self.skipped_bad_doc += 1;
            return None;
        }

        // SimHash over the truncated token stream.
        let (hi, lo) = simhash128(&norm, &spans);

        let doc_idx = self.docs.len() as u32;
        self.docs.push(DocMeta {
            tok_len: spans.len() as u32,
            simhash_hi: hi,
            simhash_lo: lo,
        });
        self.infos.push(DocInfo {
            doc_id: doc.doc_id.clone(),
            title: doc.title.clone(),
            author: doc.author.clone(),
        });

        for hash in shingle_hashes(&norm, &spans)
            .step_by(SHINGLE_STRIDE)
            .take(MAX_SHINGLES_PER_DOC)
        {
            self.postings.push(Posting {
                shingle_hash: hash,
                doc_idx,
            });
        }
        Some(doc_idx)
    }

    /// Sort postings and write the three-file index directory.
    pub fn finish(mut self, out_dir: &Path) -> Result<BuildSummary> {
        if self.docs.is_empty() {
            return Err(PlagdexError::IndexError(format!(
                "no valid docs, skipped_bad_json={} skipped_bad_doc={}",
                self.skipped_bad_json, self.skipped_bad_doc
            )));
        }

        self.postings.sort_unstable();

        write_index(out_dir, &self.docs, &self.infos, &self.postings)?;

        Ok(BuildSummary {
            docs: self.docs.len() as u32,
            postings: self.postings.len() as u64,
            skipped_bad_json: self.skipped_bad_json,
            skipped_bad_doc: self.skipped_bad_doc,
        })
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an index directory from a corpus file.
pub fn build_index(corpus_path: &Path, out_dir: &Path) -> Result<BuildSummary> {
    let file = File::open(corpus_path)?;
    std::fs::create_dir_all(out_dir)?;
    let reader = BufReader::new(file);

    let mut builder = IndexBuilder::new();
    for line in reader.lines() {
        let line = line?;
        builder.add_line(&line);
    }

    let summary = builder.finish(out_dir)?;
    info!(
        docs = summary.docs,
        postings = summary.postings,
        skipped_bad_json = summary.skipped_bad_json,
        skipped_bad_doc = summary.skipped_bad_doc,
        out_dir = %out_dir.display(),
        "index build complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_ten_token_doc_emits_two_postings() {
        let tmp = TempDir::new().unwrap();
        let mut builder = IndexBuilder::new();
        builder.add_line(
            r#"{"doc_id":"A","text":"alpha beta gamma delta epsilon zeta eta theta iota kappa"}"#,
        );
        let summary = builder.finish(tmp.path()).unwrap();
        assert_eq!(summary.docs, 1);
        assert_eq!(summary.postings, 2);
    }

    #[test]
    fn test_doc_idx_assignment_skips_rejected() {
        let mut builder = IndexBuilder::new();
        let long = words(12);
        assert_eq!(builder.add_document(&Document::new("A", long.as_str())), Some(0));
        // 8 tokens: too short, no index slot consumed
        assert_eq!(builder.add_document(&Document::new("B", words(8))), None);
        assert_eq!(builder.add_document(&Document::new("C", long.as_str())), Some(1));
        assert_eq!(builder.doc_count(), 2);
    }

    #[test]
    fn test_bad_lines_are_counted_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let mut builder = IndexBuilder::new();
        builder.add_line("not json at all");
        builder.add_line(r#"{"doc_id":"","text":"x"}"#);
        builder.add_line(r#"{"doc_id":"S","text":"one two three"}"#);
        builder.add_line(&format!(r#"{{"doc_id":"OK","text":"{}"}}"#, words(10)));
        let summary = builder.finish(tmp.path()).unwrap();
        assert_eq!(summary.docs, 1);
        assert_eq!(summary.skipped_bad_json, 2);
        assert_eq!(summary.skipped_bad_doc, 1);
    }

    #[test]
    fn test_empty_corpus_fails() {
        let tmp = TempDir::new().unwrap();
        let builder = IndexBuilder::new();
        assert!(matches!(
            builder.finish(tmp.path()),
            Err(PlagdexError::IndexError(_))
        ));
    }

    #[test]
    fn test_shingle_cap_bounds_postings() {
        let tmp = TempDir::new().unwrap();
        let mut builder = IndexBuilder::new();
        // 60_010 tokens -> 60_002 windows, capped at 50_000 postings.
        builder.add_document(&Document::new("big", words(60_010)));
        let summary = builder.finish(tmp.path()).unwrap();
        assert_eq!(summary.postings, MAX_SHINGLES_PER_DOC as u64);
    }
}

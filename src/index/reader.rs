//! Read-only view of a built index directory
//!
//! `index_native.bin` is memory-mapped and accessed through explicit
//! little-endian decoding at computed offsets, so the kernel pages postings
//! in lazily and multiple processes can share the mapping. All validation
//! happens at open time; accessors after that are infallible.

use std::fs::File;
use std::ops::Range;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::PlagdexError;
use crate::Result;

use super::types::{
    DocMeta, Posting, DOC_META_LEN, HEADER_LEN, INDEX_BIN, INDEX_DOCIDS, INDEX_MAGIC,
    INDEX_VERSION, POSTING_LEN,
};

/// An immutable, validated index loaded from a directory.
pub struct IndexReader {
    mmap: Mmap,
    index_dir: PathBuf,
    n_docs: u32,
    n_post9: u64,
    postings_off: usize,
    doc_ids: Vec<String>,
}

impl IndexReader {
    /// Map and validate an index directory.
    ///
    /// Rejects wrong magic or version, truncated tables, a non-zero k13
    /// posting count, out-of-range `doc_idx` values, and a doc-ids sidecar
    /// whose length differs from the header.
    pub fn open(index_dir: &Path) -> Result<Self> {
        let bin_path = index_dir.join(INDEX_BIN);
        let file = File::open(&bin_path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < HEADER_LEN {
            return Err(PlagdexError::FormatMismatch(format!(
                "{} too small for header ({} bytes)",
                bin_path.display(),
                mmap.len()
            )));
        }
        if mmap[0..4] != INDEX_MAGIC {
            return Err(PlagdexError::FormatMismatch("bad magic".to_string()));
        }
        let version = read_u32(&mmap, 4);
        if version != INDEX_VERSION {
            return Err(PlagdexError::FormatMismatch(format!(
                "unsupported version {version}"
            )));
        }

        let n_docs = read_u32(&mmap, 8);
        let n_post9 = read_u64(&mmap, 12);
        let n_post13 = read_u64(&mmap, 20);
        if n_post13 != 0 {
            return Err(PlagdexError::FormatMismatch(format!(
                "k13 posting block not supported (N_post13={n_post13})"
            )));
        }

        let docs_len = n_docs as u64 * DOC_META_LEN as u64;
        let postings_len = n_post9
            .checked_mul(POSTING_LEN as u64)
            .ok_or_else(|| PlagdexError::FormatMismatch("posting count overflow".to_string()))?;
        let needed = HEADER_LEN as u64 + docs_len + postings_len;
        if (mmap.len() as u64) < needed {
            return Err(PlagdexError::FormatMismatch(format!(
                "truncated index: need {needed} bytes, have {}",
                mmap.len()
            )));
        }

        let postings_off = HEADER_LEN + docs_len as usize;
        let reader = Self {
            mmap,
            index_dir: index_dir.to_path_buf(),
            n_docs,
            n_post9,
            postings_off,
            doc_ids: Vec::new(),
        };

        for i in 0..n_post9 {
            let p = reader.posting(i);
            if p.doc_idx >= n_docs {
                return Err(PlagdexError::InvariantViolation(format!(
                    "posting {i} references doc_idx {} >= N_docs {n_docs}",
                    p.doc_idx
                )));
            }
        }

        let docids_path = index_dir.join(INDEX_DOCIDS);
        let doc_ids: Vec<String> = serde_json::from_reader(File::open(&docids_path)?)?;
        if doc_ids.len() as u32 != n_docs {
            return Err(PlagdexError::InvariantViolation(format!(
                "doc-ids length {} != N_docs {n_docs}",
                doc_ids.len()
            )));
        }

        Ok(Self { doc_ids, ..reader })
    }

    pub fn index_dir(&self) -> &Path {
        &self.index_dir
    }

    pub fn n_docs(&self) -> u32 {
        self.n_docs
    }

    pub fn n_post9(&self) -> u64 {
        self.n_post9
    }

    /// External `doc_id` for an internal index.
    pub fn doc_id(&self, doc_idx: u32) -> &str {
        &self.doc_ids[doc_idx as usize]
    }

    /// Per-document metadata record.
    pub fn doc_meta(&self, doc_idx: u32) -> DocMeta {
        let off = HEADER_LEN + doc_idx as usize * DOC_META_LEN;
        DocMeta {
            tok_len: read_u32(&self.mmap, off),
            simhash_hi: read_u64(&self.mmap, off + 4),
            simhash_lo: read_u64(&self.mmap, off + 12),
        }
    }

    /// Posting record by position in the sorted array.
    pub fn posting(&self, i: u64) -> Posting {
        let off = self.postings_off + i as usize * POSTING_LEN;
        Posting {
            shingle_hash: read_u64(&self.mmap, off),
            doc_idx: read_u32(&self.mmap, off + 8),
        }
    }

    fn posting_hash(&self, i: u64) -> u64 {
        read_u64(&self.mmap, self.postings_off + i as usize * POSTING_LEN)
    }

    /// Positions of all postings whose hash equals `hash`.
    ///
    /// Binary search over the sorted array; the range includes duplicate
    /// `(hash, doc_idx)` entries, which candidate counting relies on.
    pub fn postings_range(&self, hash: u64) -> Range<u64> {
        self.lower_bound(hash)..self.upper_bound(hash)
    }

    fn lower_bound(&self, hash: u64) -> u64 {
        let (mut lo, mut hi) = (0u64, self.n_post9);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.posting_hash(mid) < hash {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    fn upper_bound(&self, hash: u64) -> u64 {
        let (mut lo, mut hi) = (0u64, self.n_post9);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.posting_hash(mid) <= hash {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }
}

fn read_u32(buf: &[u8], off: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[off..off + 4]);
    u32::from_le_bytes(b)
}

fn read_u64(buf: &[u8], off: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[off..off + 8]);
    u64::from_le_bytes(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::types::{DocInfo, INDEX_META};
    use crate::index::writer::write_index;
    use std::fs;
    use tempfile::TempDir;

    fn write_sample(dir: &Path) {
        let docs = vec![
            DocMeta { tok_len: 10, simhash_hi: 1, simhash_lo: 2 },
            DocMeta { tok_len: 20, simhash_hi: 3, simhash_lo: 4 },
        ];
        let infos = vec![
            DocInfo { doc_id: "A".to_string(), ..Default::default() },
            DocInfo { doc_id: "B".to_string(), ..Default::default() },
        ];
        let postings = vec![
            Posting { shingle_hash: 5, doc_idx: 0 },
            Posting { shingle_hash: 5, doc_idx: 1 },
            Posting { shingle_hash: 5, doc_idx: 1 },
            Posting { shingle_hash: 9, doc_idx: 0 },
        ];
        write_index(dir, &docs, &infos, &postings).unwrap();
    }

    #[test]
    fn test_open_and_accessors() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());

        let reader = IndexReader::open(tmp.path()).unwrap();
        assert_eq!(reader.n_docs(), 2);
        assert_eq!(reader.n_post9(), 4);
        assert_eq!(reader.doc_id(0), "A");
        assert_eq!(reader.doc_id(1), "B");
        assert_eq!(reader.doc_meta(1).tok_len, 20);
        assert_eq!(reader.posting(3), Posting { shingle_hash: 9, doc_idx: 0 });
    }

    #[test]
    fn test_postings_range_includes_duplicates() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());

        let reader = IndexReader::open(tmp.path()).unwrap();
        assert_eq!(reader.postings_range(5), 0..3);
        assert_eq!(reader.postings_range(9), 3..4);
        assert_eq!(reader.postings_range(6), 3..3);
        assert_eq!(reader.postings_range(u64::MAX), 4..4);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());

        let bin = tmp.path().join(INDEX_BIN);
        let mut bytes = fs::read(&bin).unwrap();
        bytes[0] = b'X';
        fs::write(&bin, &bytes).unwrap();

        assert!(matches!(
            IndexReader::open(tmp.path()),
            Err(PlagdexError::FormatMismatch(_))
        ));
    }

    #[test]
    fn test_rejects_bad_version() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());

        let bin = tmp.path().join(INDEX_BIN);
        let mut bytes = fs::read(&bin).unwrap();
        bytes[4] = 2;
        fs::write(&bin, &bytes).unwrap();

        assert!(matches!(
            IndexReader::open(tmp.path()),
            Err(PlagdexError::FormatMismatch(_))
        ));
    }

    #[test]
    fn test_rejects_truncated_file() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());

        let bin = tmp.path().join(INDEX_BIN);
        let bytes = fs::read(&bin).unwrap();
        fs::write(&bin, &bytes[..bytes.len() - 6]).unwrap();

        assert!(matches!(
            IndexReader::open(tmp.path()),
            Err(PlagdexError::FormatMismatch(_))
        ));
    }

    #[test]
    fn test_rejects_nonzero_k13() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());

        let bin = tmp.path().join(INDEX_BIN);
        let mut bytes = fs::read(&bin).unwrap();
        bytes[20] = 1;
        fs::write(&bin, &bytes).unwrap();

        assert!(matches!(
            IndexReader::open(tmp.path()),
            Err(PlagdexError::FormatMismatch(_))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_doc_idx() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());

        let bin = tmp.path().join(INDEX_BIN);
        let mut bytes = fs::read(&bin).unwrap();
        // Corrupt the doc_idx of the first posting (header + 2 metas + 8).
        let off = HEADER_LEN + 2 * DOC_META_LEN + 8;
        bytes[off..off + 4].copy_from_slice(&99u32.to_le_bytes());
        fs::write(&bin, &bytes).unwrap();

        assert!(matches!(
            IndexReader::open(tmp.path()),
            Err(PlagdexError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_rejects_docids_length_mismatch() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());

        fs::write(tmp.path().join(INDEX_DOCIDS), r#"["A"]"#).unwrap();

        assert!(matches!(
            IndexReader::open(tmp.path()),
            Err(PlagdexError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_meta_sidecar_is_not_required_for_load() {
        let tmp = TempDir::new().unwrap();
        write_sample(tmp.path());
        fs::remove_file(tmp.path().join(INDEX_META)).unwrap();
        assert!(IndexReader::open(tmp.path()).is_ok());
    }
}

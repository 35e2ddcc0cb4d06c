use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use fjall::{Database, Keyspace, KeyspaceCreateOptions};

use crate::error::PlagdexError;
use crate::models::Document;
use crate::Result;

const DOCS_CF: &str = "docs";
const RUNTIME_CF: &str = "runtime";
const CURRENT_VERSION_KEY: &[u8] = b"current_version";
const CURRENT_INDEX_DIR_KEY: &[u8] = b"current_index_dir";

/// Fjall-backed document catalog.
///
/// Keyspace `docs` maps external `doc_id` to the bincode-serialized
/// [`Document`]; keyspace `runtime` holds the current index pointer.
pub struct DocStore {
    base_dir: PathBuf,
    db: Database,
    docs: Keyspace,
    runtime: Keyspace,
}

impl DocStore {
    pub fn open(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir).map_err(PlagdexError::Io)?;
        let db = Database::builder(&base_dir)
            .open()
            .map_err(|e| PlagdexError::Internal(format!("failed to open catalog: {}", e)))?;

        let docs = db
            .keyspace(DOCS_CF, || KeyspaceCreateOptions::default())
            .map_err(|e| PlagdexError::Internal(format!("failed to open docs cf: {}", e)))?;
        let runtime = db
            .keyspace(RUNTIME_CF, || KeyspaceCreateOptions::default())
            .map_err(|e| PlagdexError::Internal(format!("failed to open runtime cf: {}", e)))?;

        Ok(Self {
            base_dir,
            db,
            docs,
            runtime,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Insert or replace a document by its external id.
    pub fn upsert_document(&self, doc: &Document) -> Result<()> {
        if doc.doc_id.is_empty() {
            return Err(PlagdexError::InvalidRequest("doc_id is required".to_string()));
        }
        if doc.text.is_empty() {
            return Err(PlagdexError::InvalidRequest("text is required".to_string()));
        }

        let val = bincode::serialize(doc).map_err(PlagdexError::Serialization)?;
        self.docs
            .insert(doc.doc_id.as_bytes(), val)
            .map_err(|e| PlagdexError::Internal(e.to_string()))?;
        Ok(())
    }

    pub fn get_document(&self, doc_id: &str) -> Result<Option<Document>> {
        let Some(val) = self
            .docs
            .get(doc_id.as_bytes())
            .map_err(|e| PlagdexError::Internal(e.to_string()))?
        else {
            return Ok(None);
        };
        let doc: Document =
            bincode::deserialize(val.as_ref()).map_err(PlagdexError::Serialization)?;
        Ok(Some(doc))
    }

    pub fn doc_count(&self) -> Result<usize> {
        let mut count = 0usize;
        for kv in self.docs.iter() {
            kv.key().map_err(|e| PlagdexError::Internal(e.to_string()))?;
            count += 1;
        }
        Ok(count)
    }

    /// Write every stored document as one JSON line, in `doc_id` order.
    ///
    /// Returns the number of lines written. Documents that lost a required
    /// field (never expected; upsert validates) are skipped rather than
    /// poisoning the corpus.
    pub fn build_corpus(&self, corpus_path: &Path) -> Result<usize> {
        if let Some(parent) = corpus_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut out = BufWriter::new(File::create(corpus_path)?);
        let mut written = 0usize;

        for kv in self.docs.iter() {
            let key = kv.key().map_err(|e| PlagdexError::Internal(e.to_string()))?;
            let key_bytes = key.as_ref().to_vec();
            if let Some(val) = self
                .docs
                .get(&key_bytes)
                .map_err(|e| PlagdexError::Internal(e.to_string()))?
            {
                let doc: Document =
                    bincode::deserialize(val.as_ref()).map_err(PlagdexError::Serialization)?;
                if !doc.is_indexable() {
                    continue;
                }
                serde_json::to_writer(&mut out, &doc)?;
                out.write_all(b"\n")?;
                written += 1;
            }
        }
        out.flush()?;
        Ok(written)
    }

    /// Persist the current index pointer.
    pub fn set_current(&self, version: &str, index_dir: &str) -> Result<()> {
        self.runtime
            .insert(CURRENT_VERSION_KEY, version.as_bytes())
            .map_err(|e| PlagdexError::Internal(e.to_string()))?;
        self.runtime
            .insert(CURRENT_INDEX_DIR_KEY, index_dir.as_bytes())
            .map_err(|e| PlagdexError::Internal(e.to_string()))?;
        Ok(())
    }

    /// The `(version, index_dir)` pair set by the last `set_current`, if any.
    pub fn current_index(&self) -> Result<Option<(String, String)>> {
        let Some(dir) = self
            .runtime
            .get(CURRENT_INDEX_DIR_KEY)
            .map_err(|e| PlagdexError::Internal(e.to_string()))?
        else {
            return Ok(None);
        };
        let version = self
            .runtime
            .get(CURRENT_VERSION_KEY)
            .map_err(|e| PlagdexError::Internal(e.to_string()))?;

        let dir = String::from_utf8_lossy(dir.as_ref()).into_owned();
        let version = version
            .map(|v| String::from_utf8_lossy(v.as_ref()).into_owned())
            .unwrap_or_default();
        Ok(Some((version, dir)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn long_text() -> String {
        (0..12).map(|i| format!("tok{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_upsert_and_get() {
        let tmp = TempDir::new().unwrap();
        let store = DocStore::open(tmp.path().to_path_buf()).unwrap();

        let doc = Document::new("doc-1", long_text());
        store.upsert_document(&doc).unwrap();
        let got = store.get_document("doc-1").unwrap().unwrap();
        assert_eq!(got.text, doc.text);
        assert!(store.get_document("missing").unwrap().is_none());
    }

    #[test]
    fn test_upsert_rejects_empty_fields() {
        let tmp = TempDir::new().unwrap();
        let store = DocStore::open(tmp.path().to_path_buf()).unwrap();

        assert!(store.upsert_document(&Document::new("", "text")).is_err());
        assert!(store.upsert_document(&Document::new("id", "")).is_err());
    }

    #[test]
    fn test_upsert_replaces() {
        let tmp = TempDir::new().unwrap();
        let store = DocStore::open(tmp.path().to_path_buf()).unwrap();

        store.upsert_document(&Document::new("a", "first version")).unwrap();
        store.upsert_document(&Document::new("a", "second version")).unwrap();
        assert_eq!(store.doc_count().unwrap(), 1);
        assert_eq!(
            store.get_document("a").unwrap().unwrap().text,
            "second version"
        );
    }

    #[test]
    fn test_build_corpus_deterministic_order() {
        let tmp = TempDir::new().unwrap();
        let store = DocStore::open(tmp.path().to_path_buf()).unwrap();

        store.upsert_document(&Document::new("b", long_text())).unwrap();
        store.upsert_document(&Document::new("a", long_text())).unwrap();

        let corpus = tmp.path().join("corpus.jsonl");
        let written = store.build_corpus(&corpus).unwrap();
        assert_eq!(written, 2);

        let content = fs::read_to_string(&corpus).unwrap();
        let ids: Vec<String> = content
            .lines()
            .map(|l| {
                let doc: Document = serde_json::from_str(l).unwrap();
                doc.doc_id
            })
            .collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_current_index_pointer() {
        let tmp = TempDir::new().unwrap();
        let store = DocStore::open(tmp.path().to_path_buf()).unwrap();

        assert!(store.current_index().unwrap().is_none());
        store.set_current("v1", "/idx/v1").unwrap();
        assert_eq!(
            store.current_index().unwrap(),
            Some(("v1".to_string(), "/idx/v1".to_string()))
        );
    }
}

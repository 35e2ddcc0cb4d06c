use serde::{Deserialize, Serialize};

/// A raw document as submitted for indexing.
///
/// `doc_id` is the external, caller-visible identifier; the dense internal
/// index is assigned by the builder and never leaves the index directory.
/// This struct doubles as the corpus JSONL line format: unknown fields in a
/// corpus line are ignored, missing `title`/`author` default to empty.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: String,
    pub text: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
}

impl Document {
    pub fn new(doc_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            text: text.into(),
            title: String::new(),
            author: String::new(),
        }
    }

    /// A document is indexable when both required fields are non-empty.
    pub fn is_indexable(&self) -> bool {
        !self.doc_id.is_empty() && !self.text.is_empty()
    }
}

/// Get current Unix timestamp in seconds
pub fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_line_parsing() {
        let doc: Document =
            serde_json::from_str(r#"{"doc_id":"A","text":"hello","extra":42}"#).unwrap();
        assert_eq!(doc.doc_id, "A");
        assert_eq!(doc.text, "hello");
        assert_eq!(doc.title, "");
        assert!(doc.is_indexable());
    }

    #[test]
    fn test_missing_required_field_fails() {
        assert!(serde_json::from_str::<Document>(r#"{"doc_id":"A"}"#).is_err());
        assert!(serde_json::from_str::<Document>(r#"[1,2,3]"#).is_err());
    }

    #[test]
    fn test_empty_fields_not_indexable() {
        let doc: Document = serde_json::from_str(r#"{"doc_id":"","text":"x"}"#).unwrap();
        assert!(!doc.is_indexable());
        let doc: Document = serde_json::from_str(r#"{"doc_id":"x","text":""}"#).unwrap();
        assert!(!doc.is_indexable());
    }
}

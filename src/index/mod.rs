//! Offline index builder and the on-disk index format
//!
//! An index directory holds three jointly consistent files:
//!
//! - `index_native.bin`: header, fixed-width per-doc metadata, and the
//!   sorted `(shingle_hash, doc_idx)` posting array
//! - `index_native_docids.json`: internal index -> external `doc_id`
//! - `index_native_meta.json`: per-doc metadata keyed by external id,
//!   plus thresholds and build stats
//!
//! The builder is a single-threaded batch process; a built index is
//! immutable. `IndexReader` maps the binary file read-only and validates it
//! before any query touches it.

mod builder;
mod reader;
mod types;
mod writer;

pub use builder::*;
pub use reader::*;
pub use types::*;
pub use writer::*;

//! Text pipeline shared by the index builder and the search engine
//!
//! Normalization, token spans, k-gram shingle hashing and SimHash-128.
//! Everything here is pure and deterministic; both sides of the index must
//! produce bit-identical hashes for the same input, so any change to these
//! functions invalidates existing index files.

mod fingerprint;
mod normalize;

pub use fingerprint::*;
pub use normalize::*;

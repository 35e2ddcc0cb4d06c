//! Document catalog backing the HTTP façade
//!
//! Tracks raw documents between uploads and corpus builds, plus the
//! current-index pointer the host consults when loading without an
//! explicit directory.

mod doc_store;

pub use doc_store::*;

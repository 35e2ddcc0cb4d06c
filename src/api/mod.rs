//! HTTP façade for the search service
//!
//! Thin JSON layer over the catalog, the index builder and the search
//! engine. The engine is an in-process handle threaded through request
//! state; there is no global engine.

mod handlers;
mod router;
mod types;

pub use router::{create_router, AppState};
pub use types::*;

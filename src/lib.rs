pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod metrics;
pub mod models;
pub mod search;
pub mod tokenizer;

pub use api::{create_router, AppState};
pub use catalog::DocStore;
pub use config::{ServiceConfig, Thresholds};
pub use error::{PlagdexError, Result};
pub use metrics::SearchMetrics;
pub use models::*;
pub use search::SearchEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

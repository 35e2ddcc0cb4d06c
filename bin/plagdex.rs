use anyhow::Result;
use clap::Parser;
use plagdex::{create_router, AppState, DocStore, SearchEngine, SearchMetrics, ServiceConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "plagdex")]
#[command(about = "Near-duplicate text search service", long_about = None)]
struct Args {
    /// Address the HTTP API binds to
    #[arg(long, env = "PLAGDEX_HTTP_ADDR", default_value = "0.0.0.0:8080")]
    http_addr: String,

    /// Base directory for the document catalog
    #[arg(long, env = "PLAGDEX_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Directory under which versioned index directories are created
    #[arg(long, env = "PLAGDEX_INDEX_ROOT", default_value = "./data/index")]
    index_root: PathBuf,

    /// Default corpus JSONL path
    #[arg(long, env = "PLAGDEX_CORPUS_JSONL", default_value = "./data/corpus.jsonl")]
    corpus_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Starting plagdex v{}", plagdex::VERSION);

    let config = ServiceConfig {
        http_addr: args.http_addr.clone(),
        data_dir: args.data_dir,
        index_root: args.index_root,
        corpus_path: args.corpus_path,
        ..Default::default()
    };

    std::fs::create_dir_all(&config.data_dir)?;
    std::fs::create_dir_all(&config.index_root)?;

    info!("Service configuration:");
    info!("  HTTP address: {}", config.http_addr);
    info!("  Data directory: {:?}", config.data_dir);
    info!("  Index root: {:?}", config.index_root);
    info!("  Corpus path: {:?}", config.corpus_path);

    let catalog = Arc::new(DocStore::open(config.catalog_dir())?);
    let engine = Arc::new(SearchEngine::new());
    let metrics = Arc::new(SearchMetrics::new()?);

    // Warm start: reload the last published index if one is recorded.
    match catalog.current_index() {
        Ok(Some((version, dir))) => {
            match engine.load_index(std::path::Path::new(&dir)) {
                Ok(summary) => {
                    metrics.record_load(summary.docs, summary.postings);
                    info!("Loaded current index {} from {}", version, dir);
                }
                Err(e) => warn!("Failed to load current index {}: {}", dir, e),
            }
        }
        Ok(None) => info!("No current index recorded yet"),
        Err(e) => warn!("Failed to read current index pointer: {}", e),
    }

    let app = create_router(AppState {
        config: config.clone(),
        engine,
        catalog,
        metrics,
    });

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!("HTTP API listening on {}", config.http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

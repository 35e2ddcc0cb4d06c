use prometheus::{Counter, Gauge, Histogram, HistogramOpts, Opts, Registry};
use std::sync::Arc;

/// Prometheus metrics for the search service
#[derive(Clone)]
pub struct SearchMetrics {
    // Counters
    pub documents_upserted: Counter,
    pub corpus_builds: Counter,
    pub index_builds: Counter,
    pub index_loads: Counter,
    pub searches_total: Counter,
    pub search_errors: Counter,

    // Gauges
    pub indexed_documents: Gauge,
    pub indexed_postings: Gauge,

    // Histograms
    pub search_latency: Histogram,
    pub build_latency: Histogram,

    // Registry
    registry: Arc<Registry>,
}

impl SearchMetrics {
    /// Create a new SearchMetrics instance
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let documents_upserted = Counter::with_opts(Opts::new(
            "plagdex_documents_upserted_total",
            "Total number of documents upserted into the catalog",
        ))?;
        registry.register(Box::new(documents_upserted.clone()))?;

        let corpus_builds = Counter::with_opts(Opts::new(
            "plagdex_corpus_builds_total",
            "Total number of corpus builds",
        ))?;
        registry.register(Box::new(corpus_builds.clone()))?;

        let index_builds = Counter::with_opts(Opts::new(
            "plagdex_index_builds_total",
            "Total number of index builds",
        ))?;
        registry.register(Box::new(index_builds.clone()))?;

        let index_loads = Counter::with_opts(Opts::new(
            "plagdex_index_loads_total",
            "Total number of successful index loads",
        ))?;
        registry.register(Box::new(index_loads.clone()))?;

        let searches_total = Counter::with_opts(Opts::new(
            "plagdex_searches_total",
            "Total number of searches",
        ))?;
        registry.register(Box::new(searches_total.clone()))?;

        let search_errors = Counter::with_opts(Opts::new(
            "plagdex_search_errors_total",
            "Total number of search errors",
        ))?;
        registry.register(Box::new(search_errors.clone()))?;

        let indexed_documents = Gauge::with_opts(Opts::new(
            "plagdex_indexed_documents",
            "Documents in the currently loaded index",
        ))?;
        registry.register(Box::new(indexed_documents.clone()))?;

        let indexed_postings = Gauge::with_opts(Opts::new(
            "plagdex_indexed_postings",
            "Postings in the currently loaded index",
        ))?;
        registry.register(Box::new(indexed_postings.clone()))?;

        let search_latency = Histogram::with_opts(
            HistogramOpts::new("plagdex_search_latency_seconds", "Search operation latency")
                .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        )?;
        registry.register(Box::new(search_latency.clone()))?;

        let build_latency = Histogram::with_opts(
            HistogramOpts::new("plagdex_build_latency_seconds", "Index build latency")
                .buckets(vec![0.1, 0.5, 1.0, 5.0, 15.0, 60.0, 300.0]),
        )?;
        registry.register(Box::new(build_latency.clone()))?;

        Ok(Self {
            documents_upserted,
            corpus_builds,
            index_builds,
            index_loads,
            searches_total,
            search_errors,
            indexed_documents,
            indexed_postings,
            search_latency,
            build_latency,
            registry: Arc::new(registry),
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Record a search operation
    pub fn record_search(&self, duration_secs: f64) {
        self.searches_total.inc();
        self.search_latency.observe(duration_secs);
    }

    /// Record a search error
    pub fn record_search_error(&self) {
        self.search_errors.inc();
    }

    /// Record an index build
    pub fn record_build(&self, duration_secs: f64) {
        self.index_builds.inc();
        self.build_latency.observe(duration_secs);
    }

    /// Record a successful load and the new index sizes
    pub fn record_load(&self, docs: u32, postings: u64) {
        self.index_loads.inc();
        self.indexed_documents.set(docs as f64);
        self.indexed_postings.set(postings as f64);
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}

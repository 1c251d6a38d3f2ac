//! Prometheus metrics for the knowledge base.
//!
//! All metrics live in [`PROMETHEUS_REGISTRY`] under the `licita_kb`
//! namespace and are exported by `GET /metrics`.

mod middleware;

pub use middleware::track_http_metrics;

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Gauge, Histogram, HistogramOpts, Opts, Registry};

const NAMESPACE: &str = "licita_kb";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Total number of HTTP requests
    ///
    /// Labels: method, path, status_code
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status_code"]
    ).expect("Failed to create HTTP_REQUESTS_TOTAL metric");

    /// Smart searches executed (HTTP and chat)
    pub static ref SEARCHES_TOTAL: Counter = Counter::with_opts(
        Opts::new("searches_total", "Total number of smart searches").namespace(NAMESPACE)
    ).expect("Failed to create SEARCHES_TOTAL metric");

    /// Time spent scoring and ranking a search
    pub static ref SEARCH_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new("search_duration_seconds", "Smart search duration in seconds")
            .namespace(NAMESPACE)
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0])
    ).expect("Failed to create SEARCH_DURATION_SECONDS metric");

    /// Entries created
    pub static ref ENTRIES_CREATED_TOTAL: Counter = Counter::with_opts(
        Opts::new("entries_created_total", "Total number of knowledge entries created")
            .namespace(NAMESPACE)
    ).expect("Failed to create ENTRIES_CREATED_TOTAL metric");

    /// Chat webhook messages
    ///
    /// Labels: status (ignored, replied, failed)
    pub static ref CHAT_MESSAGES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("chat_messages_total", "Chat webhook messages by outcome").namespace(NAMESPACE),
        &["status"]
    ).expect("Failed to create CHAT_MESSAGES_TOTAL metric");

    /// Application uptime in seconds, refreshed on every scrape
    pub static ref UPTIME_SECONDS: Gauge = Gauge::with_opts(
        Opts::new("uptime_seconds", "Application uptime in seconds").namespace(NAMESPACE)
    ).expect("Failed to create UPTIME_SECONDS metric");
}

fn register<C>(collector: C) -> Result<(), prometheus::Error>
where
    C: prometheus::core::Collector + 'static,
{
    match PROMETHEUS_REGISTRY.register(Box::new(collector)) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Register all metrics with the Prometheus registry.
///
/// Safe to call more than once; already registered metrics are skipped.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    register(HTTP_REQUESTS_TOTAL.clone())?;
    register(SEARCHES_TOTAL.clone())?;
    register(SEARCH_DURATION_SECONDS.clone())?;
    register(ENTRIES_CREATED_TOTAL.clone())?;
    register(CHAT_MESSAGES_TOTAL.clone())?;
    register(UPTIME_SECONDS.clone())?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Generate Prometheus text format metrics
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}

//! Centralized metrics for the benefits directory
//!
//! Each stage (source fetch, extraction, cache) owns a submodule that defines
//! its metric names and documentation. Names are produced by `phase_metric!`
//! so they share one prefix and suffix convention.

pub mod cache;
pub mod extraction;
pub mod registry;
pub mod sources;

pub use cache::CacheMetrics;
pub use extraction::ExtractionMetrics;
pub use sources::SourcesMetrics;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing::{info, warn};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder and register all metrics.
///
/// Idempotent. Returns the render handle when a recorder is installed.
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    if let Some(handle) = HANDLE.get() {
        return Some(handle);
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = HANDLE.set(handle);
            registry::register_all_metrics();
            info!("Prometheus recorder installed");
        }
        Err(e) => {
            warn!("Failed to install Prometheus recorder: {}", e);
        }
    }
    HANDLE.get()
}

/// Render the current snapshot in Prometheus text format.
pub fn render() -> Option<String> {
    HANDLE.get().map(|h| h.render())
}

/// Implemented by each stage's metric collection
pub trait PhaseMetrics {
    /// Pre-register every metric so it appears before first use
    fn register_metrics();

    fn phase_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
    Gauge,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Histogram => "histogram",
            MetricType::Gauge => "gauge",
        }
    }
}

/// bd_{phase}_{metric_name}[_total]
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("bd_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("bd_", $phase, "_", $name)
    };
    (gauge, $phase:literal, $name:literal) => {
        concat!("bd_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;

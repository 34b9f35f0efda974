//! Record cache metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct CacheMetrics;

impl CacheMetrics {
    pub fn record_hit() {
        ::metrics::counter!(phase_metric!(counter, "cache", "hits")).increment(1);
    }

    pub fn record_miss() {
        ::metrics::counter!(phase_metric!(counter, "cache", "misses")).increment(1);
    }

    /// A refresh failed and the previous snapshot was served instead
    pub fn record_stale_served() {
        ::metrics::counter!(phase_metric!(counter, "cache", "stale_served")).increment(1);
    }

    pub fn set_records(count: usize) {
        ::metrics::gauge!(phase_metric!(gauge, "cache", "records")).set(count as f64);
    }
}

impl PhaseMetrics for CacheMetrics {
    fn register_metrics() {
        let _ = ::metrics::counter!(phase_metric!(counter, "cache", "hits"));
        let _ = ::metrics::counter!(phase_metric!(counter, "cache", "misses"));
        let _ = ::metrics::counter!(phase_metric!(counter, "cache", "stale_served"));
        let _ = ::metrics::gauge!(phase_metric!(gauge, "cache", "records"));
    }

    fn phase_name() -> &'static str {
        "cache"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "cache", "hits"),
                metric_type: MetricType::Counter,
                help: "Reads answered from a fresh snapshot",
            },
            MetricDoc {
                name: phase_metric!(counter, "cache", "misses"),
                metric_type: MetricType::Counter,
                help: "Reads that required a refresh",
            },
            MetricDoc {
                name: phase_metric!(counter, "cache", "stale_served"),
                metric_type: MetricType::Counter,
                help: "Reads answered with a stale snapshot after a failed refresh",
            },
            MetricDoc {
                name: phase_metric!(gauge, "cache", "records"),
                metric_type: MetricType::Gauge,
                help: "Records in the current snapshot",
            },
        ]
    }
}

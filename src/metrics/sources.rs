//! Source fetch metrics
//!
//! Health of the upstream table: request outcomes, latency and payload size.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct SourcesMetrics;

impl SourcesMetrics {
    pub fn record_fetch_success(duration_secs: f64, payload_bytes: usize) {
        ::metrics::counter!(phase_metric!(counter, "sources", "fetch_success")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "sources", "fetch_duration_seconds"))
            .record(duration_secs);
        ::metrics::histogram!(phase_metric!(histogram, "sources", "payload_bytes"))
            .record(payload_bytes as f64);
    }

    pub fn record_fetch_error(error_kind: &'static str) {
        ::metrics::counter!(
            phase_metric!(counter, "sources", "fetch_error"),
            "error_type" => error_kind
        )
        .increment(1);
    }
}

impl PhaseMetrics for SourcesMetrics {
    fn register_metrics() {
        let _ = ::metrics::counter!(phase_metric!(counter, "sources", "fetch_success"));
        let _ = ::metrics::counter!(phase_metric!(counter, "sources", "fetch_error"));
        let _ = ::metrics::histogram!(phase_metric!(histogram, "sources", "fetch_duration_seconds"));
        let _ = ::metrics::histogram!(phase_metric!(histogram, "sources", "payload_bytes"));
    }

    fn phase_name() -> &'static str {
        "sources"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "sources", "fetch_success"),
                metric_type: MetricType::Counter,
                help: "Successful reads of the upstream table",
            },
            MetricDoc {
                name: phase_metric!(counter, "sources", "fetch_error"),
                metric_type: MetricType::Counter,
                help: "Failed reads or extractions of the upstream table",
            },
            MetricDoc {
                name: phase_metric!(histogram, "sources", "fetch_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Duration of upstream reads in seconds",
            },
            MetricDoc {
                name: phase_metric!(histogram, "sources", "payload_bytes"),
                metric_type: MetricType::Histogram,
                help: "Size of upstream payloads in bytes",
            },
        ]
    }
}

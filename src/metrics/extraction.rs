//! Extraction metrics: how many rows survive the validity filter.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct ExtractionMetrics;

impl ExtractionMetrics {
    pub fn record_rows(kept: usize, dropped: usize) {
        ::metrics::counter!(phase_metric!(counter, "extraction", "rows_kept"))
            .increment(kept as u64);
        ::metrics::counter!(phase_metric!(counter, "extraction", "rows_dropped"))
            .increment(dropped as u64);
    }
}

impl PhaseMetrics for ExtractionMetrics {
    fn register_metrics() {
        let _ = ::metrics::counter!(phase_metric!(counter, "extraction", "rows_kept"));
        let _ = ::metrics::counter!(phase_metric!(counter, "extraction", "rows_dropped"));
    }

    fn phase_name() -> &'static str {
        "extraction"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "extraction", "rows_kept"),
                metric_type: MetricType::Counter,
                help: "Data rows turned into valid records",
            },
            MetricDoc {
                name: phase_metric!(counter, "extraction", "rows_dropped"),
                metric_type: MetricType::Counter,
                help: "Data rows skipped as incomplete",
            },
        ]
    }
}

//! Registers every stage's metrics and detects name conflicts early.

use crate::metrics::{MetricDoc, PhaseMetrics};
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_phase_metrics::<super::sources::SourcesMetrics>(&mut all_metrics);
    register_phase_metrics::<super::extraction::ExtractionMetrics>(&mut all_metrics);
    register_phase_metrics::<super::cache::CacheMetrics>(&mut all_metrics);

    info!("Registered {} metrics across all phases", all_metrics.len());
}

fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<&'static str, MetricDoc>) {
    T::register_metrics();
    let phase_name = T::phase_name();

    for doc in T::metrics_documentation() {
        if all_metrics.contains_key(doc.name) {
            warn!(
                "Metric name conflict: '{}' redefined by phase '{}'",
                doc.name, phase_name
            );
        } else {
            debug!(phase = phase_name, metric = doc.name, "registered metric");
            all_metrics.insert(doc.name, doc);
        }
    }
}

/// All documented metrics, listed by the `metrics` CLI command
pub fn all_documentation() -> Vec<MetricDoc> {
    let mut docs = super::sources::SourcesMetrics::metrics_documentation();
    docs.extend(super::extraction::ExtractionMetrics::metrics_documentation());
    docs.extend(super::cache::CacheMetrics::metrics_documentation());
    docs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_metric_names_are_unique() {
        let docs = all_documentation();
        let names: HashSet<_> = docs.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), docs.len());
    }

    #[test]
    fn test_catalog_follows_naming_convention() {
        for doc in all_documentation() {
            assert!(doc.name.starts_with("bd_"), "{}", doc.name);
            assert_eq!(
                doc.name.ends_with("_total"),
                doc.metric_type.as_str() == "counter",
                "{}",
                doc.name
            );
        }
    }

    #[test]
    fn test_register_all_metrics_without_recorder() {
        register_all_metrics();
    }
}

//! Gauge registry backed by the `prometheus` crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use tracing::debug;

use crate::metrics::registry::{GaugeDescriptor, GaugeHandle, GaugeRegistry, RegistryError};

impl From<prometheus::Error> for RegistryError {
    fn from(e: prometheus::Error) -> Self {
        RegistryError::new(e.to_string())
    }
}

/// Registry that turns every descriptor into a `prometheus::GaugeVec`.
///
/// Clones share the same underlying registry.
#[derive(Clone, Default)]
pub struct PrometheusRegistry {
    registry: Registry,
    families: Arc<Mutex<HashMap<String, GaugeVec>>>,
}

impl PrometheusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the wrapped `prometheus::Registry`.
    pub fn inner(&self) -> &Registry {
        &self.registry
    }

    /// Renders all registered gauges in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, RegistryError> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| RegistryError::new(e.to_string()))
    }
}

impl GaugeRegistry for PrometheusRegistry {
    type Handle = GaugeVec;

    fn get_or_create_gauge(
        &self,
        descriptor: &GaugeDescriptor,
    ) -> Result<Self::Handle, RegistryError> {
        let fq_name = descriptor.fq_name();
        let mut families = self
            .families
            .lock()
            .map_err(|_| RegistryError::new("prometheus registry lock poisoned"))?;

        if let Some(existing) = families.get(&fq_name) {
            return Ok(existing.clone());
        }

        // Prometheus rejects an empty help string.
        let help = if descriptor.help.is_empty() {
            fq_name.clone()
        } else {
            descriptor.help.clone()
        };
        let opts = Opts::new(descriptor.name.clone(), help)
            .namespace(descriptor.namespace.clone())
            .subsystem(descriptor.subsystem.clone());
        let label_names: Vec<&str> = descriptor.label_names.iter().map(String::as_str).collect();

        let gauge = GaugeVec::new(opts, &label_names)?;
        self.registry.register(Box::new(gauge.clone()))?;
        debug!("Registered gauge {}", fq_name);

        families.insert(fq_name, gauge.clone());
        Ok(gauge)
    }
}

impl GaugeHandle for GaugeVec {
    fn set_value(&self, value: f64, label_values: &[&str]) -> Result<(), RegistryError> {
        self.get_metric_with_label_values(label_values)?.set(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_labeled_gauge() {
        let registry = PrometheusRegistry::new();
        let desc = GaugeDescriptor::new("load_one", "One minute load average")
            .namespace("ganglia")
            .label_names(&["cluster"]);

        let gauge = registry.get_or_create_gauge(&desc).unwrap();
        gauge.set_value(0.25, &["web"]).unwrap();

        let text = registry.render().unwrap();
        assert!(text.contains("# HELP ganglia_load_one One minute load average"));
        assert!(text.contains("# TYPE ganglia_load_one gauge"));
        assert!(text.contains("ganglia_load_one{cluster=\"web\"} 0.25"));
    }

    #[test]
    fn test_unlabeled_gauge_with_subsystem() {
        let registry = PrometheusRegistry::new();
        let desc = GaugeDescriptor::new("tcp_inuse", "tcp_inuse from /proc/net/sockstat.")
            .namespace("node")
            .subsystem("sockstat");

        registry
            .get_or_create_gauge(&desc)
            .unwrap()
            .set_value(5.0, &[])
            .unwrap();

        let text = registry.render().unwrap();
        assert!(text.contains("node_sockstat_tcp_inuse 5"));
    }

    #[test]
    fn test_existing_family_is_reused() {
        let registry = PrometheusRegistry::new();
        let first = GaugeDescriptor::new("x", "first").label_names(&["cluster"]);
        let second = GaugeDescriptor::new("x", "second").label_names(&["cluster"]);

        registry.get_or_create_gauge(&first).unwrap();
        let gauge = registry.get_or_create_gauge(&second).unwrap();
        gauge.set_value(1.0, &["a"]).unwrap();

        let text = registry.render().unwrap();
        assert!(text.contains("# HELP x first"));
        assert!(!text.contains("second"));
    }

    #[test]
    fn test_empty_help_falls_back_to_name() {
        let registry = PrometheusRegistry::new();
        let desc = GaugeDescriptor::new("cpu_num", "")
            .namespace("ganglia")
            .label_names(&["cluster"]);

        let gauge = registry.get_or_create_gauge(&desc).unwrap();
        gauge.set_value(4.0, &["c"]).unwrap();

        assert!(registry.render().unwrap().contains("# HELP ganglia_cpu_num ganglia_cpu_num"));
    }

    #[test]
    fn test_wrong_label_count_is_error() {
        let registry = PrometheusRegistry::new();
        let desc = GaugeDescriptor::new("y", "help").label_names(&["cluster"]);
        let gauge = registry.get_or_create_gauge(&desc).unwrap();
        assert!(gauge.set_value(1.0, &[]).is_err());
    }
}

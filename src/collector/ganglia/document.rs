//! Data model of a gmond XML dump.

/// Decoded `GANGLIA_XML` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GangliaDocument {
    pub clusters: Vec<Cluster>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cluster {
    pub name: String,
    pub hosts: Vec<Host>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Host {
    pub name: String,
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metric {
    /// Raw metric name as reported by gmond, before sanitization.
    pub name: String,
    /// Numeric value; `None` for metrics of `TYPE="string"`.
    pub value: Option<f64>,
    /// gmond `TYPE` attribute (`float`, `uint32`, `string`, ...).
    pub metric_type: String,
    pub units: String,
    /// `EXTRA_DATA/EXTRA_ELEMENT` metadata, in document order.
    pub extra_elements: Vec<ExtraElement>,
}

/// A `NAME`/`VAL` metadata pair such as `DESC` or `TITLE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraElement {
    pub name: String,
    pub val: String,
}

impl ExtraElement {
    pub fn new(name: impl Into<String>, val: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            val: val.into(),
        }
    }
}

impl GangliaDocument {
    /// Total number of metrics across all clusters and hosts.
    pub fn metric_count(&self) -> usize {
        self.clusters
            .iter()
            .flat_map(|c| &c.hosts)
            .map(|h| h.metrics.len())
            .sum()
    }
}

//! Metric samples and gauge registration sinks.
//!
//! Collectors produce [`MetricSample`]s and push every value into a
//! [`GaugeRegistry`]. Two registries are provided:
//! - [`PrometheusRegistry`] - backed by `prometheus::Registry`, renders the text format
//! - [`MemoryRegistry`] - in-memory table for tests and embedding

mod memory;
mod prometheus_registry;
pub mod registry;
pub mod sample;

pub use memory::{MemoryGauge, MemoryRegistry};
pub use prometheus_registry::PrometheusRegistry;
pub use registry::{GaugeDescriptor, GaugeHandle, GaugeRegistry, RegistryError};
pub use sample::{MetricSample, sanitize_name};

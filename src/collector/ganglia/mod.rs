//! Ganglia `gmond` collector.
//!
//! gmond answers every TCP connection with a full XML dump of the
//! clusters, hosts and metrics it knows about, then closes the connection.
//! This module connects, decodes the dump incrementally under a read
//! deadline and maps each metric onto a `ganglia_<name>{cluster="..."}` gauge.

#[allow(clippy::module_inception)]
mod collector;
pub mod document;
#[cfg(test)]
mod fixtures;
pub mod stream;
pub mod xml;

pub use collector::{
    CLUSTER_LABEL, GANGLIA_NAMESPACE, GangliaCollector, GangliaConfig, MetricDescription,
    describe_metric,
};
pub use document::{Cluster, ExtraElement, GangliaDocument, Host, Metric};
pub use xml::decode_document;

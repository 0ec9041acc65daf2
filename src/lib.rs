//! nodestat - socket statistics and Ganglia metrics collection library.
//!
//! This library provides the core functionality used by:
//! - `nodestatd` - daemon polling the collectors and exporting gauges
//!
//! Modules:
//! - `collector` — `/proc/net/sockstat` and Ganglia `gmond` collectors
//! - `metrics` — metric samples, gauge descriptors and registry sinks

pub mod collector;
pub mod metrics;

//! Metric collectors.
//!
//! This module provides the collectors producing gauges from two sources:
//! the Linux `/proc/net/sockstat` pseudo-file and a Ganglia `gmond` daemon.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Collector (trait)                       │
//! │  ┌──────────────────────────┐  ┌──────────────────────────┐  │
//! │  │   SockStatCollector      │  │    GangliaCollector      │  │
//! │  │  - /proc/net/sockstat    │  │  - TCP host:port         │  │
//! │  │  - regex field matcher   │  │  - streaming XML decode  │  │
//! │  └────────────┬─────────────┘  └────────────┬─────────────┘  │
//! │        ┌──────▼──────┐                      │                │
//! │        │  FileSystem │ (trait)              │                │
//! │        └──────┬──────┘                      │                │
//! │               └───────────────┬─────────────┘                │
//! │                        ┌──────▼────────┐                     │
//! │                        │ GaugeRegistry │ (trait)             │
//! │                        └───────────────┘                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use nodestat::collector::{Collector, MockFs, SockStatCollector, SockStatConfig};
//! use nodestat::metrics::MemoryRegistry;
//!
//! let registry = MemoryRegistry::new();
//! let mut collector =
//!     SockStatCollector::new(MockFs::sockstat_modern(), registry.clone(), SockStatConfig::default());
//! let samples = collector.poll().unwrap();
//! assert_eq!(registry.value("node_sockstat_tcp_inuse", &[]), Some(5.0));
//! assert!(!samples.is_empty());
//! ```

pub mod error;
pub mod ganglia;
pub mod mock;
pub mod procfs;
pub mod traits;

pub use error::CollectError;
pub use ganglia::{GangliaCollector, GangliaConfig};
pub use mock::MockFs;
pub use procfs::{ParseError, SockStatCollector, SockStatConfig};
pub use traits::{Collector, FileSystem, RealFs};

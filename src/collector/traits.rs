//! Abstractions shared by all collectors.
//!
//! The `FileSystem` trait lets the sockstat collector read the real `/proc`
//! filesystem on Linux or an in-memory mock in tests. The `Collector` trait
//! is the polling contract the daemon drives.

use std::io;
use std::path::Path;

use crate::collector::error::CollectError;
use crate::metrics::MetricSample;

/// A source of metrics polled once per collection cycle.
pub trait Collector {
    /// Short identifier used in logs and on the command line.
    fn name(&self) -> &'static str;

    /// Runs one collection cycle.
    ///
    /// Every returned sample has already been pushed to the collector's
    /// registry. On error the cycle is aborted and gauges keep their last values.
    fn poll(&mut self) -> Result<Vec<MetricSample>, CollectError>;
}

/// Abstraction for filesystem operations.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

//! Socket statistics collector for `/proc/net/sockstat`.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::{SockStatFields, parse_sockstat};
use crate::collector::traits::{Collector, FileSystem};
use crate::metrics::sample::join_name;
use crate::metrics::{GaugeDescriptor, GaugeHandle, GaugeRegistry, MetricSample, sanitize_name};

const SOCKSTAT_SUBSYSTEM: &str = "sockstat";

/// Configuration for [`SockStatCollector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SockStatConfig {
    /// Base path to proc filesystem (usually "/proc").
    pub proc_path: String,
    /// Metric namespace; gauges are named `{namespace}_sockstat_{key}`.
    pub namespace: String,
}

impl Default for SockStatConfig {
    fn default() -> Self {
        Self {
            proc_path: "/proc".to_string(),
            namespace: "node".to_string(),
        }
    }
}

/// Reads a sockstat stream to completion, then parses it.
pub fn read_sockstat(mut reader: impl Read) -> Result<SockStatFields, CollectError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    Ok(parse_sockstat(&content)?)
}

/// Collects socket statistics and exposes them as unlabeled gauges.
pub struct SockStatCollector<F: FileSystem, R: GaugeRegistry> {
    fs: F,
    registry: R,
    config: SockStatConfig,
    gauges: HashMap<String, R::Handle>,
}

impl<F: FileSystem, R: GaugeRegistry> SockStatCollector<F, R> {
    /// Creates a new sockstat collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `registry` - Sink receiving every gauge value
    /// * `config` - Proc path and metric namespace; the namespace is sanitized
    pub fn new(fs: F, registry: R, mut config: SockStatConfig) -> Self {
        config.namespace = sanitize_name(&config.namespace);
        Self {
            fs,
            registry,
            config,
            gauges: HashMap::new(),
        }
    }

    /// Path of the sockstat file this collector reads.
    pub fn path(&self) -> PathBuf {
        Path::new(&self.config.proc_path).join("net/sockstat")
    }

    /// Returns whether the sockstat file exists.
    pub fn is_available(&self) -> bool {
        self.fs.exists(&self.path())
    }

    /// Reads and parses the sockstat file without touching the registry.
    pub fn collect_fields(&self) -> Result<SockStatFields, CollectError> {
        let content = self.fs.read_to_string(&self.path())?;
        Ok(parse_sockstat(&content)?)
    }

    fn gauge(&mut self, key: &str) -> Result<&R::Handle, CollectError> {
        if !self.gauges.contains_key(key) {
            let descriptor = GaugeDescriptor::new(key, format!("{} from /proc/net/sockstat.", key))
                .namespace(self.config.namespace.clone())
                .subsystem(SOCKSTAT_SUBSYSTEM);
            let handle = self.registry.get_or_create_gauge(&descriptor)?;
            self.gauges.insert(key.to_string(), handle);
        }
        self.gauges
            .get(key)
            .ok_or_else(|| CollectError::Registry(format!("gauge {} missing from cache", key)))
    }
}

impl<F: FileSystem, R: GaugeRegistry> Collector for SockStatCollector<F, R> {
    fn name(&self) -> &'static str {
        "sockstat"
    }

    fn poll(&mut self) -> Result<Vec<MetricSample>, CollectError> {
        let fields = self.collect_fields()?;
        debug!("Set sockstat: {:?}", fields);

        let mut samples = Vec::with_capacity(fields.len());
        for (key, value) in fields {
            let fq_name = join_name(&[&self.config.namespace, SOCKSTAT_SUBSYSTEM, &key]);
            self.gauge(&key)?.set_value(value, &[])?;
            samples.push(MetricSample::new(fq_name, value));
        }

        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;
    use crate::metrics::{MemoryRegistry, PrometheusRegistry};

    #[test]
    fn test_collect_fields_modern() {
        let fs = MockFs::sockstat_modern();
        let registry = MemoryRegistry::new();
        let collector = SockStatCollector::new(fs, &registry, SockStatConfig::default());

        let fields = collector.collect_fields().unwrap();

        assert_eq!(fields["tcp_inuse"], 5.0);
        assert_eq!(fields["udp_inuse"], 8.0);
        assert_eq!(fields["udp_pages"], 50.0);
        // Reading fields alone registers nothing.
        assert!(registry.is_empty());
    }

    #[test]
    fn test_poll_sets_gauges() {
        let fs = MockFs::sockstat_modern();
        let registry = MemoryRegistry::new();
        let mut collector = SockStatCollector::new(fs, &registry, SockStatConfig::default());

        let samples = collector.poll().unwrap();

        assert_eq!(samples.len(), 11);
        assert!(samples.iter().all(|s| s.labels.is_empty()));
        assert_eq!(registry.value("node_sockstat_tcp_inuse", &[]), Some(5.0));
        assert_eq!(registry.value("node_sockstat_ip_frag_mem", &[]), Some(4096.0));
        assert_eq!(
            registry.descriptor("node_sockstat_orphans").unwrap().help,
            "orphans from /proc/net/sockstat."
        );
    }

    #[test]
    fn test_poll_legacy_kernel_omits_optional() {
        let fs = MockFs::sockstat_legacy();
        let registry = MemoryRegistry::new();
        let mut collector = SockStatCollector::new(fs, &registry, SockStatConfig::default());

        let samples = collector.poll().unwrap();

        assert_eq!(samples.len(), 9);
        assert!(!samples.iter().any(|s| s.name == "node_sockstat_udp_pages"));
        assert!(registry.descriptor("node_sockstat_udplite_inuse").is_none());
    }

    #[test]
    fn test_custom_namespace_and_proc_path() {
        let mut fs = MockFs::new();
        fs.add_file(
            "/host/proc/net/sockstat",
            MockFs::sockstat_modern()
                .read_to_string(Path::new("/proc/net/sockstat"))
                .unwrap(),
        );
        let registry = MemoryRegistry::new();
        let config = SockStatConfig {
            proc_path: "/host/proc".to_string(),
            namespace: "edge".to_string(),
        };
        let mut collector = SockStatCollector::new(fs, &registry, config);

        assert!(collector.is_available());
        let samples = collector.poll().unwrap();
        assert!(samples.iter().all(|s| s.name.starts_with("edge_sockstat_")));
    }

    #[test]
    fn test_namespace_is_sanitized() {
        let config = SockStatConfig {
            namespace: "edge-1".to_string(),
            ..SockStatConfig::default()
        };

        let registry = MemoryRegistry::new();
        let mut collector =
            SockStatCollector::new(MockFs::sockstat_modern(), &registry, config.clone());
        let samples = collector.poll().unwrap();
        assert!(samples.iter().all(|s| s.name.starts_with("edge_1_sockstat_")));
        assert_eq!(registry.value("edge_1_sockstat_ip_frag_mem", &[]), Some(4096.0));

        let registry = PrometheusRegistry::new();
        let mut collector =
            SockStatCollector::new(MockFs::sockstat_modern(), registry.clone(), config);
        assert_eq!(collector.poll().unwrap().len(), 11);
        assert!(registry.render().unwrap().contains("edge_1_sockstat_tcp_inuse 5"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let registry = MemoryRegistry::new();
        let mut collector =
            SockStatCollector::new(MockFs::new(), &registry, SockStatConfig::default());

        assert!(!collector.is_available());
        assert!(matches!(collector.poll(), Err(CollectError::Io(_))));
    }

    #[test]
    fn test_failed_poll_keeps_previous_values() {
        let registry = MemoryRegistry::new();
        let mut collector =
            SockStatCollector::new(MockFs::sockstat_modern(), &registry, SockStatConfig::default());
        collector.poll().unwrap();

        collector.fs = MockFs::sockstat_corrupt();
        assert!(matches!(collector.poll(), Err(CollectError::Parse(_))));
        assert_eq!(registry.value("node_sockstat_tcp_inuse", &[]), Some(5.0));
    }

    #[test]
    fn test_read_sockstat_from_reader() {
        let content = MockFs::sockstat_legacy()
            .read_to_string(Path::new("/proc/net/sockstat"))
            .unwrap();
        let fields = read_sockstat(content.as_bytes()).unwrap();
        assert_eq!(fields["tcp_inuse"], 5.0);
        assert!(!fields.contains_key("udp_pages"));
    }
}

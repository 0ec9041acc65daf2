//! Collector turning gmond cluster/host/metric dumps into labeled gauges.

use std::collections::HashMap;
use std::io::{self, BufReader};
use std::time::Duration;

use tracing::debug;

use crate::collector::error::CollectError;
use crate::collector::ganglia::document::{ExtraElement, GangliaDocument, Metric};
use crate::collector::ganglia::stream::connect;
use crate::collector::ganglia::xml::decode_document;
use crate::collector::traits::Collector;
use crate::metrics::sample::join_name;
use crate::metrics::{GaugeDescriptor, GaugeHandle, GaugeRegistry, MetricSample, sanitize_name};

/// Namespace prefix of every Ganglia gauge.
pub const GANGLIA_NAMESPACE: &str = "ganglia";
/// The only label dimension of Ganglia gauges.
pub const CLUSTER_LABEL: &str = "cluster";

/// Configuration for [`GangliaCollector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GangliaConfig {
    /// gmond `host:port`.
    pub address: String,
    /// Bound on connecting, and separately on reading the whole document.
    pub timeout: Duration,
}

impl Default for GangliaConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8649".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Metadata harvested from a metric's `EXTRA_DATA`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricDescription {
    pub desc: String,
    pub title: String,
}

/// Scans extra elements for `DESC` and `TITLE`, stopping once both are set.
pub fn describe_metric(elements: &[ExtraElement]) -> MetricDescription {
    let mut description = MetricDescription::default();
    let mut has_desc = false;
    let mut has_title = false;

    for element in elements {
        match element.name.as_str() {
            "DESC" => {
                description.desc = element.val.clone();
                has_desc = !element.val.is_empty();
            }
            "TITLE" => {
                description.title = element.val.clone();
                has_title = !element.val.is_empty();
            }
            _ => {}
        }
        if has_desc && has_title {
            break;
        }
    }

    description
}

/// Collects metrics from a gmond daemon.
///
/// Each distinct sanitized metric name gets one gauge family, labeled by
/// cluster, created the first time the name is seen. The gauge cache lives as
/// long as the collector; help text and labels of a family never change.
pub struct GangliaCollector<R: GaugeRegistry> {
    config: GangliaConfig,
    registry: R,
    gauges: HashMap<String, R::Handle>,
}

impl<R: GaugeRegistry> GangliaCollector<R> {
    pub fn new(config: GangliaConfig, registry: R) -> Self {
        Self {
            config,
            registry,
            gauges: HashMap::new(),
        }
    }

    pub fn config(&self) -> &GangliaConfig {
        &self.config
    }

    /// Connects to gmond and decodes one document.
    pub fn fetch(&self) -> Result<GangliaDocument, CollectError> {
        let stream = connect(&self.config.address, self.config.timeout)?;
        decode_document(BufReader::new(stream)).map_err(|e| match e {
            CollectError::Io(io) if io.kind() == io::ErrorKind::TimedOut => {
                CollectError::Timeout(self.config.timeout)
            }
            other => other,
        })
    }

    /// Pushes every numeric metric of a decoded document to the registry.
    ///
    /// Updates already applied stay applied if a later one fails.
    pub fn update(&mut self, document: &GangliaDocument) -> Result<Vec<MetricSample>, CollectError> {
        let mut samples = Vec::with_capacity(document.metric_count());

        for cluster in &document.clusters {
            for host in &cluster.hosts {
                for metric in &host.metrics {
                    let Some(value) = metric.value else {
                        debug!(
                            "Skip non-numeric {} on {}/{}",
                            metric.name, cluster.name, host.name
                        );
                        continue;
                    };
                    let name = sanitize_name(&metric.name);

                    self.set_metric(&name, &cluster.name, metric, value)?;
                    samples.push(
                        MetricSample::new(join_name(&[GANGLIA_NAMESPACE, &name]), value)
                            .with_label(CLUSTER_LABEL, cluster.name.as_str()),
                    );
                }
            }
        }

        Ok(samples)
    }

    fn set_metric(
        &mut self,
        name: &str,
        cluster: &str,
        metric: &Metric,
        value: f64,
    ) -> Result<(), CollectError> {
        if !self.gauges.contains_key(name) {
            let description = describe_metric(&metric.extra_elements);
            debug!("Register {}: {}", name, description.desc);
            let descriptor = GaugeDescriptor::new(name, description.desc)
                .namespace(GANGLIA_NAMESPACE)
                .label_names(&[CLUSTER_LABEL]);
            let handle = self.registry.get_or_create_gauge(&descriptor)?;
            self.gauges.insert(name.to_string(), handle);
        }

        debug!("Set {}{{cluster={:?}}}: {}", name, cluster, value);
        match self.gauges.get(name) {
            Some(gauge) => Ok(gauge.set_value(value, &[cluster])?),
            None => Err(CollectError::Registry(format!("gauge {} missing from cache", name))),
        }
    }
}

impl<R: GaugeRegistry> Collector for GangliaCollector<R> {
    fn name(&self) -> &'static str {
        "gmond"
    }

    fn poll(&mut self) -> Result<Vec<MetricSample>, CollectError> {
        debug!("gmond poll {}", self.config.address);
        let document = self.fetch()?;
        self.update(&document)
    }
}

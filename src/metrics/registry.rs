//! Registration sink abstraction for gauges.
//!
//! Collectors never talk to a metrics backend directly. They describe each
//! gauge once with a [`GaugeDescriptor`], obtain a [`GaugeHandle`] from a
//! [`GaugeRegistry`] and keep that handle for the rest of their lifetime.

use crate::metrics::sample::join_name;

/// Error returned by a registry when a gauge cannot be created or set.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryError {
    pub message: String,
}

impl RegistryError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "registry error: {}", self.message)
    }
}

impl std::error::Error for RegistryError {}

/// Static description of a gauge family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeDescriptor {
    pub namespace: String,
    pub subsystem: String,
    pub name: String,
    pub help: String,
    pub label_names: Vec<String>,
}

impl GaugeDescriptor {
    /// Creates a descriptor without namespace, subsystem or labels.
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            namespace: String::new(),
            subsystem: String::new(),
            name: name.into(),
            help: help.into(),
            label_names: Vec::new(),
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn subsystem(mut self, subsystem: impl Into<String>) -> Self {
        self.subsystem = subsystem.into();
        self
    }

    pub fn label_names(mut self, names: &[&str]) -> Self {
        self.label_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Fully qualified name: `namespace_subsystem_name`, empty parts skipped.
    pub fn fq_name(&self) -> String {
        join_name(&[&self.namespace, &self.subsystem, &self.name])
    }
}

/// Handle to a registered gauge family.
pub trait GaugeHandle {
    /// Sets the gauge for the given label values.
    ///
    /// `label_values` must match the descriptor's label names in order and length.
    fn set_value(&self, value: f64, label_values: &[&str]) -> Result<(), RegistryError>;
}

/// Sink that creates gauge families on demand.
pub trait GaugeRegistry {
    type Handle: GaugeHandle;

    /// Returns a handle for the descriptor, creating the family if needed.
    ///
    /// When a family with the same fully qualified name already exists the
    /// existing one wins: its help text and label names are kept.
    fn get_or_create_gauge(&self, descriptor: &GaugeDescriptor)
    -> Result<Self::Handle, RegistryError>;
}

impl<R: GaugeRegistry> GaugeRegistry for &R {
    type Handle = R::Handle;

    fn get_or_create_gauge(
        &self,
        descriptor: &GaugeDescriptor,
    ) -> Result<Self::Handle, RegistryError> {
        (**self).get_or_create_gauge(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fq_name() {
        let desc = GaugeDescriptor::new("tcp_inuse", "help")
            .namespace("node")
            .subsystem("sockstat");
        assert_eq!(desc.fq_name(), "node_sockstat_tcp_inuse");

        let desc = GaugeDescriptor::new("load_one", "").namespace("ganglia");
        assert_eq!(desc.fq_name(), "ganglia_load_one");
    }

    #[test]
    fn test_label_names() {
        let desc = GaugeDescriptor::new("load_one", "").label_names(&["cluster"]);
        assert_eq!(desc.label_names, vec!["cluster".to_string()]);
    }
}

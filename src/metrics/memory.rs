//! In-memory gauge registry.
//!
//! Keeps every registered descriptor and the last value set per label set.
//! Used by tests and by embedders that want to read values back directly.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::metrics::registry::{GaugeDescriptor, GaugeHandle, GaugeRegistry, RegistryError};

#[derive(Debug, Default)]
struct Family {
    descriptor: Option<GaugeDescriptor>,
    values: BTreeMap<Vec<String>, f64>,
}

type Families = BTreeMap<String, Family>;

fn lock(families: &Mutex<Families>) -> Result<MutexGuard<'_, Families>, RegistryError> {
    families
        .lock()
        .map_err(|_| RegistryError::new("memory registry lock poisoned"))
}

/// Registry that stores gauges in a shared in-memory table.
///
/// Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    families: Arc<Mutex<Families>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the descriptor registered under a fully qualified name.
    pub fn descriptor(&self, fq_name: &str) -> Option<GaugeDescriptor> {
        let families = lock(&self.families).ok()?;
        families.get(fq_name).and_then(|f| f.descriptor.clone())
    }

    /// Returns the last value set for a fully qualified name and label values.
    pub fn value(&self, fq_name: &str, label_values: &[&str]) -> Option<f64> {
        let families = lock(&self.families).ok()?;
        let key: Vec<String> = label_values.iter().map(|v| v.to_string()).collect();
        families.get(fq_name).and_then(|f| f.values.get(&key).copied())
    }

    /// Number of registered gauge families.
    pub fn len(&self) -> usize {
        lock(&self.families).map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fully qualified names of all registered families, sorted.
    pub fn names(&self) -> Vec<String> {
        lock(&self.families)
            .map(|f| f.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl GaugeRegistry for MemoryRegistry {
    type Handle = MemoryGauge;

    fn get_or_create_gauge(
        &self,
        descriptor: &GaugeDescriptor,
    ) -> Result<Self::Handle, RegistryError> {
        let fq_name = descriptor.fq_name();
        if fq_name.is_empty() {
            return Err(RegistryError::new("empty gauge name"));
        }

        let mut families = lock(&self.families)?;
        let family = families.entry(fq_name.clone()).or_default();
        let label_count = match &family.descriptor {
            Some(existing) => existing.label_names.len(),
            None => {
                family.descriptor = Some(descriptor.clone());
                descriptor.label_names.len()
            }
        };

        Ok(MemoryGauge {
            families: Arc::clone(&self.families),
            fq_name,
            label_count,
        })
    }
}

/// Handle returned by [`MemoryRegistry`].
#[derive(Debug, Clone)]
pub struct MemoryGauge {
    families: Arc<Mutex<Families>>,
    fq_name: String,
    label_count: usize,
}

impl GaugeHandle for MemoryGauge {
    fn set_value(&self, value: f64, label_values: &[&str]) -> Result<(), RegistryError> {
        if label_values.len() != self.label_count {
            return Err(RegistryError::new(format!(
                "{}: expected {} label values, got {}",
                self.fq_name,
                self.label_count,
                label_values.len()
            )));
        }

        let mut families = lock(&self.families)?;
        let family = families
            .get_mut(&self.fq_name)
            .ok_or_else(|| RegistryError::new(format!("{} is not registered", self.fq_name)))?;
        family
            .values
            .insert(label_values.iter().map(|v| v.to_string()).collect(), value);
        Ok(())
    }
}

//! Metric samples and name sanitization.

use serde::Serialize;
use std::collections::BTreeMap;

/// A single gauge observation produced by a collector poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSample {
    /// Fully qualified metric name, namespace included.
    pub name: String,
    pub value: f64,
    /// Label name to label value, ordered by label name.
    pub labels: BTreeMap<String, String>,
}

impl MetricSample {
    /// Creates a sample without labels.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            labels: BTreeMap::new(),
        }
    }

    /// Adds a label, returning the updated sample.
    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(name.into(), value.into());
        self
    }

    /// Returns the value of a label, if set.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }
}

/// Replaces every character outside `[A-Za-z0-9_]` with `_`.
///
/// Works per `char`, so a multi-byte character becomes a single `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Joins non-empty name parts with `_`.
pub fn join_name(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

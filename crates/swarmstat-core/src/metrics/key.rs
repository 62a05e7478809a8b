//! Series identity: metric name plus a sorted label set.

use std::fmt;

use crate::error::{Result, SwarmStatError};

/// Counter or gauge. Fixed per metric family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    /// Name used on `# TYPE` lines.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one series.
///
/// Labels are kept sorted by name so two keys built from the same pairs in a
/// different order compare equal and render identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricKey {
    name: String,
    labels: Vec<(String, String)>,
}

impl MetricKey {
    /// Build a key, validating the metric name and every label name.
    pub fn new(name: &str, labels: &[(&str, &str)]) -> Result<Self> {
        validate_metric_name(name)?;

        let mut pairs: Vec<(String, String)> = Vec::with_capacity(labels.len());
        for (k, v) in labels {
            validate_label_name(k)?;
            pairs.push((k.to_string(), v.to_string()));
        }
        pairs.sort();

        if pairs.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(SwarmStatError::InvalidName(format!(
                "duplicate label name on {name}"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            labels: pairs,
        })
    }

    /// Key with no labels.
    pub fn plain(name: &str) -> Result<Self> {
        Self::new(name, &[])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[(String, String)] {
        &self.labels
    }

    /// Value of a single label, if present.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn validate_metric_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let ok = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
        }
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(SwarmStatError::InvalidName(format!("metric name {name:?}")))
    }
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, reserved `__` prefix rejected.
pub fn validate_label_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let ok = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !name.starts_with("__")
        }
        _ => false,
    };
    if ok {
        Ok(())
    } else {
        Err(SwarmStatError::InvalidName(format!("label name {name:?}")))
    }
}

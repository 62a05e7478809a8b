//! In-memory series registry.
//!
//! Series live in a sharded `DashMap`; each value is a single `AtomicU64`
//! holding the bits of an `f64`, so a reader always observes either the
//! previous or the next value of a series, never a mix. Families (name ->
//! kind/help/position) are tracked separately so renders keep a stable family
//! order. Nothing is ever evicted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{Result, SwarmStatError};

use super::key::{validate_metric_name, MetricKey, MetricKind};

struct Family {
    kind: MetricKind,
    help: Option<String>,
    seq: u64,
}

struct Series {
    bits: AtomicU64,
}

impl Series {
    fn new() -> Self {
        Self {
            bits: AtomicU64::new(0f64.to_bits()),
        }
    }

    fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    fn store(&self, v: f64) {
        self.bits.store(v.to_bits(), Ordering::Release);
    }

    fn add(&self, delta: f64) {
        // The closure always returns Some, so this cannot fail.
        let _ = self
            .bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| {
                Some((f64::from_bits(cur) + delta).to_bits())
            });
    }
}

/// One series in a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

/// One metric family in a snapshot, with its series sorted by label set.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilySnapshot {
    pub name: String,
    pub kind: MetricKind,
    pub help: Option<String>,
    pub samples: Vec<Sample>,
}

/// Immutable copy of the registry, ordered by family registration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub families: Vec<FamilySnapshot>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Look up a single value by name and labels (label order irrelevant).
    pub fn value(&self, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
        let mut wanted: Vec<(&str, &str)> = labels.to_vec();
        wanted.sort();
        let family = self.families.iter().find(|f| f.name == name)?;
        family
            .samples
            .iter()
            .find(|s| {
                s.labels.len() == wanted.len()
                    && s.labels
                        .iter()
                        .zip(wanted.iter())
                        .all(|((k, v), (wk, wv))| k == wk && v == wv)
            })
            .map(|s| s.value)
    }
}

/// Registry of counters and gauges. Share it as `Arc<Registry>`.
#[derive(Default)]
pub struct Registry {
    families: DashMap<String, Family>,
    series: DashMap<MetricKey, Series>,
    next_seq: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a family ahead of use so it gets `# HELP` text and a fixed
    /// position in renders. Describing again with the same kind is a no-op;
    /// the first help text stays.
    pub fn describe(&self, name: &str, kind: MetricKind, help: &str) -> Result<()> {
        validate_metric_name(name)?;
        match self.families.entry(name.to_string()) {
            Entry::Occupied(e) => check_kind(name, e.get().kind, kind)?,
            Entry::Vacant(e) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                e.insert(Family {
                    kind,
                    help: Some(help.to_string()),
                    seq,
                });
            }
        }
        Ok(())
    }

    /// Apply one update.
    ///
    /// Counter: add `value` (must be finite and non-negative).
    /// Gauge: replace with `value`.
    /// Nothing is mutated when an error is returned.
    pub fn update(&self, key: &MetricKey, kind: MetricKind, value: f64) -> Result<()> {
        if kind == MetricKind::Counter && !(value.is_finite() && value >= 0.0) {
            return Err(SwarmStatError::InvalidDelta {
                name: key.name().to_string(),
                delta: value,
            });
        }
        self.ensure_family(key.name(), kind)?;

        if let Some(series) = self.series.get(key) {
            apply(&series, kind, value);
            return Ok(());
        }
        let series = self.series.entry(key.clone()).or_insert_with(Series::new);
        apply(&series, kind, value);
        Ok(())
    }

    /// Counter += 1.
    pub fn inc(&self, name: &str, labels: &[(&str, &str)]) -> Result<()> {
        self.add(name, labels, 1.0)
    }

    /// Counter += `delta`.
    pub fn add(&self, name: &str, labels: &[(&str, &str)], delta: f64) -> Result<()> {
        let key = MetricKey::new(name, labels)?;
        self.update(&key, MetricKind::Counter, delta)
    }

    /// Gauge = `value`.
    pub fn set(&self, name: &str, labels: &[(&str, &str)], value: f64) -> Result<()> {
        let key = MetricKey::new(name, labels)?;
        self.update(&key, MetricKind::Gauge, value)
    }

    /// Current value of one series.
    pub fn get(&self, key: &MetricKey) -> Option<f64> {
        self.series.get(key).map(|s| s.load())
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Copy every series out. Each shard is read-locked only while it is copied.
    /// Families without any series are left out.
    pub fn snapshot(&self) -> Snapshot {
        let mut by_name: HashMap<String, Vec<Sample>> = HashMap::new();
        for r in self.series.iter() {
            by_name
                .entry(r.key().name().to_string())
                .or_default()
                .push(Sample {
                    labels: r.key().labels().to_vec(),
                    value: r.value().load(),
                });
        }

        let mut families: Vec<(u64, FamilySnapshot)> = Vec::with_capacity(by_name.len());
        for (name, mut samples) in by_name {
            let Some(fam) = self.families.get(&name) else {
                continue;
            };
            samples.sort_by(|a, b| a.labels.cmp(&b.labels));
            families.push((
                fam.seq,
                FamilySnapshot {
                    name,
                    kind: fam.kind,
                    help: fam.help.clone(),
                    samples,
                },
            ));
        }
        families.sort_by_key(|(seq, _)| *seq);

        Snapshot {
            families: families.into_iter().map(|(_, f)| f).collect(),
        }
    }

    fn ensure_family(&self, name: &str, kind: MetricKind) -> Result<()> {
        if let Some(fam) = self.families.get(name) {
            return check_kind(name, fam.kind, kind);
        }
        let fam = self.families.entry(name.to_string()).or_insert_with(|| Family {
            kind,
            help: None,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        });
        check_kind(name, fam.kind, kind)
    }
}

fn check_kind(name: &str, registered: MetricKind, requested: MetricKind) -> Result<()> {
    if registered == requested {
        Ok(())
    } else {
        Err(SwarmStatError::KindMismatch {
            name: name.to_string(),
            registered: registered.as_str(),
        })
    }
}

fn apply(series: &Series, kind: MetricKind, value: f64) {
    match kind {
        MetricKind::Counter => series.add(value),
        MetricKind::Gauge => series.store(value),
    }
}

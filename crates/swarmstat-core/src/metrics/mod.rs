//! Metrics data model: series keys, the shared registry, and the text renderer.

pub mod key;
pub mod registry;
pub mod render;

pub use key::{MetricKey, MetricKind};
pub use registry::{FamilySnapshot, Registry, Sample, Snapshot};
pub use render::{render, CONTENT_TYPE};

//! Top-level facade crate for swarmstat.
//!
//! Re-exports the core data model and the exporter service so users can depend on a single crate.

pub mod core {
    pub use swarmstat_core::*;
}

pub mod exporter {
    pub use swarmstat_exporter::*;
}

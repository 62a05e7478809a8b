//! swarmstat core: the metrics data model, text exposition, and load-test
//! statistics aggregation.
//!
//! This crate carries no transport or runtime dependencies so the registry
//! and renderer can be driven from the exporter service, from tests, or
//! embedded in another process.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Fallible paths
//! surface as `SwarmStatError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;
pub mod stats;

/// Shared result type.
pub use error::{Result, SwarmStatError};

//! swarmstat exporter library entry.
//!
//! Wires the shared registry, the load-test stats pipeline, the probe loop
//! and the HTTP router. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod probe;
pub mod router;
pub mod transport;

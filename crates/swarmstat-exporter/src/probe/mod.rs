//! Probe loop: periodically requests a target URL and records the result.

pub mod prober;
pub mod runner;

pub use prober::{FailureReason, HttpProber, ProbeResult, Prober};
pub use runner::{ProbeLoop, ProbeTarget, TickOutcome};

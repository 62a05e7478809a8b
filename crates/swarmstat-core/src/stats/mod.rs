//! Load-test statistics: outcome events, the source interface, an in-process
//! tracker, and the aggregator that feeds the registry.

pub mod aggregator;
pub mod outcome;
pub mod source;
pub mod tracker;

pub use aggregator::Aggregator;
pub use outcome::Outcome;
pub use source::{resolve_site, EndpointStats, RunState, RunStatus, Scenario, StatsSource};
pub use tracker::StatsTracker;

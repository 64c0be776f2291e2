//! Shared snapshot types and serialization for the flocking simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Anything that renders, records or inspects a flock reads these types.

pub mod snapshot;
pub mod timestamp;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

pub use timestamp::SimTimestamp;

pub use snapshot::{generate_snapshot_id, AgentSnapshot, FlockMetrics, FlockSnapshot};

//! Sample data fixtures for testing.
//!
//! This module provides ready-made test data for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // flock-events = { path = "../flock-events", features = ["test-fixtures"] }
//!
//! use flock_events::fixtures;
//!
//! let snapshot = fixtures::sample_snapshot();
//! ```

use crate::FlockSnapshot;

/// Returns a sample flock snapshot from the fixtures file.
///
/// Contains 4 agents at tick 50:
/// - 3 agents flying roughly along +X near the origin
/// - 1 straggler outside a boundary radius of 10
pub fn sample_snapshot() -> FlockSnapshot {
    let json = include_str!("../tests/fixtures/sample_snapshot.json");
    FlockSnapshot::from_json(json).expect("Failed to parse sample_snapshot.json")
}

//! Snapshot Output
//!
//! Captures flock state into [`FlockSnapshot`]s and writes them as JSON.

use glam::Vec3;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use flock_events::{generate_snapshot_id, AgentSnapshot, FlockMetrics, FlockSnapshot};

use crate::agent::Agent;
use crate::error::OutputError;
use crate::flock::FlockManager;

/// Subdirectory of the output directory holding numbered snapshots.
pub const SNAPSHOT_SUBDIR: &str = "snapshots";

/// File in the output directory overwritten with the latest snapshot.
pub const CURRENT_STATE_FILE: &str = "current_state.json";

/// Tracks snapshot cadence and numbering
#[derive(Debug, Clone)]
pub struct SnapshotGenerator {
    next_snapshot_id: u64,
    snapshot_interval: u64,
    last_snapshot_tick: Option<u64>,
}

impl SnapshotGenerator {
    /// An interval of 0 disables periodic snapshots.
    pub fn new(snapshot_interval: u64) -> Self {
        Self {
            next_snapshot_id: 1,
            snapshot_interval,
            last_snapshot_tick: None,
        }
    }

    pub fn should_snapshot(&self, current_tick: u64) -> bool {
        self.snapshot_interval > 0
            && current_tick > 0
            && current_tick % self.snapshot_interval == 0
            && self.last_snapshot_tick != Some(current_tick)
    }

    pub fn next_id(&mut self) -> String {
        let id = generate_snapshot_id(self.next_snapshot_id);
        self.next_snapshot_id += 1;
        id
    }

    pub fn mark_snapshot(&mut self, tick: u64) {
        self.last_snapshot_tick = Some(tick);
    }

    pub fn last_snapshot_tick(&self) -> Option<u64> {
        self.last_snapshot_tick
    }

    pub fn snapshot_count(&self) -> u64 {
        self.next_snapshot_id - 1
    }
}

fn agent_snapshot(agent: &Agent) -> AgentSnapshot {
    AgentSnapshot {
        agent_id: agent.id().0,
        position: agent.position().to_array(),
        velocity: agent.velocity().to_array(),
        orientation: agent.orientation().to_array(),
        forward: agent.forward().to_array(),
        speed: agent.velocity().length(),
    }
}

/// Captures the flock's current state.
pub fn generate_snapshot(
    flock: &FlockManager,
    snapshot_id: impl Into<String>,
    triggered_by: &str,
) -> FlockSnapshot {
    let mut snapshot = FlockSnapshot::new(snapshot_id, flock.clock(), triggered_by);
    snapshot.tick_mode = flock.tick_mode().to_string();
    snapshot.agents = flock.agents().iter().map(agent_snapshot).collect();
    snapshot.metrics = compute_metrics(&snapshot.agents, flock.profile().rules.boundary_radius());
    snapshot
}

/// Aggregate measurements over `agents`. Agents count as outside the
/// boundary only when a boundary radius is given.
pub fn compute_metrics(agents: &[AgentSnapshot], boundary_radius: Option<f32>) -> FlockMetrics {
    if agents.is_empty() {
        return FlockMetrics::default();
    }
    let count = agents.len() as f32;
    let mut position_sum = Vec3::ZERO;
    let mut heading_sum = Vec3::ZERO;
    let mut speed_sum = 0.0;
    let mut max_distance: f32 = 0.0;
    let mut outside = 0;

    for agent in agents {
        let position = Vec3::from_array(agent.position);
        position_sum += position;
        heading_sum += Vec3::from_array(agent.forward);
        speed_sum += agent.speed;
        let distance = agent.distance_from_origin();
        max_distance = max_distance.max(distance);
        if boundary_radius.is_some_and(|r| distance > r) {
            outside += 1;
        }
    }

    FlockMetrics {
        agent_count: agents.len(),
        mean_speed: speed_sum / count,
        centroid: (position_sum / count).to_array(),
        max_distance_from_origin: max_distance,
        polarization: (heading_sum / count).length(),
        agents_outside_boundary: outside,
    }
}

/// Write snapshot to file
pub fn write_snapshot(snapshot: &FlockSnapshot, path: impl AsRef<Path>) -> Result<(), OutputError> {
    let json = snapshot.to_json_pretty()?;
    fs::write(path.as_ref(), json)?;
    debug!("Wrote snapshot {} to {}", snapshot.snapshot_id, path.as_ref().display());
    Ok(())
}

/// Write snapshot to the snapshots directory under `output_dir`
pub fn write_snapshot_to_dir(
    snapshot: &FlockSnapshot,
    output_dir: impl AsRef<Path>,
) -> Result<PathBuf, OutputError> {
    let dir = output_dir.as_ref().join(SNAPSHOT_SUBDIR);
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}.json", snapshot.snapshot_id));
    write_snapshot(snapshot, &path)?;
    Ok(path)
}

/// Write current state (overwrites each time)
pub fn write_current_state(
    snapshot: &FlockSnapshot,
    output_dir: impl AsRef<Path>,
) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(output_dir.as_ref())?;
    let path = output_dir.as_ref().join(CURRENT_STATE_FILE);
    write_snapshot(snapshot, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flock_events::fixtures;

    #[test]
    fn test_generator_cadence() {
        let mut generator = SnapshotGenerator::new(10);
        assert!(!generator.should_snapshot(0));
        assert!(!generator.should_snapshot(5));
        assert!(generator.should_snapshot(10));
        generator.mark_snapshot(10);
        assert!(!generator.should_snapshot(10));
        assert!(generator.should_snapshot(20));

        assert!(!SnapshotGenerator::new(0).should_snapshot(10));
    }

    #[test]
    fn test_generator_ids() {
        let mut generator = SnapshotGenerator::new(10);
        assert_eq!(generator.snapshot_count(), 0);
        assert_eq!(generator.next_id(), "snap_000001");
        assert_eq!(generator.next_id(), "snap_000002");
        assert_eq!(generator.snapshot_count(), 2);
    }

    #[test]
    fn test_metrics_match_fixture() {
        let snapshot = fixtures::sample_snapshot();
        let metrics = compute_metrics(&snapshot.agents, Some(10.0));
        let expected = snapshot.metrics;

        assert_eq!(metrics.agent_count, expected.agent_count);
        assert_eq!(metrics.agents_outside_boundary, expected.agents_outside_boundary);
        assert!((metrics.mean_speed - expected.mean_speed).abs() < 1e-5);
        assert!((metrics.polarization - expected.polarization).abs() < 1e-5);
        let distance_error = metrics.max_distance_from_origin - expected.max_distance_from_origin;
        assert!(distance_error.abs() < 1e-5);
        let centroid = Vec3::from_array(metrics.centroid);
        assert!(centroid.abs_diff_eq(Vec3::from_array(expected.centroid), 1e-5));
    }

    #[test]
    fn test_metrics_without_boundary() {
        let snapshot = fixtures::sample_snapshot();
        assert_eq!(compute_metrics(&snapshot.agents, None).agents_outside_boundary, 0);
        assert_eq!(compute_metrics(&[], Some(1.0)), FlockMetrics::default());
    }

    #[test]
    fn test_write_snapshot_files() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = fixtures::sample_snapshot();

        let numbered = write_snapshot_to_dir(&snapshot, dir.path()).unwrap();
        assert_eq!(numbered, dir.path().join("snapshots").join("snap_000001.json"));
        let current = write_current_state(&snapshot, dir.path()).unwrap();
        assert_eq!(current, dir.path().join(CURRENT_STATE_FILE));

        let parsed = FlockSnapshot::from_json(&fs::read_to_string(numbered).unwrap()).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_write_to_missing_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("snap.json");
        let err = write_snapshot(&fixtures::sample_snapshot(), path).unwrap_err();
        assert!(matches!(err, OutputError::Io(_)));
    }
}

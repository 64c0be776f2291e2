//! Snapshot Types
//!
//! Serialization structs for flock snapshots and state output.
//!
//! Snapshots capture the complete state of the flock at a point in time,
//! used for analysis, visualization, and debugging. Vectors are stored as
//! plain arrays so consumers need no math library.

use serde::{Deserialize, Serialize};

use crate::SimTimestamp;

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// State of a single agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent_id: u32,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    /// Quaternion as `[x, y, z, w]`.
    pub orientation: [f32; 4],
    /// Unit heading derived from the orientation.
    pub forward: [f32; 3],
    pub speed: f32,
}

impl AgentSnapshot {
    /// Distance from the world origin.
    pub fn distance_from_origin(&self) -> f32 {
        let [x, y, z] = self.position;
        (x * x + y * y + z * z).sqrt()
    }
}

/// Aggregate measurements computed from all agents in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlockMetrics {
    pub agent_count: usize,
    pub mean_speed: f32,
    pub centroid: [f32; 3],
    pub max_distance_from_origin: f32,
    /// Magnitude of the mean heading: 1.0 when every agent flies the same way.
    pub polarization: f32,
    /// Agents farther from the origin than the boundary radius.
    pub agents_outside_boundary: usize,
}

/// Complete flock state at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlockSnapshot {
    pub snapshot_id: String,
    pub timestamp: SimTimestamp,
    pub triggered_by: String,
    pub tick_mode: String,
    pub agents: Vec<AgentSnapshot>,
    #[serde(default)]
    pub metrics: FlockMetrics,
}

impl FlockSnapshot {
    /// Creates a new FlockSnapshot with no agents.
    pub fn new(
        snapshot_id: impl Into<String>,
        timestamp: SimTimestamp,
        triggered_by: impl Into<String>,
    ) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            timestamp,
            triggered_by: triggered_by.into(),
            tick_mode: "sequential".to_string(),
            agents: Vec::new(),
            metrics: FlockMetrics::default(),
        }
    }

    /// Looks up an agent by id.
    pub fn agent(&self, agent_id: u32) -> Option<&AgentSnapshot> {
        self.agents.iter().find(|a| a.agent_id == agent_id)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_snapshot_id() {
        assert_eq!(generate_snapshot_id(1), "snap_000001");
        assert_eq!(generate_snapshot_id(42371), "snap_042371");
        assert_eq!(generate_snapshot_id(999999), "snap_999999");
    }

    #[test]
    fn test_flock_snapshot_new() {
        let snapshot = FlockSnapshot::new("snap_000001", SimTimestamp::new(100, 1.6), "periodic");

        assert_eq!(snapshot.snapshot_id, "snap_000001");
        assert_eq!(snapshot.triggered_by, "periodic");
        assert_eq!(snapshot.timestamp.tick, 100);
        assert!(snapshot.agents.is_empty());
    }

    fn agent_at(agent_id: u32, position: [f32; 3]) -> AgentSnapshot {
        AgentSnapshot {
            agent_id,
            position,
            velocity: [0.0; 3],
            orientation: [0.0, 0.0, 0.0, 1.0],
            forward: [0.0, 0.0, 1.0],
            speed: 0.0,
        }
    }

    #[test]
    fn test_agent_lookup() {
        let mut snapshot = FlockSnapshot::new("snap_000002", SimTimestamp::start(), "manual");
        snapshot.agents.push(agent_at(3, [3.0, 4.0, 0.0]));
        snapshot.agents.push(agent_at(9, [0.0, 0.0, 0.0]));

        let agent = snapshot.agent(3).unwrap();
        assert!((agent.distance_from_origin() - 5.0).abs() < 1e-6);
        assert!(snapshot.agent(4).is_none());
    }

    #[test]
    fn test_metrics_default_when_missing() {
        let json = r#"{
            "snapshot_id": "snap_000003",
            "timestamp": {"tick": 3, "elapsed": 0.048},
            "triggered_by": "periodic",
            "tick_mode": "double_buffered",
            "agents": []
        }"#;
        let snapshot = FlockSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.tick_mode, "double_buffered");
        assert_eq!(snapshot.metrics, FlockMetrics::default());
    }
}

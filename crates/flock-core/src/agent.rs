//! Agents (boids)
//!
//! An agent is a plain data record owned by the flock's population store
//! and addressed by index. Its orientation is always derived from its
//! heading; velocity persists across ticks.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

use crate::config::FlockParams;
use crate::math::{clamp_magnitude, forward, look_rotation};
use crate::rules::RuleSet;

/// Handle for an agent: its index in the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl AgentId {
    /// Handle for the agent stored at `index`.
    ///
    /// # Panics
    ///
    /// A population holds at most `u32::MAX + 1` agents; larger indices panic.
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).expect("agent index exceeds the u32 handle range"))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boid_{:04}", self.0)
    }
}

/// Behavior profile shared read-only by every agent of one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BoidProfile {
    /// Constant flying speed and velocity cap
    pub movement_speed: f32,
    /// Neighbor query radius
    pub neighbor_distance: f32,
    /// Maximum neighbors considered per tick
    pub max_neighbors: usize,
    pub rules: RuleSet,
}

impl BoidProfile {
    /// Profile with the standard four-rule set.
    pub fn from_params(params: &FlockParams) -> Self {
        Self {
            movement_speed: params.movement_speed,
            neighbor_distance: params.neighbor_distance,
            max_neighbors: params.max_neighbors,
            rules: RuleSet::standard(params),
        }
    }
}

/// Read-only snapshot of an agent handed to steering rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    pub id: AgentId,
    pub position: Vec3,
    /// Unit heading
    pub forward: Vec3,
}

/// One flocking agent.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    position: Vec3,
    orientation: Quat,
    velocity: Vec3,
    profile: Arc<BoidProfile>,
}

impl Agent {
    /// Creates an agent flying along its orientation at the profile's speed.
    pub fn spawn(
        id: AgentId,
        position: Vec3,
        orientation: Quat,
        profile: Arc<BoidProfile>,
    ) -> Self {
        let orientation = orientation.normalize();
        let velocity = forward(orientation) * profile.movement_speed;
        Self {
            id,
            position,
            orientation,
            velocity,
            profile,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Unit heading derived from the orientation.
    pub fn forward(&self) -> Vec3 {
        forward(self.orientation)
    }

    pub fn profile(&self) -> &Arc<BoidProfile> {
        &self.profile
    }

    pub fn view(&self) -> AgentView {
        AgentView {
            id: self.id,
            position: self.position,
            forward: self.forward(),
        }
    }

    /// Summed steering of the profile's rules against `neighbors`.
    pub fn steer(&self, neighbors: &[AgentView]) -> Vec3 {
        self.profile.rules.desired_delta(&self.view(), neighbors)
    }

    /// Applies a steering delta and advances the pose by `delta_time`.
    ///
    /// Velocity is capped at the movement speed, but the position always
    /// advances at exactly the movement speed along the velocity's
    /// direction. A zero velocity keeps the previous orientation and the
    /// agent continues along its previous heading.
    pub fn integrate(&mut self, delta: Vec3, delta_time: f32) {
        let speed = self.profile.movement_speed;
        self.velocity = clamp_magnitude(self.velocity + delta, speed);

        let heading = match self.velocity.try_normalize() {
            Some(dir) => {
                if let Some(rotation) = look_rotation(dir) {
                    self.orientation = rotation;
                }
                dir
            }
            None => {
                trace!(agent = %self.id, "zero velocity, keeping previous heading");
                self.forward()
            }
        };

        self.position += heading * speed * delta_time;
    }

    /// Steers against `neighbors` and integrates one step.
    pub fn tick(&mut self, delta_time: f32, neighbors: &[AgentView]) {
        let delta = self.steer(neighbors);
        self.integrate(delta, delta_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::SteeringRule;

    const EPS: f32 = 1e-4;

    fn profile(speed: f32, rules: RuleSet) -> Arc<BoidProfile> {
        Arc::new(BoidProfile {
            movement_speed: speed,
            neighbor_distance: 20.0,
            max_neighbors: 5,
            rules,
        })
    }

    fn heading(dir: Vec3) -> Quat {
        look_rotation(dir).unwrap()
    }

    fn neighbor(id: u32, position: Vec3) -> AgentView {
        AgentView {
            id: AgentId(id),
            position,
            forward: Vec3::Z,
        }
    }

    #[test]
    fn test_agent_id_display() {
        assert_eq!(AgentId(7).to_string(), "boid_0007");
        assert_eq!(AgentId::from_index(12).index(), 12);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "u32 handle range")]
    fn test_agent_id_out_of_range_panics() {
        AgentId::from_index(u32::MAX as usize + 1);
    }

    #[test]
    fn test_spawn_velocity_is_forward_times_speed() {
        let agent = Agent::spawn(
            AgentId(0),
            Vec3::ZERO,
            heading(Vec3::X),
            profile(5.0, RuleSet::new()),
        );
        assert!(agent.velocity().abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), EPS));
        assert!(agent.forward().abs_diff_eq(Vec3::X, EPS));
    }

    #[test]
    fn test_no_rules_flies_straight() {
        let mut agent = Agent::spawn(
            AgentId(0),
            Vec3::ONE,
            heading(Vec3::Y),
            profile(2.0, RuleSet::new()),
        );
        agent.tick(0.5, &[]);
        assert!(agent.position().abs_diff_eq(Vec3::new(1.0, 2.0, 1.0), EPS));
        assert!(agent.velocity().abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), EPS));
    }

    #[test]
    fn test_velocity_clamped_to_speed() {
        let rules = RuleSet::new().with_rule(SteeringRule::Cohesion, 1.0);
        let mut agent = Agent::spawn(AgentId(0), Vec3::ZERO, heading(Vec3::X), profile(5.0, rules));
        agent.tick(1.0, &[neighbor(1, Vec3::new(10.0, 0.0, 0.0))]);
        assert!((agent.velocity().length() - 5.0).abs() < EPS);
        assert!(agent.velocity().abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn test_displacement_is_speed_times_dt() {
        let rules = RuleSet::new()
            .with_rule(SteeringRule::Cohesion, 3.0)
            .with_rule(SteeringRule::Separation, 0.5);
        let mut agent = Agent::spawn(AgentId(0), Vec3::ZERO, heading(Vec3::Z), profile(4.0, rules));
        let neighbors = [
            neighbor(1, Vec3::new(1.0, 2.0, 0.0)),
            neighbor(2, Vec3::new(-3.0, 0.5, 1.0)),
        ];
        for dt in [0.016, 0.1, 1.0] {
            let before = agent.position();
            agent.tick(dt, &neighbors);
            let moved = (agent.position() - before).length();
            assert!((moved - 4.0 * dt).abs() < EPS, "moved {moved} for dt {dt}");
            assert!(agent.velocity().length() <= 4.0 + EPS);
        }
    }

    #[test]
    fn test_slow_velocity_still_moves_full_speed() {
        let mut agent = Agent::spawn(
            AgentId(0),
            Vec3::ZERO,
            heading(Vec3::X),
            profile(5.0, RuleSet::new()),
        );
        // Brake hard: velocity drops to 1 but the position still advances at speed.
        agent.integrate(Vec3::new(-4.0, 0.0, 0.0), 1.0);
        assert!(agent.velocity().abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), EPS));
        assert!(agent.position().abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn test_orientation_faces_velocity() {
        let mut agent = Agent::spawn(
            AgentId(0),
            Vec3::ZERO,
            heading(Vec3::X),
            profile(5.0, RuleSet::new()),
        );
        agent.integrate(Vec3::new(-5.0, 5.0, 0.0), 1.0);
        assert!(agent.forward().abs_diff_eq(Vec3::Y, EPS));
        assert!(agent.velocity().abs_diff_eq(Vec3::new(0.0, 5.0, 0.0), EPS));
    }

    #[test]
    fn test_zero_velocity_keeps_orientation() {
        let start = heading(Vec3::new(1.0, 0.0, 1.0));
        let mut agent = Agent::spawn(AgentId(0), Vec3::ZERO, start, profile(5.0, RuleSet::new()));
        let cancel = -agent.velocity();
        agent.integrate(cancel, 0.5);

        assert_eq!(agent.velocity(), Vec3::ZERO);
        assert!(agent.orientation().abs_diff_eq(start, EPS));
        assert!(!agent.position().is_nan());
        let expected = Vec3::new(1.0, 0.0, 1.0).normalize() * 2.5;
        assert!(agent.position().abs_diff_eq(expected, EPS));
    }

    #[test]
    fn test_view_reflects_state() {
        let agent = Agent::spawn(
            AgentId(3),
            Vec3::new(1.0, 2.0, 3.0),
            heading(-Vec3::Z),
            profile(1.0, RuleSet::new()),
        );
        let view = agent.view();
        assert_eq!(view.id, AgentId(3));
        assert_eq!(view.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(view.forward.abs_diff_eq(-Vec3::Z, EPS));
    }

    #[test]
    fn test_profile_from_params() {
        let params = FlockParams {
            movement_speed: 7.0,
            neighbor_distance: 2.5,
            max_neighbors: 3,
            ..FlockParams::default()
        };
        let profile = BoidProfile::from_params(&params);
        assert_eq!(profile.movement_speed, 7.0);
        assert_eq!(profile.neighbor_distance, 2.5);
        assert_eq!(profile.max_neighbors, 3);
        assert_eq!(profile.rules.len(), 4);
    }
}

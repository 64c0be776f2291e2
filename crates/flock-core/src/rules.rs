//! Steering rules and their weighted composition.
//!
//! A rule is a pure function of one agent and a snapshot of its neighbors.
//! Rules never fail: when a rule has nothing to act on it returns
//! [`Vec3::ZERO`].
//!
//! - **Cohesion**: steer toward the neighbors' mean position
//! - **Alignment**: steer toward the neighbors' mean heading
//! - **Separation**: steer away from the neighbors' mean position
//! - **BoundaryReturn**: pull back toward the world origin once past a radius

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::agent::AgentView;
use crate::config::FlockParams;
use crate::math::mean_direction;

/// One steering behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SteeringRule {
    Cohesion,
    Alignment,
    Separation,
    /// Restoring force proportional to how far the agent is past
    /// `limit_radius`, measured from the world origin.
    BoundaryReturn { limit_radius: f32 },
}

impl SteeringRule {
    /// Candidate steering vector for `agent` given its `neighbors`.
    pub fn movement(&self, agent: &AgentView, neighbors: &[AgentView]) -> Vec3 {
        match *self {
            SteeringRule::Cohesion => {
                mean_direction(neighbors.iter().map(|n| n.position - agent.position))
            }
            SteeringRule::Alignment => mean_direction(neighbors.iter().map(|n| n.forward)),
            SteeringRule::Separation => {
                mean_direction(neighbors.iter().map(|n| agent.position - n.position))
            }
            SteeringRule::BoundaryReturn { limit_radius } => {
                let distance = agent.position.length();
                if distance > limit_radius {
                    -agent.position.normalize_or_zero() * (distance - limit_radius)
                } else {
                    Vec3::ZERO
                }
            }
        }
    }

    /// Whether the rule reads the neighbor set at all.
    pub fn uses_neighbors(&self) -> bool {
        !matches!(self, SteeringRule::BoundaryReturn { .. })
    }
}

/// A rule scaled by a fixed weight. Zero disables it, negative inverts it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedRule {
    pub rule: SteeringRule,
    pub weight: f32,
}

impl WeightedRule {
    pub fn new(rule: SteeringRule, weight: f32) -> Self {
        Self { rule, weight }
    }

    pub fn movement(&self, agent: &AgentView, neighbors: &[AgentView]) -> Vec3 {
        self.rule.movement(agent, neighbors) * self.weight
    }
}

/// Ordered collection of weighted rules combined by summation.
///
/// Shared read-only by every agent of a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<WeightedRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical flocking set: cohesion, alignment, separation and a
    /// boundary return at `spawn_radius`.
    pub fn standard(params: &FlockParams) -> Self {
        Self::new()
            .with_rule(SteeringRule::Cohesion, params.cohesion_force)
            .with_rule(SteeringRule::Alignment, params.alignment_force)
            .with_rule(SteeringRule::Separation, params.separation_force)
            .with_rule(
                SteeringRule::BoundaryReturn {
                    limit_radius: params.spawn_radius,
                },
                params.limit_force,
            )
    }

    /// Appends a rule with the given weight.
    pub fn with_rule(mut self, rule: SteeringRule, weight: f32) -> Self {
        self.rules.push(WeightedRule::new(rule, weight));
        self
    }

    /// Sum of every weighted rule's output.
    pub fn desired_delta(&self, agent: &AgentView, neighbors: &[AgentView]) -> Vec3 {
        self.rules
            .iter()
            .map(|rule| rule.movement(agent, neighbors))
            .fold(Vec3::ZERO, |acc, v| acc + v)
    }

    /// Radius of the first boundary rule, if the set has one.
    pub fn boundary_radius(&self) -> Option<f32> {
        self.rules.iter().find_map(|r| match r.rule {
            SteeringRule::BoundaryReturn { limit_radius } => Some(limit_radius),
            _ => None,
        })
    }

    /// Whether any rule reads the neighbor set. When none does, the
    /// neighbor query can be skipped.
    pub fn uses_neighbors(&self) -> bool {
        self.rules.iter().any(|r| r.rule.uses_neighbors())
    }

    pub fn rules(&self) -> &[WeightedRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<WeightedRule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = WeightedRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

//! Population Spawning
//!
//! Places agents uniformly inside the spawn sphere with uniformly random
//! orientations. All randomness comes from the caller's seeded RNG, so a
//! seed fully determines the starting population.

use rand::rngs::SmallRng;
use std::fmt;
use tracing::{info, warn};

use crate::agent::AgentId;
use crate::config::FlockParams;
use crate::flock::FlockManager;
use crate::math::{random_in_unit_sphere, random_rotation};

/// Summary of spawned agents
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSummary {
    pub total_agents: usize,
    pub first_id: Option<AgentId>,
    /// Mean distance of the new agents from the world origin
    pub mean_distance_from_origin: f32,
    /// Largest distance of a new agent from the spawn center
    pub max_distance_from_center: f32,
}

impl fmt::Display for SpawnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} agents (mean distance from origin {:.2}, max from center {:.2})",
            self.total_agents, self.mean_distance_from_origin, self.max_distance_from_center
        )
    }
}

/// Spawns `params.population` agents around `params.spawn_center`.
pub fn spawn_population(
    flock: &mut FlockManager,
    params: &FlockParams,
    rng: &mut SmallRng,
) -> SpawnSummary {
    if params.spawn_center != glam::Vec3::ZERO {
        warn!(
            center = %params.spawn_center,
            "spawn center is not the origin; the boundary rule still measures from the origin"
        );
    }

    let mut first_id = None;
    let mut total_distance = 0.0;
    let mut max_from_center: f32 = 0.0;

    for _ in 0..params.population {
        let offset = random_in_unit_sphere(rng) * params.spawn_radius;
        let position = params.spawn_center + offset;
        let id = flock.spawn(position, random_rotation(rng));
        first_id.get_or_insert(id);
        total_distance += position.length();
        max_from_center = max_from_center.max(offset.length());
    }

    let summary = SpawnSummary {
        total_agents: params.population,
        first_id,
        mean_distance_from_origin: if params.population > 0 {
            total_distance / params.population as f32
        } else {
            0.0
        },
        max_distance_from_center: max_from_center,
    };
    info!("Spawned {}", summary);
    summary
}

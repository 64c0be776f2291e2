//! Flocking Simulation Engine Library
//!
//! Agents steer from weighted cohesion, alignment, separation and
//! boundary-return rules over a bounded neighbor set, then integrate at a
//! constant speed. The [`FlockManager`] drives one explicit tick at a time;
//! scheduling, rendering and persistence are left to the caller.
//!
//! ```
//! use flock_core::{BoidProfile, FlockManager, FlockParams, IndexConfig, TickMode};
//! use glam::{Quat, Vec3};
//!
//! let params = FlockParams::default();
//! let index = IndexConfig::default().build().unwrap();
//! let profile = BoidProfile::from_params(&params);
//! let mut flock = FlockManager::new(profile, index, TickMode::Sequential);
//! flock.spawn(Vec3::ZERO, Quat::IDENTITY);
//! flock.spawn(Vec3::X, Quat::IDENTITY);
//! flock.tick(0.016);
//! assert_eq!(flock.tick_count(), 1);
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod flock;
pub mod math;
pub mod neighbors;
pub mod output;
pub mod rules;
pub mod setup;

pub use agent::{Agent, AgentId, AgentView, BoidProfile};
pub use config::{FlockConfig, FlockParams, SimulationConfig, DEFAULT_CONFIG_PATH};
pub use error::{ConfigError, IndexError, OutputError, SimError};
pub use flock::{FlockManager, TickMode};
pub use neighbors::{BruteForceIndex, IndexConfig, IndexKind, NeighborQuery, UniformGridIndex};
pub use rules::{RuleSet, SteeringRule, WeightedRule};
pub use setup::{spawn_population, SpawnSummary};

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Builds a flock from configuration and spawns its population from the
/// configured seed.
pub fn build_flock(config: &FlockConfig) -> Result<(FlockManager, SpawnSummary), SimError> {
    let index = config.index.build()?;
    let mut flock = FlockManager::new(
        BoidProfile::from_params(&config.flock),
        index,
        config.simulation.tick_mode,
    );
    let mut rng = SmallRng::seed_from_u64(config.simulation.seed);
    let summary = spawn_population(&mut flock, &config.flock, &mut rng);
    Ok((flock, summary))
}

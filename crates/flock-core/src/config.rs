//! Configuration System
//!
//! Loads simulation, flock and index parameters from a TOML file. Every
//! section and every field falls back to its default, so a file only needs
//! the values it changes.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::error::ConfigError;
use crate::flock::TickMode;
use crate::neighbors::IndexConfig;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "flock.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlockConfig {
    /// Run length, clock and output cadence
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Population and steering parameters
    #[serde(default)]
    pub flock: FlockParams,
    /// Neighbor index selection
    #[serde(default)]
    pub index: IndexConfig,
}

/// Simulation run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks to simulate
    pub ticks: u64,
    /// Seconds advanced per tick
    pub delta_time: f32,
    /// Seed for spawning
    pub seed: u64,
    /// Ticks between snapshots (0 disables periodic snapshots)
    pub snapshot_interval: u64,
    /// How neighbor reads interleave with writes within a tick
    pub tick_mode: TickMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 1000,
            delta_time: 0.016,
            seed: 42,
            snapshot_interval: 100,
            tick_mode: TickMode::default(),
        }
    }
}

/// Flock parameters shared by every agent of one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockParams {
    /// Number of agents spawned at startup
    pub population: usize,
    /// Radius of the spawn volume, also the boundary-return radius
    pub spawn_radius: f32,
    /// Center of the spawn volume
    pub spawn_center: Vec3,
    /// Constant flying speed and velocity cap
    pub movement_speed: f32,
    /// Neighbor query radius
    pub neighbor_distance: f32,
    /// Maximum neighbors considered per agent
    pub max_neighbors: usize,
    pub cohesion_force: f32,
    pub alignment_force: f32,
    pub separation_force: f32,
    /// Weight of the boundary-return rule
    pub limit_force: f32,
}

impl Default for FlockParams {
    fn default() -> Self {
        Self {
            population: 200,
            spawn_radius: 10.0,
            spawn_center: Vec3::ZERO,
            movement_speed: 5.0,
            neighbor_distance: 3.0,
            max_neighbors: 8,
            cohesion_force: 1.0,
            alignment_force: 1.0,
            separation_force: 1.5,
            limit_force: 1.0,
        }
    }
}

impl FlockConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads configuration from the default path, or uses defaults if it
    /// cannot be read.
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads configuration from `path`, or uses defaults if it cannot be read.
    pub fn load_or_default_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::from_file(path).unwrap_or_else(|e| {
            warn!("Could not load {}: {}. Using defaults.", path.display(), e);
            Self::default()
        })
    }
}

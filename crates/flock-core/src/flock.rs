//! Flock orchestration
//!
//! The [`FlockManager`] owns the population, the shared profile and the
//! neighbor index, and advances every agent once per external tick.
//!
//! # Tick modes
//!
//! The index is always rebuilt from start-of-tick positions before any agent
//! reads it. What differs is when writes become visible:
//!
//! - [`TickMode::Sequential`]: each agent is written immediately, so agents
//!   later in population order see neighbors that already moved this tick.
//! - [`TickMode::DoubleBuffered`]: every agent steers against a start-of-tick
//!   snapshot (in parallel), then all agents are integrated.

use glam::{Quat, Vec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use flock_events::SimTimestamp;

use crate::agent::{Agent, AgentId, AgentView, BoidProfile};
use crate::neighbors::NeighborQuery;

/// When neighbor reads observe writes made within the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickMode {
    #[default]
    Sequential,
    DoubleBuffered,
}

impl fmt::Display for TickMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickMode::Sequential => write!(f, "sequential"),
            TickMode::DoubleBuffered => write!(f, "double_buffered"),
        }
    }
}

impl FromStr for TickMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sequential" => Ok(TickMode::Sequential),
            "double_buffered" => Ok(TickMode::DoubleBuffered),
            _ => Err(format!(
                "unknown tick mode '{}', expected 'sequential' or 'double_buffered'",
                s
            )),
        }
    }
}

/// Owns the agent population and drives per-tick updates.
pub struct FlockManager {
    agents: Vec<Agent>,
    profile: Arc<BoidProfile>,
    index: Box<dyn NeighborQuery>,
    tick_mode: TickMode,
    clock: SimTimestamp,
}

impl FlockManager {
    pub fn new(profile: BoidProfile, index: Box<dyn NeighborQuery>, tick_mode: TickMode) -> Self {
        Self {
            agents: Vec::new(),
            profile: Arc::new(profile),
            index,
            tick_mode,
            clock: SimTimestamp::start(),
        }
    }

    /// Adds an agent with the flock's shared profile.
    pub fn spawn(&mut self, position: Vec3, orientation: Quat) -> AgentId {
        let profile = Arc::clone(&self.profile);
        self.spawn_with_profile(position, orientation, profile)
    }

    /// Adds an agent with its own profile.
    ///
    /// # Panics
    ///
    /// Panics once the population outgrows the `u32` range of [`AgentId`].
    pub fn spawn_with_profile(
        &mut self,
        position: Vec3,
        orientation: Quat,
        profile: Arc<BoidProfile>,
    ) -> AgentId {
        let id = AgentId::from_index(self.agents.len());
        self.agents.push(Agent::spawn(id, position, orientation, profile));
        id
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn profile(&self) -> &Arc<BoidProfile> {
        &self.profile
    }

    pub fn tick_mode(&self) -> TickMode {
        self.tick_mode
    }

    pub fn clock(&self) -> SimTimestamp {
        self.clock
    }

    pub fn tick_count(&self) -> u64 {
        self.clock.tick
    }

    /// Simulated seconds since the first tick.
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed
    }

    /// Rebuilds the neighbor index from current positions.
    pub fn rebuild_index(&mut self) {
        let positions: Vec<Vec3> = self.agents.iter().map(Agent::position).collect();
        self.index.rebuild(&positions);
    }

    /// Neighbors of `id` as of the last index rebuild.
    pub fn neighbors_of(&self, id: AgentId) -> Vec<AgentId> {
        match self.agent(id) {
            Some(agent) => {
                let profile = agent.profile();
                self.index
                    .neighbors(id, profile.neighbor_distance, profile.max_neighbors)
            }
            None => Vec::new(),
        }
    }

    /// Advances every agent by one step of `delta_time` seconds.
    pub fn tick(&mut self, delta_time: f32) {
        self.rebuild_index();
        match self.tick_mode {
            TickMode::Sequential => self.tick_sequential(delta_time),
            TickMode::DoubleBuffered => self.tick_double_buffered(delta_time),
        }
        self.clock.advance(delta_time);
        debug!(
            tick = self.clock.tick,
            agents = self.agents.len(),
            mode = %self.tick_mode,
            "flock tick complete"
        );
    }

    fn tick_sequential(&mut self, delta_time: f32) {
        let mut neighbors: Vec<AgentView> = Vec::new();
        for i in 0..self.agents.len() {
            neighbors.clear();
            let agent = &self.agents[i];
            if agent.profile().rules.uses_neighbors() {
                neighbors.extend(
                    self.neighbors_of(agent.id())
                        .into_iter()
                        .map(|n| self.agents[n.index()].view()),
                );
            }
            self.agents[i].tick(delta_time, &neighbors);
        }
    }

    fn tick_double_buffered(&mut self, delta_time: f32) {
        let views: Vec<AgentView> = self.agents.iter().map(Agent::view).collect();
        let deltas: Vec<Vec3> = {
            let this = &*self;
            this.agents
                .par_iter()
                .map(|agent| {
                    if !agent.profile().rules.uses_neighbors() {
                        return agent.steer(&[]);
                    }
                    let neighbors: Vec<AgentView> = this
                        .neighbors_of(agent.id())
                        .into_iter()
                        .map(|n| views[n.index()])
                        .collect();
                    agent.steer(&neighbors)
                })
                .collect()
        };
        for (agent, delta) in self.agents.iter_mut().zip(deltas) {
            agent.integrate(delta, delta_time);
        }
    }
}

impl fmt::Debug for FlockManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlockManager")
            .field("agents", &self.agents.len())
            .field("tick_mode", &self.tick_mode)
            .field("clock", &self.clock)
            .finish()
    }
}

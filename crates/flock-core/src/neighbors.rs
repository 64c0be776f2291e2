//! Neighbor discovery for agent steering.
//!
//! An index is rebuilt from agent positions once per tick, before any agent
//! reads it. Queries return other agents within a radius of the querying
//! agent's indexed position, truncated to the first `max` found. Traversal
//! order is fixed per implementation but carries no meaning: the first `max`
//! are not the closest `max`.

use glam::{I64Vec3, IVec3, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::agent::AgentId;
use crate::error::IndexError;

/// Common behaviour exposed by neighbor indices.
pub trait NeighborQuery: Send + Sync {
    /// Rebuild internal structures from agent positions, indexed by
    /// [`AgentId::index`].
    fn rebuild(&mut self, positions: &[Vec3]);

    /// Visit agents other than `agent` within `radius` of its indexed
    /// position. The visitor returns `false` to stop the traversal.
    fn visit_within(&self, agent: AgentId, radius: f32, visitor: &mut dyn FnMut(AgentId) -> bool);

    /// The first `max` neighbors of `agent` within `radius`.
    fn neighbors(&self, agent: AgentId, radius: f32, max: usize) -> Vec<AgentId> {
        let mut found = Vec::new();
        if max == 0 {
            return found;
        }
        self.visit_within(agent, radius, &mut |id| {
            found.push(id);
            found.len() < max
        });
        found
    }
}

/// Which index implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    BruteForce,
    #[default]
    UniformGrid,
}

/// Neighbor index configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub kind: IndexKind,
    /// Grid cell edge length; ideally close to the neighbor distance
    pub cell_size: f32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            kind: IndexKind::default(),
            cell_size: 3.0,
        }
    }
}

impl IndexConfig {
    /// Builds the configured index.
    pub fn build(&self) -> Result<Box<dyn NeighborQuery>, IndexError> {
        Ok(match self.kind {
            IndexKind::BruteForce => Box::new(BruteForceIndex::new()),
            IndexKind::UniformGrid => Box::new(UniformGridIndex::new(self.cell_size)?),
        })
    }
}

fn within(center: Vec3, radius: f32) -> impl Fn(Vec3) -> bool {
    let radius_sq = radius * radius;
    move |p| p.distance_squared(center) <= radius_sq
}

/// Linear scan over every agent in population order.
#[derive(Debug, Clone, Default)]
pub struct BruteForceIndex {
    positions: Vec<Vec3>,
}

impl BruteForceIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NeighborQuery for BruteForceIndex {
    fn rebuild(&mut self, positions: &[Vec3]) {
        self.positions.clear();
        self.positions.extend_from_slice(positions);
    }

    fn visit_within(&self, agent: AgentId, radius: f32, visitor: &mut dyn FnMut(AgentId) -> bool) {
        let Some(&center) = self.positions.get(agent.index()) else {
            return;
        };
        if radius.is_nan() || radius < 0.0 {
            return;
        }
        let inside = within(center, radius);
        for (idx, &p) in self.positions.iter().enumerate() {
            if idx == agent.index() || !inside(p) {
                continue;
            }
            if !visitor(AgentId::from_index(idx)) {
                return;
            }
        }
    }
}

/// Uniform hash grid over agent positions.
///
/// Cells overlapping the query sphere are visited in (z, y, x) order and
/// agents within a cell in population order, so results are deterministic.
#[derive(Debug, Clone)]
pub struct UniformGridIndex {
    cell_size: f32,
    positions: Vec<Vec3>,
    cells: HashMap<IVec3, Vec<u32>>,
    /// Occupied cells sorted in traversal order.
    occupied: Vec<IVec3>,
}

impl UniformGridIndex {
    /// Create a new uniform grid with the provided cell size.
    pub fn new(cell_size: f32) -> Result<Self, IndexError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(IndexError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            positions: Vec::new(),
            cells: HashMap::new(),
            occupied: Vec::new(),
        })
    }

    /// Number of non-empty cells after the last rebuild.
    pub fn occupied_cells(&self) -> usize {
        self.occupied.len()
    }

    fn cell_of(&self, p: Vec3) -> IVec3 {
        (p / self.cell_size).floor().as_ivec3()
    }

    fn traversal_key(cell: &IVec3) -> (i32, i32, i32) {
        (cell.z, cell.y, cell.x)
    }

    /// Visits the agents of one cell; returns `false` once the visitor stops.
    fn visit_cell(
        &self,
        cell: IVec3,
        agent: AgentId,
        inside: &dyn Fn(Vec3) -> bool,
        visitor: &mut dyn FnMut(AgentId) -> bool,
    ) -> bool {
        let Some(members) = self.cells.get(&cell) else {
            return true;
        };
        for &idx in members {
            let id = AgentId(idx);
            if id == agent || !inside(self.positions[id.index()]) {
                continue;
            }
            if !visitor(id) {
                return false;
            }
        }
        true
    }
}

impl NeighborQuery for UniformGridIndex {
    fn rebuild(&mut self, positions: &[Vec3]) {
        self.positions.clear();
        self.positions.extend_from_slice(positions);
        self.cells.clear();
        for (idx, &p) in positions.iter().enumerate() {
            let cell = self.cell_of(p);
            self.cells.entry(cell).or_default().push(idx as u32);
        }
        self.occupied = self.cells.keys().copied().collect();
        self.occupied.sort_unstable_by_key(Self::traversal_key);
    }

    fn visit_within(&self, agent: AgentId, radius: f32, visitor: &mut dyn FnMut(AgentId) -> bool) {
        let Some(&center) = self.positions.get(agent.index()) else {
            return;
        };
        if radius.is_nan() || radius < 0.0 {
            return;
        }
        let inside = within(center, radius);
        let min = self.cell_of(center - Vec3::splat(radius));
        let max = self.cell_of(center + Vec3::splat(radius));
        let span = max.as_i64vec3() - min.as_i64vec3() + I64Vec3::ONE;
        let span_cells = span.x.saturating_mul(span.y).saturating_mul(span.z);

        // Huge radii would walk mostly empty cells; walk the occupied ones instead.
        if span_cells > self.occupied.len() as i64 {
            let bounds = |c: &IVec3| c.cmpge(min).all() && c.cmple(max).all();
            for &cell in self.occupied.iter().filter(|c| bounds(c)) {
                if !self.visit_cell(cell, agent, &inside, visitor) {
                    return;
                }
            }
            return;
        }

        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    if !self.visit_cell(IVec3::new(x, y, z), agent, &inside, visitor) {
                        return;
                    }
                }
            }
        }
    }
}

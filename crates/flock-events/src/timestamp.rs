//! Simulation Timestamp Types
//!
//! Simulation time is a tick counter plus the simulated seconds accumulated
//! from each tick's `delta_time`.
//!
//! # Example
//!
//! ```
//! use flock_events::SimTimestamp;
//!
//! let mut ts = SimTimestamp::start();
//! ts.advance(0.5);
//! ts.advance(0.25);
//! assert_eq!(ts.tick, 2);
//! assert_eq!(ts.to_string(), "tick_2@0.750s");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimTimestamp {
    /// Monotonically increasing simulation tick.
    pub tick: u64,
    /// Simulated seconds elapsed since the start of the run.
    pub elapsed: f64,
}

impl SimTimestamp {
    /// Creates a new SimTimestamp.
    pub fn new(tick: u64, elapsed: f64) -> Self {
        Self { tick, elapsed }
    }

    /// Creates a timestamp for the start of the simulation.
    pub fn start() -> Self {
        Self::default()
    }

    /// Advances one tick of `delta_time` seconds.
    pub fn advance(&mut self, delta_time: f32) {
        self.tick += 1;
        self.elapsed += f64::from(delta_time);
    }
}

impl fmt::Display for SimTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick_{}@{:.3}s", self.tick, self.elapsed)
    }
}

//! MCTS search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during MCTS search.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Total iterations performed.
    pub iterations: u32,

    /// Nodes expanded (added to tree).
    pub nodes_expanded: u32,

    /// Simulations (rollouts) performed.
    pub simulations: u32,

    /// Playouts won by the player to move at the root.
    pub wins: u32,

    /// Playouts lost by the player to move at the root.
    pub losses: u32,

    /// Drawn playouts.
    pub draws: u32,

    /// Maximum depth reached during search.
    pub max_depth: u32,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record one playout outcome valued from the root mover's side.
    pub fn record_outcome(&mut self, reward: f64) {
        self.simulations += 1;
        if reward >= 1.0 {
            self.wins += 1;
        } else if reward <= 0.0 {
            self.losses += 1;
        } else {
            self.draws += 1;
        }
    }

    /// Calculate iterations per second.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Fraction of playouts won by the root mover.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.wins as f64 / self.simulations as f64
        }
    }
}

/// Aggregate statistics for one move at the root.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveStats<M> {
    /// The move.
    pub mv: M,

    /// Visits to the child reached by the move.
    pub visits: u32,

    /// Reward accumulated for the player making the move.
    pub total_reward: f64,
}

impl<M> MoveStats<M> {
    /// Mean reward in `[0, 1]`, 0 when unvisited.
    #[must_use]
    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / self.visits as f64
        }
    }
}

//! MCTS policies for selection and simulation.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: How to choose which child to descend into (UCB1)
//! - `SimulationPolicy`: How to pick playout moves (uniform random)

use tracing::warn;

use crate::core::GameRng;
use crate::rules::{GameResult, Position};

use super::config::MCTSConfig;
use super::node::NodeId;
use super::tree::MCTSTree;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child node to explore.
pub trait SelectionPolicy<M>: Send + Sync {
    /// Select a child of `node`.
    ///
    /// Returns the index into the node's `children`.
    fn select(&self, tree: &MCTSTree<M>, node: NodeId, config: &MCTSConfig) -> usize;
}

/// UCB1 (Upper Confidence Bound) selection policy.
///
/// Balances exploitation (high reward) with exploration (low visits).
/// Formula: W(c)/N(c) + C * sqrt(ln(N) / N(c))
#[derive(Clone, Debug, Default)]
pub struct UCB1;

impl<M: Copy + Eq> SelectionPolicy<M> for UCB1 {
    fn select(&self, tree: &MCTSTree<M>, node: NodeId, config: &MCTSConfig) -> usize {
        let parent = tree.get(node);
        let ln_parent = (parent.visits.max(1) as f64).ln();

        parent
            .children
            .iter()
            .enumerate()
            .map(|(i, edge)| {
                let child = tree.get(edge.child);
                let score = if child.visits == 0 {
                    f64::INFINITY
                } else {
                    child.mean_reward()
                        + config.exploration_constant * (ln_parent / child.visits as f64).sqrt()
                };
                (i, score)
            })
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Policy for choosing moves during a rollout.
pub trait SimulationPolicy<P: Position>: Send + Sync {
    /// Pick a legal move in `position`, or `None` if there is none.
    fn pick_move(&self, position: &P, rng: &mut GameRng) -> Option<P::Move>;
}

/// Random simulation policy.
///
/// Picks uniformly among the legal moves.
#[derive(Clone, Debug, Default)]
pub struct RandomSimulation;

impl<P: Position> SimulationPolicy<P> for RandomSimulation {
    fn pick_move(&self, position: &P, rng: &mut GameRng) -> Option<P::Move> {
        let moves = position.legal_moves();
        rng.choose(&moves).copied()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Play `position` out to the end using `policy`, returning the result.
///
/// A non-terminal position with no legal moves counts as a draw, and so
/// does a playout stalled by a move that leaves the history unchanged.
pub fn rollout<P: Position, S: SimulationPolicy<P> + ?Sized>(
    policy: &S,
    position: &mut P,
    rng: &mut GameRng,
) -> GameResult {
    loop {
        if let Some(result) = position.result() {
            return result;
        }
        let Some(mv) = policy.pick_move(position, rng) else {
            return GameResult::Draw;
        };
        let played = position.history().len();
        position.play(mv);
        if position.history().len() == played {
            warn!(mv = ?mv, "rollout stalled on an illegal move");
            return GameResult::Draw;
        }
    }
}

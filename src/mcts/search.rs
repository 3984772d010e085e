//! Core MCTS search algorithm.
//!
//! Each iteration runs selection (UCB1 down fully expanded nodes),
//! expansion (one random untried move), a random rollout to the end of the
//! game and backpropagation of the result. The caller's position is never
//! mutated: every iteration plays on a clone.
//!
//! The tree is anchored to the last searched position. A new search reuses
//! the subtree for the new position when it descends from the anchor
//! (same setup, anchored history is a prefix of the new one); otherwise
//! the tree is rebuilt from scratch.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::core::{GameRng, Player};
use crate::error::SearchError;
use crate::rules::Position;

use super::config::MCTSConfig;
use super::node::{Edge, MCTSNode, NodeId};
use super::policy::{rollout, RandomSimulation, SelectionPolicy, SimulationPolicy, UCB1};
use super::stats::{MoveStats, SearchStats};
use super::tree::MCTSTree;

/// Weight reported by [`MCTSSearch::think`] for a legal move that was never
/// expanded. Lower than any real mean reward.
pub const UNEXPLORED_WEIGHT: f64 = f64::MIN;

/// Main MCTS search context.
///
/// Generic over the position type. Owns the search tree and
/// configuration, and provides methods to run searches.
pub struct MCTSSearch<P: Position> {
    /// Search configuration.
    config: MCTSConfig,

    /// The search tree.
    tree: MCTSTree<P::Move>,

    /// RNG for expansion; rollouts use forks of it.
    rng: GameRng,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy<P::Move>>,

    /// Simulation policy.
    simulation: Box<dyn SimulationPolicy<P>>,

    /// Search statistics.
    stats: SearchStats,

    /// Position the tree root currently represents.
    anchor: Option<P>,
}

impl<P: Position> MCTSSearch<P> {
    /// Create a new MCTS search context.
    pub fn new(config: MCTSConfig) -> Self {
        let rng = GameRng::new(config.seed);
        let capacity = config.max_nodes.min(1 << 16);

        Self {
            config,
            tree: MCTSTree::with_capacity(MCTSNode::root(Player::One), capacity),
            rng,
            selection: Box::new(UCB1),
            simulation: Box::new(RandomSimulation),
            stats: SearchStats::default(),
            anchor: None,
        }
    }

    /// Set a custom selection policy.
    pub fn with_selection<S: SelectionPolicy<P::Move> + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom simulation policy.
    pub fn with_simulation<S: SimulationPolicy<P> + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Run exactly one iteration from `position`.
    ///
    /// Returns the per-move statistics at the root afterwards.
    pub fn simulate(&mut self, position: &P) -> Result<Vec<MoveStats<P::Move>>, SearchError> {
        self.anchor(position)?;
        self.iteration(position);
        Ok(self.root_stats())
    }

    /// Search `position` until `duration` has elapsed.
    ///
    /// Elapsed time is checked once per completed iteration, and at least
    /// one iteration always runs. Returns one `(move, weight)` pair per
    /// legal move, in legal-move order. The weight is the mean reward of
    /// the move for the player to move; moves that were never expanded get
    /// [`UNEXPLORED_WEIGHT`].
    pub fn think(
        &mut self,
        position: &P,
        duration: Duration,
    ) -> Result<Vec<(P::Move, f64)>, SearchError> {
        let start = Instant::now();
        self.anchor(position)?;
        self.stats.reset();

        loop {
            self.iteration(position);
            if start.elapsed() >= duration {
                break;
            }
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;
        debug!(
            iterations = self.stats.iterations,
            nodes = self.tree.len(),
            wins = self.stats.wins,
            losses = self.stats.losses,
            draws = self.stats.draws,
            elapsed_us = self.stats.time_us,
            "MCTS think complete"
        );

        let root = self.tree.root();
        Ok(position
            .legal_moves()
            .into_iter()
            .map(|mv| {
                let weight = self
                    .tree
                    .child(root, mv)
                    .map_or(UNEXPLORED_WEIGHT, |child| self.tree.get(child).mean_reward());
                (mv, weight)
            })
            .collect())
    }

    /// Run MCTS search for a given number of iterations.
    ///
    /// Returns the most visited move. Deterministic for a fixed seed and
    /// a fresh search context.
    pub fn search_iterations(
        &mut self,
        position: &P,
        iterations: u32,
    ) -> Result<Option<P::Move>, SearchError> {
        let start = Instant::now();
        self.anchor(position)?;
        self.stats.reset();

        for _ in 0..iterations {
            self.iteration(position);
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;
        Ok(self.best_move())
    }

    /// Look up recorded mean rewards for `moves` from the state encoded as
    /// `encoded`.
    ///
    /// The state is searched for below the current root, only at the depth
    /// implied by its piece count. Moves without a recorded child, and all
    /// moves of a state not in the tree, get 0.
    #[must_use]
    pub fn move_weights(&self, encoded: &[u8], moves: &[P::Move]) -> Vec<f64> {
        let Some(node) = self.find_encoded(encoded) else {
            return vec![0.0; moves.len()];
        };

        moves
            .iter()
            .map(|&mv| {
                self.tree
                    .child(node, mv)
                    .map_or(0.0, |child| self.tree.get(child).mean_reward())
            })
            .collect()
    }

    /// Most visited move at the root.
    #[must_use]
    pub fn best_move(&self) -> Option<P::Move> {
        self.root_stats()
            .into_iter()
            .max_by_key(|stats| stats.visits)
            .map(|stats| stats.mv)
    }

    /// Statistics for every expanded move at the root, in expansion order.
    #[must_use]
    pub fn root_stats(&self) -> Vec<MoveStats<P::Move>> {
        self.tree
            .root_node()
            .children
            .iter()
            .map(|edge| {
                let child = self.tree.get(edge.child);
                MoveStats {
                    mv: edge.mv,
                    visits: child.visits,
                    total_reward: child.total_reward,
                }
            })
            .collect()
    }

    /// Drop the tree and the anchored position.
    pub fn reset(&mut self) {
        self.anchor = None;
        self.tree.reset(MCTSNode::root(Player::One));
    }

    /// Get search statistics.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the search tree.
    #[must_use]
    pub fn tree(&self) -> &MCTSTree<P::Move> {
        &self.tree
    }

    /// Get the configuration.
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// Point the tree root at `position`, reusing the matching subtree if
    /// possible.
    fn anchor(&mut self, position: &P) -> Result<(), SearchError> {
        if position.result().is_some() {
            return Err(SearchError::GameAlreadyOver);
        }

        match self.descendant(position) {
            Some(node) => {
                if node != self.tree.root() {
                    self.tree.reroot(node);
                    trace!(nodes = self.tree.len(), "MCTS tree re-rooted");
                }
            }
            None => {
                let root = new_node(NodeId::NONE, None, position.to_move().opponent(), 0, position);
                self.tree.reset(root);
                trace!("MCTS tree reset");
            }
        }

        self.anchor = Some(position.clone());
        Ok(())
    }

    /// Node for `position` below the current root, if the tree may be reused.
    fn descendant(&self, position: &P) -> Option<NodeId> {
        if !self.config.reuse_tree {
            return None;
        }
        let anchor = self.anchor.as_ref()?;
        if !anchor.same_setup(position) {
            return None;
        }

        let old = anchor.history();
        let new = position.history();
        if !new.starts_with(old) {
            return None;
        }

        new[old.len()..]
            .iter()
            .try_fold(self.tree.root(), |node, &mv| self.tree.child(node, mv))
    }

    /// Node whose state encodes to `encoded`, searched level by level from
    /// the root.
    fn find_encoded(&self, encoded: &[u8]) -> Option<NodeId> {
        let anchor = self.anchor.as_ref()?;
        let depth = P::pieces_in(encoded).checked_sub(P::pieces_in(&anchor.encode()))?;

        let mut frontier = vec![(self.tree.root(), anchor.clone())];
        for _ in 0..depth {
            frontier = frontier
                .into_iter()
                .flat_map(|(node, position)| {
                    self.tree.get(node).children.iter().map(move |edge| {
                        let mut next = position.clone();
                        next.play(edge.mv);
                        (edge.child, next)
                    })
                })
                .collect();
        }

        frontier
            .into_iter()
            .find(|(_, position)| position.encode() == encoded)
            .map(|(node, _)| node)
    }

    /// Single MCTS iteration: select, expand, simulate, backpropagate.
    fn iteration(&mut self, root_position: &P) {
        let mut position = root_position.clone();
        let mut current = self.tree.root();

        // === SELECTION ===
        loop {
            let node = self.tree.get(current);
            if node.is_terminal || !node.untried.is_empty() || node.children.is_empty() {
                break;
            }
            let idx = self.selection.select(&self.tree, current, &self.config);
            let edge = node.children[idx];
            position.play(edge.mv);
            current = edge.child;
        }

        // === EXPANSION ===
        let node = self.tree.get(current);
        if !node.is_terminal && !node.untried.is_empty() && self.tree.len() < self.config.max_nodes {
            let pick = self.rng.below(node.untried.len());
            let (mover, depth) = (node.to_move, node.depth + 1);
            let mv = self.tree.get_mut(current).untried.swap_remove(pick);
            position.play(mv);

            let child = self.tree.alloc(new_node(current, Some(mv), mover, depth, &position));
            self.tree.get_mut(current).children.push(Edge { mv, child });
            self.stats.nodes_expanded += 1;
            self.stats.max_depth = self.stats.max_depth.max(depth);
            current = child;
        }

        // === SIMULATION ===
        let result = match self.tree.get(current).result {
            Some(result) => result,
            None => {
                let mut sim_rng = self.rng.fork();
                rollout(self.simulation.as_ref(), &mut position, &mut sim_rng)
            }
        };

        // === BACKPROPAGATION ===
        self.tree.backpropagate(current, &result);
        self.stats.iterations += 1;
        self.stats
            .record_outcome(result.reward_for(self.tree.root_node().to_move));
    }
}

/// Fresh node for `position`, with its legal moves untried.
fn new_node<P: Position>(
    parent: NodeId,
    mv: Option<P::Move>,
    mover: Player,
    depth: u32,
    position: &P,
) -> MCTSNode<P::Move> {
    MCTSNode::new(parent, mv, mover, position.to_move(), depth)
        .with_result(position.result())
        .with_untried(position.legal_moves())
}

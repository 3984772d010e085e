//! MCTS node and edge structures.
//!
//! Uses arena-based allocation with index references (NodeId) for efficiency
//! and serializability.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Player;
use crate::rules::GameResult;

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// Expanded move from a parent node to its child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<M> {
    pub mv: M,
    pub child: NodeId,
}

/// A node in the MCTS tree.
///
/// `total_reward` is accumulated for `mover`, the player whose move led
/// here, so a parent ranks its children by their own mean reward.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode<M> {
    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Move that led here from the parent (None for root).
    pub mv: Option<M>,

    /// Player who made `mv`.
    pub mover: Player,

    /// Player to move at this node.
    pub to_move: Player,

    /// Depth in tree (root = 0).
    pub depth: u32,

    /// Total visits to this node.
    pub visits: u32,

    /// Sum of playout rewards for `mover`.
    pub total_reward: f64,

    /// Is this a terminal game state?
    pub is_terminal: bool,

    /// Game result (if terminal).
    pub result: Option<GameResult>,

    /// Expanded children, in expansion order.
    pub children: SmallVec<[Edge<M>; 8]>,

    /// Legal moves without a child yet.
    pub untried: SmallVec<[M; 8]>,
}

impl<M: Copy + Eq> MCTSNode<M> {
    /// Create a new node.
    pub fn new(parent: NodeId, mv: Option<M>, mover: Player, to_move: Player, depth: u32) -> Self {
        Self {
            parent,
            mv,
            mover,
            to_move,
            depth,
            visits: 0,
            total_reward: 0.0,
            is_terminal: false,
            result: None,
            children: SmallVec::new(),
            untried: SmallVec::new(),
        }
    }

    /// Create a root node.
    pub fn root(to_move: Player) -> Self {
        Self::new(NodeId::NONE, None, to_move.opponent(), to_move, 0)
    }

    /// Mark the node terminal with the given result.
    pub fn with_result(mut self, result: Option<GameResult>) -> Self {
        self.is_terminal = result.is_some();
        self.result = result;
        self
    }

    /// Set the moves still to expand.
    pub fn with_untried(mut self, moves: impl IntoIterator<Item = M>) -> Self {
        self.untried = moves.into_iter().collect();
        self
    }

    /// Mean reward for `mover`, 0 when unvisited.
    #[must_use]
    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / self.visits as f64
        }
    }

    /// Check if every legal move has a child.
    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// Child reached by `mv`, if expanded.
    #[must_use]
    pub fn child(&self, mv: M) -> Option<NodeId> {
        self.children.iter().find(|edge| edge.mv == mv).map(|edge| edge.child)
    }
}

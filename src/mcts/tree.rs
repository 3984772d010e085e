//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MCTSNode>` with index-based references for efficiency,
//! cache-friendliness, and serializability. Re-rooting copies the kept
//! subtree into a fresh arena so stale siblings never linger.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::node::{MCTSNode, NodeId};
use crate::rules::GameResult;

/// Arena-based MCTS tree.
///
/// Nodes are stored in a flat vector and referenced by `NodeId` indices.
/// This avoids reference counting overhead and enables serialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree<M> {
    /// All nodes in the tree.
    nodes: Vec<MCTSNode<M>>,

    /// The root node ID (always 0).
    root: NodeId,
}

impl<M: Copy + Eq> MCTSTree<M> {
    /// Create a new tree holding only `root`.
    pub fn new(root: MCTSNode<M>) -> Self {
        Self::with_capacity(root, 1024)
    }

    /// Create a tree with custom initial capacity.
    pub fn with_capacity(root: MCTSNode<M>, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(root);
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode<M> {
        &self.nodes[id.index()]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode<M> {
        &mut self.nodes[id.index()]
    }

    /// Allocate a new node, returning its ID.
    pub fn alloc(&mut self, node: MCTSNode<M>) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &MCTSNode<M> {
        self.get(self.root)
    }

    /// Child of `node` reached by `mv`, if expanded.
    #[must_use]
    pub fn child(&self, node: NodeId, mv: M) -> Option<NodeId> {
        self.get(node).child(mv)
    }

    /// Clear the tree and reset with a new root.
    pub fn reset(&mut self, root: MCTSNode<M>) {
        self.nodes.clear();
        self.nodes.push(root);
        self.root = NodeId::new(0);
    }

    /// Credit one playout result to every node from `leaf` up to the root.
    ///
    /// Each node is credited from its own mover's perspective: 1 for a
    /// win, 0 for a loss, 0.5 for a draw.
    pub fn backpropagate(&mut self, leaf: NodeId, result: &GameResult) {
        let mut current = leaf;
        while !current.is_none() {
            let node = self.get_mut(current);
            node.visits += 1;
            node.total_reward += result.reward_for(node.mover);
            current = node.parent;
        }
    }

    /// Make `new_root` the root, discarding everything outside its subtree.
    ///
    /// Surviving nodes are renumbered breadth-first, so parents always
    /// precede their children and the new root is `NodeId(0)`.
    pub fn reroot(&mut self, new_root: NodeId) {
        if new_root == self.root {
            return;
        }

        let mut remap = vec![NodeId::NONE; self.nodes.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::from([new_root]);
        while let Some(id) = queue.pop_front() {
            remap[id.index()] = NodeId::new(order.len() as u32);
            order.push(id);
            queue.extend(self.get(id).children.iter().map(|edge| edge.child));
        }

        let base_depth = self.get(new_root).depth;
        let mut old: Vec<Option<MCTSNode<M>>> = std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(order.len().max(1024));

        for id in order {
            let Some(mut node) = old[id.index()].take() else {
                continue;
            };
            if id == new_root {
                node.parent = NodeId::NONE;
                node.mv = None;
            } else {
                node.parent = remap[node.parent.index()];
            }
            node.depth -= base_depth;
            for edge in node.children.iter_mut() {
                edge.child = remap[edge.child.index()];
            }
            nodes.push(node);
        }

        self.nodes = nodes;
        self.root = NodeId::new(0);
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let terminal_count = self.nodes.iter().filter(|n| n.is_terminal).count();
        let expanded_moves: usize = self.nodes.iter().map(|n| n.children.len()).sum();
        let untried_moves: usize = self.nodes.iter().map(|n| n.untried.len()).sum();

        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            terminal_count,
            expanded_moves,
            untried_moves,
        }
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode<M>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Maximum depth reached.
    pub max_depth: u32,

    /// Number of terminal nodes.
    pub terminal_count: usize,

    /// Moves with a child node.
    pub expanded_moves: usize,

    /// Legal moves not yet expanded.
    pub untried_moves: usize,
}

impl TreeStats {
    /// Get the expansion ratio (expanded moves / all known moves).
    #[must_use]
    pub fn expansion_ratio(&self) -> f64 {
        let total = self.expanded_moves + self.untried_moves;
        if total == 0 {
            0.0
        } else {
            self.expanded_moves as f64 / total as f64
        }
    }
}

//! Monte Carlo Tree Search over any [`Position`](crate::rules::Position).
//!
//! ## Overview
//!
//! - **Arena tree**: nodes live in a flat vector addressed by `NodeId`
//! - **Time-bounded**: `think` runs iterations until a wall-clock budget
//!   is spent, checking the clock once per iteration
//! - **Tree reuse**: a search on a position that descends from the last
//!   searched one keeps the matching subtree
//! - **Configurable Policies**: selection (UCB1) and rollout move choice
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use connect_mcts::game::Game;
//! use connect_mcts::mcts::{MCTSConfig, MCTSSearch};
//!
//! let game = Game::default();
//! let mut search = MCTSSearch::new(MCTSConfig::default());
//!
//! let weights = search.think(&game, Duration::from_millis(10)).unwrap();
//! assert_eq!(weights.len(), 7);
//!
//! if let Some(column) = search.best_move() {
//!     println!("play column {column}");
//! }
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::MCTSConfig;
pub use node::{Edge, MCTSNode, NodeId};
pub use policy::{rollout, RandomSimulation, SelectionPolicy, SimulationPolicy, UCB1};
pub use search::{MCTSSearch, UNEXPLORED_WEIGHT};
pub use stats::{MoveStats, SearchStats};
pub use tree::{MCTSTree, TreeStats};

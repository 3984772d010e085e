//! # connect-mcts
//!
//! Generalized Connect-Four (any column count, row count and run length)
//! with a time-bounded Monte Carlo Tree Search opponent.
//!
//! ## Design Principles
//!
//! 1. **Rules and search are separate**: the search only sees games
//!    through the [`Position`] trait and never mutates the caller's game.
//!
//! 2. **Local win detection**: a drop only inspects the four axes through
//!    the placed token, so checking for a win never scans the board.
//!
//! 3. **Explicit engine context**: hosting code owns an [`Engine`]; there
//!    is no global state.
//!
//! ## Modules
//!
//! - `core`: Players, cells, board configuration, RNG
//! - `game`: Board and the rules state machine
//! - `rules`: `Position` trait used by the search
//! - `mcts`: Monte Carlo Tree Search
//! - `facade`: Game registry and transport request/response types
//! - `error`: Error types for every layer

pub mod core;
pub mod error;
pub mod facade;
pub mod game;
pub mod mcts;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{Cell, GameConfig, GameRng, Player};

pub use crate::error::{FacadeError, GameError, SearchError};

pub use crate::facade::{Engine, EngineConfig, GameId, Request, Response};

pub use crate::game::{Board, Game, GameStatus};

pub use crate::mcts::{MCTSConfig, MCTSSearch, MoveStats, SearchStats, UNEXPLORED_WEIGHT};

pub use crate::rules::{GameResult, Position};

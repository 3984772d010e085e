//! Generalized Connect-Four rules.
//!
//! - `board`: the gravity grid and its compact byte encoding
//! - `state`: the `Game` state machine (drops, turn order, win/draw detection)

pub mod board;
pub mod state;

pub use board::Board;
pub use state::{Game, GameStatus};

//! The seam between a rules engine and the search.
//!
//! The search only ever sees a game through [`Position`]: it clones the
//! caller's position, plays moves on the clones and reads the result. The
//! caller's own game is never mutated.

pub mod engine;

pub use engine::{GameResult, Position};

//! Core types shared by the rules engine and the search: players, cells,
//! board configuration and the deterministic RNG.

pub mod config;
pub mod player;
pub mod rng;

pub use config::GameConfig;
pub use player::{Cell, Player};
pub use rng::GameRng;

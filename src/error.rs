//! Error types for each layer of the engine.
//!
//! Every failure is detected before any state is touched, so a returned
//! error always means the game and search tree are exactly as they were.

use crate::facade::GameId;

/// Errors raised by the game rules engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid configuration {cols}x{rows} with win length {win_length}: {reason}")]
    InvalidConfiguration {
        cols: usize,
        rows: usize,
        win_length: usize,
        reason: &'static str,
    },

    #[error("invalid column {column} (board has {cols} columns)")]
    InvalidColumn { column: usize, cols: usize },

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("game is already over")]
    GameOver,

    #[error("invalid board encoding: {0}")]
    InvalidEncoding(String),
}

/// Errors raised by the search engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("cannot search a game that is already over")]
    GameAlreadyOver,
}

/// Errors surfaced by the engine facade.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FacadeError {
    #[error("no game with id {0}")]
    InvalidHandle(GameId),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl FacadeError {
    /// True when the operation failed because the game had already ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        matches!(
            self,
            FacadeError::Game(GameError::GameOver) | FacadeError::Search(SearchError::GameAlreadyOver)
        )
    }
}

//! The rules state machine.
//!
//! A `Game` owns one [`Board`] and tracks whose turn it is, how many moves
//! have been made and whether the game has ended. Win detection only looks
//! at the four axes through the cell that was just filled, so each drop
//! costs O(win_length) regardless of board size.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Cell, GameConfig, Player};
use crate::error::GameError;

use super::board::Board;

/// Axis directions checked after a drop, in order: horizontal, vertical,
/// diagonal up-right, diagonal down-right.
const AXES: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Whether the game is running or how it ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    /// `cells` is the contiguous winning run as `(column, row)` pairs.
    Won { player: Player, cells: Vec<(usize, usize)> },
    Drawn,
}

/// A single game of generalized Connect-Four.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    board: Board,
    win_length: usize,
    current_player: Player,
    status: GameStatus,
    history: Vec<usize>,
}

impl Game {
    /// Create a game after validating the configuration.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            board: Board::new(config.cols, config.rows),
            win_length: config.win_length,
            current_player: Player::One,
            status: GameStatus::InProgress,
            history: Vec::new(),
        })
    }

    /// Create a game with the given dimensions, defaults filling any gaps.
    pub fn create(
        cols: Option<usize>,
        rows: Option<usize>,
        win_length: Option<usize>,
    ) -> Result<Self, GameError> {
        Self::new(GameConfig::from_options(cols, rows, win_length))
    }

    /// The board this game was created with.
    #[must_use]
    pub fn config(&self) -> GameConfig {
        GameConfig::new(self.board.cols(), self.board.rows(), self.win_length)
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.board.cols()
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.board.rows()
    }

    #[must_use]
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    #[must_use]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    #[must_use]
    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// Number of successful drops so far.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// Columns played so far, in order.
    #[must_use]
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    /// Columns whose topmost cell is empty, ascending.
    ///
    /// Only empty once the board is completely full; a won game still
    /// reports its open columns.
    #[must_use]
    pub fn valid_moves(&self) -> Vec<usize> {
        self.board.open_columns()
    }

    /// True once the game is won or drawn.
    #[must_use]
    pub fn over(&self) -> bool {
        !matches!(self.status, GameStatus::InProgress)
    }

    /// The winner, if the game was won. Use [`Game::status`] to tell a
    /// draw from a game in progress.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        match self.status {
            GameStatus::Won { player, .. } => Some(player),
            _ => None,
        }
    }

    /// The winning run, if the game was won.
    #[must_use]
    pub fn winner_cells(&self) -> Option<&[(usize, usize)]> {
        match &self.status {
            GameStatus::Won { cells, .. } => Some(cells),
            _ => None,
        }
    }

    /// Read-only view of the board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// `cols x rows` snapshot for rendering.
    #[must_use]
    pub fn board_cells(&self) -> Vec<Vec<Cell>> {
        self.board.columns()
    }

    /// Compact, order-preserving encoding of the board.
    #[must_use]
    pub fn serialize_state(&self) -> Vec<u8> {
        self.board.encode()
    }

    /// Drop the current player's token into `column`, returning its row.
    ///
    /// Fails without touching the game if it is over, the column is out of
    /// range or the column is full.
    pub fn drop(&mut self, column: usize) -> Result<usize, GameError> {
        if self.over() {
            return Err(GameError::GameOver);
        }

        let player = self.current_player;
        let row = self.board.drop(column, player)?;
        self.history.push(column);

        if let Some(cells) = self.winning_run(column, row, player) {
            self.status = GameStatus::Won { player, cells };
        } else if self.history.len() == self.config().cell_count() {
            self.status = GameStatus::Drawn;
        } else {
            self.current_player = player.opponent();
        }

        Ok(row)
    }

    /// Winning window through `(col, row)` for `player`, if any.
    ///
    /// Axes are tried in order. On the first axis with `win_length`
    /// consecutive tokens, the earliest `win_length` window along the axis
    /// that contains the placed cell is returned, ordered along the axis.
    fn winning_run(&self, col: usize, row: usize, player: Player) -> Option<Vec<(usize, usize)>> {
        let token = Cell::from(player);
        let (col, row) = (col as isize, row as isize);
        let reach = self.win_length - 1;

        for (dc, dr) in AXES {
            let backward = self.count_direction(col, row, -dc, -dr, token, reach);
            let forward = self.count_direction(col, row, dc, dr, token, reach);

            if backward + 1 + forward >= self.win_length {
                let start = (col - dc * backward as isize, row - dr * backward as isize);
                let cells = (0..self.win_length as isize)
                    .map(|step| ((start.0 + dc * step) as usize, (start.1 + dr * step) as usize))
                    .collect();
                return Some(cells);
            }
        }

        None
    }

    /// Consecutive `token` cells walking from `(col, row)` by `(dc, dr)`,
    /// excluding the start cell, counting at most `limit`.
    fn count_direction(
        &self,
        col: isize,
        row: isize,
        dc: isize,
        dr: isize,
        token: Cell,
        limit: usize,
    ) -> usize {
        let mut count = 0;
        let (mut c, mut r) = (col + dc, row + dr);
        while count < limit && self.board.get_signed(c, r) == Some(token) {
            count += 1;
            c += dc;
            r += dr;
        }
        count
    }
}

impl Default for Game {
    fn default() -> Self {
        Self {
            board: Board::new(7, 6),
            win_length: 4,
            current_player: Player::One,
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

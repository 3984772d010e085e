//! Board configuration.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Board dimensions and the run length needed to win.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of columns (default: 7).
    pub cols: usize,

    /// Number of rows (default: 6).
    pub rows: usize,

    /// Contiguous tokens needed to win (default: 4).
    pub win_length: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: 7,
            rows: 6,
            win_length: 4,
        }
    }
}

impl GameConfig {
    /// Create a config from explicit values.
    #[must_use]
    pub const fn new(cols: usize, rows: usize, win_length: usize) -> Self {
        Self { cols, rows, win_length }
    }

    /// Fill omitted values with the defaults.
    #[must_use]
    pub fn from_options(cols: Option<usize>, rows: Option<usize>, win_length: Option<usize>) -> Self {
        let defaults = Self::default();
        Self {
            cols: cols.unwrap_or(defaults.cols),
            rows: rows.unwrap_or(defaults.rows),
            win_length: win_length.unwrap_or(defaults.win_length),
        }
    }

    pub fn with_cols(mut self, cols: usize) -> Self {
        self.cols = cols;
        self
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_win_length(mut self, win_length: usize) -> Self {
        self.win_length = win_length;
        self
    }

    /// Total number of cells on the board.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Check that the dimensions are positive, the cell count fits in a
    /// `usize` and a win is reachable.
    ///
    /// A run of `win_length` fits on the board iff it fits along the longer
    /// of the two straight axes.
    pub fn validate(&self) -> Result<(), GameError> {
        let reason = if self.cols == 0 || self.rows == 0 {
            Some("dimensions must be positive")
        } else if self.cols.checked_mul(self.rows).is_none() {
            Some("board has too many cells")
        } else if self.win_length == 0 {
            Some("win length must be positive")
        } else if self.win_length > self.cols.max(self.rows) {
            Some("win length does not fit on the board")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(GameError::InvalidConfiguration {
                cols: self.cols,
                rows: self.rows,
                win_length: self.win_length,
                reason,
            }),
            None => Ok(()),
        }
    }
}

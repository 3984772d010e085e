//! Gravity grid.
//!
//! Cells are stored column-major (`index = col * rows + row`, row 0 at the
//! bottom), which is also the order of the compact encoding. A per-column
//! height keeps drops O(1) and enforces the gravity invariant: within a
//! column every empty cell lies above every filled one.

use std::fmt;

use crate::core::{Cell, Player};
use crate::error::GameError;

/// Fixed-size `cols x rows` grid with gravity-drop semantics.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    heights: Vec<usize>,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::Empty; cols * rows],
            heights: vec![0; cols],
        }
    }

    #[inline]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn index(&self, col: usize, row: usize) -> usize {
        col * self.rows + row
    }

    /// Cell at `(col, row)`. Panics if out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, col: usize, row: usize) -> Cell {
        self.cells[self.index(col, row)]
    }

    /// Cell at signed coordinates, `None` when off the board.
    #[inline]
    pub(crate) fn get_signed(&self, col: isize, row: isize) -> Option<Cell> {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            None
        } else {
            Some(self.get(col as usize, row as usize))
        }
    }

    /// Number of tokens in a column, which is also its lowest empty row.
    #[inline]
    #[must_use]
    pub fn height(&self, col: usize) -> usize {
        self.heights[col]
    }

    #[inline]
    #[must_use]
    pub fn is_column_full(&self, col: usize) -> bool {
        self.heights[col] >= self.rows
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|col| self.is_column_full(col))
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.heights.iter().sum()
    }

    /// Non-full columns in ascending order.
    #[must_use]
    pub fn open_columns(&self) -> Vec<usize> {
        (0..self.cols).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Place a token in the lowest empty cell of `col`, returning its row.
    pub fn drop(&mut self, col: usize, player: Player) -> Result<usize, GameError> {
        if col >= self.cols {
            return Err(GameError::InvalidColumn { column: col, cols: self.cols });
        }
        if self.is_column_full(col) {
            return Err(GameError::ColumnFull(col));
        }

        let row = self.heights[col];
        let idx = self.index(col, row);
        self.cells[idx] = Cell::from(player);
        self.heights[col] += 1;
        Ok(row)
    }

    /// Read-only `cols x rows` snapshot: one vector per column, bottom row first.
    #[must_use]
    pub fn columns(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.rows).map(<[Cell]>::to_vec).collect()
    }

    /// Compact encoding: one byte per cell, column-major, see [`Cell::to_byte`].
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        self.cells.iter().map(|cell| cell.to_byte()).collect()
    }

    /// Rebuild a board from [`Board::encode`] output.
    ///
    /// Rejects wrong lengths, unknown bytes and tokens floating above an
    /// empty cell.
    pub fn decode(cols: usize, rows: usize, bytes: &[u8]) -> Result<Self, GameError> {
        if bytes.len() != cols * rows {
            return Err(GameError::InvalidEncoding(format!(
                "expected {} bytes for a {}x{} board, got {}",
                cols * rows,
                cols,
                rows,
                bytes.len()
            )));
        }

        let mut board = Self::new(cols, rows);
        for col in 0..cols {
            for row in 0..rows {
                let byte = bytes[col * rows + row];
                let cell = Cell::from_byte(byte).ok_or_else(|| {
                    GameError::InvalidEncoding(format!("unknown cell byte {byte} at ({col},{row})"))
                })?;
                if cell.is_empty() {
                    continue;
                }
                if board.heights[col] != row {
                    return Err(GameError::InvalidEncoding(format!(
                        "token at ({col},{row}) floats above an empty cell"
                    )));
                }
                let idx = board.index(col, row);
                board.cells[idx] = cell;
                board.heights[col] += 1;
            }
        }

        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = (1..=self.cols).map(|i| format!("{i:^3}")).collect::<Vec<_>>().join("|");
        let separator = "-".repeat(self.cols * 4 + 1);

        writeln!(f, "|{header}|")?;
        for row in (0..self.rows).rev() {
            writeln!(f, "{separator}")?;
            let line = (0..self.cols)
                .map(|col| match self.get(col, row) {
                    Cell::Empty => "   ",
                    Cell::Player1 => " X ",
                    Cell::Player2 => " O ",
                })
                .collect::<Vec<_>>()
                .join("|");
            writeln!(f, "|{line}|")?;
        }
        write!(f, "{separator}")
    }
}

//! Position trait for searchable games.
//!
//! Games implement `Position` to expose:
//! - Whose turn it is and which moves are legal
//! - How a move changes the position
//! - Whether and how the game ended

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::Player;
use crate::game::Game;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(Player),
    /// Draw (no winner).
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: Player) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }

    /// Outcome value for `player`: 1 for a win, 0 for a loss, 0.5 for a draw.
    #[must_use]
    pub fn reward_for(&self, player: Player) -> f64 {
        match self {
            GameResult::Winner(winner) if *winner == player => 1.0,
            GameResult::Winner(_) => 0.0,
            GameResult::Draw => 0.5,
        }
    }
}

/// A two-player, alternating-move game position.
///
/// ## Implementation Notes
///
/// - `legal_moves`: empty once the game is over
/// - `play`: only called with a move from `legal_moves`
/// - `history`/`same_setup`: let the search decide whether a previously
///   searched root is an ancestor of a new position
pub trait Position: Clone {
    /// A move, e.g. a column index.
    type Move: Copy + Eq + Debug;

    /// Player to move.
    fn to_move(&self) -> Player;

    /// Legal moves in a stable order.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Apply a legal move.
    fn play(&mut self, mv: Self::Move);

    /// `Some(result)` once the game has ended.
    fn result(&self) -> Option<GameResult>;

    /// Compact encoding of the position's board.
    fn encode(&self) -> Vec<u8>;

    /// Moves played since the initial position.
    fn history(&self) -> &[Self::Move];

    /// True if both positions started from the same initial setup.
    fn same_setup(&self, other: &Self) -> bool;

    /// Number of tokens on the board for an encoding produced by
    /// [`Position::encode`].
    fn pieces_in(encoded: &[u8]) -> usize;
}

impl Position for Game {
    type Move = usize;

    fn to_move(&self) -> Player {
        self.current_player()
    }

    fn legal_moves(&self) -> Vec<usize> {
        if self.over() {
            Vec::new()
        } else {
            self.valid_moves()
        }
    }

    fn play(&mut self, mv: usize) {
        if let Err(err) = self.drop(mv) {
            trace!(column = mv, %err, "illegal move ignored");
        }
    }

    fn result(&self) -> Option<GameResult> {
        if let Some(player) = self.winner() {
            Some(GameResult::Winner(player))
        } else if self.over() {
            Some(GameResult::Draw)
        } else {
            None
        }
    }

    fn encode(&self) -> Vec<u8> {
        self.serialize_state()
    }

    fn history(&self) -> &[usize] {
        Game::history(self)
    }

    fn same_setup(&self, other: &Self) -> bool {
        self.config() == other.config()
    }

    fn pieces_in(encoded: &[u8]) -> usize {
        encoded.iter().filter(|&&byte| byte != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;

    #[test]
    fn test_game_result_rewards() {
        let result = GameResult::Winner(Player::Two);
        assert!(result.is_winner(Player::Two));
        assert!(!result.is_winner(Player::One));
        assert_eq!(result.reward_for(Player::Two), 1.0);
        assert_eq!(result.reward_for(Player::One), 0.0);

        let draw = GameResult::Draw;
        assert!(!draw.is_winner(Player::One));
        assert_eq!(draw.reward_for(Player::One), 0.5);
        assert_eq!(draw.reward_for(Player::Two), 0.5);
    }

    #[test]
    fn test_game_position_over_has_no_moves() {
        let mut game = Game::default();
        for col in [3, 0, 3, 0, 3, 0, 3] {
            game.play(col);
        }

        assert_eq!(game.result(), Some(GameResult::Winner(Player::One)));
        assert!(Position::legal_moves(&game).is_empty());
        // The rules engine still lists open columns.
        assert!(!game.valid_moves().is_empty());
    }

    #[test]
    fn test_game_position_draw() {
        let mut game = Game::new(GameConfig::new(3, 2, 3)).unwrap();
        for col in [0, 1, 2, 0, 1, 2] {
            game.play(col);
        }
        assert_eq!(game.result(), Some(GameResult::Draw));
    }

    #[test]
    fn test_pieces_in() {
        let mut game = Game::default();
        game.play(2);
        game.play(4);
        assert_eq!(Game::pieces_in(&game.encode()), 2);
        assert_eq!(Position::history(&game), &[2, 4]);
    }

    #[test]
    fn test_same_setup() {
        let a = Game::default();
        let b = Game::new(GameConfig::new(8, 6, 4)).unwrap();
        assert!(a.same_setup(&Game::default()));
        assert!(!a.same_setup(&b));
    }
}

//! Engine facade: the single entry point for hosting code.
//!
//! An [`Engine`] is an explicit context object that owns every live game
//! and one search engine. Games are addressed by [`GameId`]; ids are never
//! reused, so a freed id is rejected forever after.
//!
//! ```
//! use connect_mcts::facade::{Engine, NewGameRequest};
//!
//! let mut engine = Engine::default();
//! let game = engine.new_game(NewGameRequest::default()).unwrap();
//! let dropped = engine.drop(game.id, 3).unwrap();
//! assert_eq!(dropped.cell, [3, 0]);
//!
//! let weights = engine.think(game.id, Some(5)).unwrap();
//! assert_eq!(weights.len(), 7);
//!
//! engine.free_game(game.id).unwrap();
//! assert!(engine.drop(game.id, 3).is_err());
//! ```

pub mod protocol;

use std::fmt;
use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{FacadeError, SearchError};
use crate::game::Game;
use crate::mcts::{MCTSConfig, MCTSSearch};

pub use protocol::{
    BoardView, DropRequest, DropResponse, FreeGameRequest, MoveWeights, NewGameRequest,
    NewGameResponse, Request, Response, ThinkRequest,
};

/// Handle to a game owned by an [`Engine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(u64);

impl GameId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Facade configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Configuration of the shared search engine.
    pub search: MCTSConfig,

    /// Think time used when a request does not give one.
    pub default_think_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search: MCTSConfig::default(),
            default_think_ms: 1000,
        }
    }
}

impl EngineConfig {
    pub fn with_search(mut self, search: MCTSConfig) -> Self {
        self.search = search;
        self
    }

    pub fn with_default_think_ms(mut self, ms: u64) -> Self {
        self.default_think_ms = ms;
        self
    }
}

/// Game registry plus one search engine, used for many games in turn.
pub struct Engine {
    config: EngineConfig,
    games: FxHashMap<GameId, Game>,
    next_id: u64,
    search: MCTSSearch<Game>,
    /// Game the search tree was last built for.
    last_thought: Option<GameId>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let search = MCTSSearch::new(config.search.clone());
        Self {
            config,
            games: FxHashMap::default(),
            next_id: 1,
            search,
            last_thought: None,
        }
    }

    /// Create a game, defaults filling any omitted dimension.
    pub fn new_game(&mut self, request: NewGameRequest) -> Result<NewGameResponse, FacadeError> {
        let game = Game::create(request.cols, request.rows, request.win_length)?;

        let id = GameId::new(self.next_id);
        self.next_id += 1;

        let response = NewGameResponse {
            id,
            cols: game.cols(),
            rows: game.rows(),
            moves: game.valid_moves(),
            board: game.board_cells(),
        };
        debug!(
            game = %id,
            cols = game.cols(),
            rows = game.rows(),
            win_length = game.win_length(),
            "game created"
        );
        self.games.insert(id, game);
        Ok(response)
    }

    /// Release a game. Any later use of `id` fails with `InvalidHandle`.
    pub fn free_game(&mut self, id: GameId) -> Result<(), FacadeError> {
        if self.games.remove(&id).is_none() {
            warn!(game = %id, "free of unknown game");
            return Err(FacadeError::InvalidHandle(id));
        }
        if self.last_thought == Some(id) {
            self.search.reset();
            self.last_thought = None;
        }
        debug!(game = %id, "game freed");
        Ok(())
    }

    /// Drop the current player's token into `column`.
    pub fn drop(&mut self, id: GameId, column: usize) -> Result<DropResponse, FacadeError> {
        let game = self.games.get_mut(&id).ok_or_else(|| invalid_handle(id))?;
        let player = game.current_player();
        let row = game.drop(column)?;

        trace!(game = %id, %player, column, row, "token dropped");
        if game.over() {
            debug!(game = %id, winner = ?game.winner(), moves = game.move_count(), "game finished");
        }

        Ok(DropResponse {
            cell: [column, row],
            over: game.over(),
            cells: game
                .winner_cells()
                .map(|cells| cells.iter().map(|&(col, row)| [col, row]).collect()),
            moves: game.valid_moves(),
            board: game.board_cells(),
        })
    }

    /// Search the game for `duration_ms` (or the configured default) and
    /// weigh every legal move.
    pub fn think(&mut self, id: GameId, duration_ms: Option<u64>) -> Result<MoveWeights, FacadeError> {
        let game = self.games.get(&id).ok_or_else(|| invalid_handle(id))?;
        if game.over() {
            return Err(SearchError::GameAlreadyOver.into());
        }

        if self.last_thought != Some(id) {
            self.search.reset();
        }
        let duration = Duration::from_millis(duration_ms.unwrap_or(self.config.default_think_ms));
        let weights = self.search.think(game, duration)?;
        self.last_thought = Some(id);
        Ok(weights)
    }

    /// Read-only access to a live game.
    pub fn game(&self, id: GameId) -> Result<&Game, FacadeError> {
        self.games.get(&id).ok_or_else(|| invalid_handle(id))
    }

    /// Number of live games.
    #[must_use]
    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// The shared search engine, e.g. for its statistics after `think`.
    #[must_use]
    pub fn search(&self) -> &MCTSSearch<Game> {
        &self.search
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one transport request.
    pub fn dispatch(&mut self, request: Request) -> Result<Response, FacadeError> {
        match request {
            Request::NewGame(req) => self.new_game(req).map(Response::NewGame),
            Request::FreeGame(req) => self.free_game(req.game_id).map(|()| Response::FreeGame),
            Request::Drop(req) => self.drop(req.game_id, req.column).map(Response::Drop),
            Request::Think(req) => self.think(req.game_id, req.duration_ms).map(Response::Think),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn invalid_handle(id: GameId) -> FacadeError {
    warn!(game = %id, "unknown game id");
    FacadeError::InvalidHandle(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cell;
    use crate::error::{GameError, SearchError};

    fn engine() -> Engine {
        Engine::new(EngineConfig::default().with_default_think_ms(5))
    }

    #[test]
    fn test_new_game_defaults() {
        let mut engine = engine();
        let game = engine.new_game(NewGameRequest::default()).unwrap();

        assert_eq!((game.cols, game.rows), (7, 6));
        assert_eq!(game.moves, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(game.board.len(), 7);
        assert!(game.board.iter().all(|col| col.len() == 6 && col.iter().all(|c| *c == Cell::Empty)));
        assert_eq!(engine.game_count(), 1);
    }

    #[test]
    fn test_ids_are_unique_and_never_reused() {
        let mut engine = engine();
        let a = engine.new_game(NewGameRequest::default()).unwrap().id;
        engine.free_game(a).unwrap();
        let b = engine.new_game(NewGameRequest::default()).unwrap().id;

        assert_ne!(a, b);
        assert_eq!(engine.free_game(a), Err(FacadeError::InvalidHandle(a)));
    }

    #[test]
    fn test_invalid_configuration_creates_nothing() {
        let mut engine = engine();
        let request = NewGameRequest { cols: Some(2), rows: Some(2), win_length: Some(3) };

        assert!(matches!(
            engine.new_game(request),
            Err(FacadeError::Game(GameError::InvalidConfiguration { .. }))
        ));
        assert_eq!(engine.game_count(), 0);
    }

    #[test]
    fn test_drop_reports_win() {
        let mut engine = engine();
        let id = engine.new_game(NewGameRequest::default()).unwrap().id;

        for col in [3, 0, 3, 0, 3, 0] {
            assert!(!engine.drop(id, col).unwrap().over);
        }
        let last = engine.drop(id, 3).unwrap();

        assert!(last.over);
        assert_eq!(last.cell, [3, 3]);
        assert_eq!(last.cells, Some(vec![[3, 0], [3, 1], [3, 2], [3, 3]]));
        assert_eq!(engine.drop(id, 1), Err(FacadeError::Game(GameError::GameOver)));
    }

    #[test]
    fn test_think_on_finished_game() {
        let mut engine = engine();
        let id = engine.new_game(NewGameRequest { win_length: Some(1), ..Default::default() }).unwrap().id;
        engine.drop(id, 0).unwrap();

        let err = engine.think(id, Some(1)).unwrap_err();
        assert_eq!(err, FacadeError::Search(SearchError::GameAlreadyOver));
        assert!(err.is_game_over());
    }

    #[test]
    fn test_think_resets_between_games() {
        let mut engine = engine();
        let a = engine.new_game(NewGameRequest::default()).unwrap().id;
        let b = engine.new_game(NewGameRequest::default()).unwrap().id;

        engine.think(a, Some(5)).unwrap();
        let visits_a = engine.search().tree().root_node().visits;
        assert!(visits_a > 0);

        // Same empty position, but a different game: statistics start over.
        engine.think(b, Some(0)).unwrap();
        assert_eq!(engine.search().tree().root_node().visits, 1);
    }

    #[test]
    fn test_dispatch() {
        let mut engine = engine();
        let Response::NewGame(created) = engine.dispatch(Request::NewGame(NewGameRequest::default())).unwrap() else {
            panic!("expected newGame response");
        };

        let response = engine
            .dispatch(Request::Drop(DropRequest { game_id: created.id, column: 6 }))
            .unwrap();
        assert!(matches!(response, Response::Drop(DropResponse { cell: [6, 0], .. })));

        let response = engine
            .dispatch(Request::Think(ThinkRequest { game_id: created.id, duration_ms: Some(1) }))
            .unwrap();
        assert!(matches!(response, Response::Think(ref weights) if weights.len() == 7));

        let response = engine
            .dispatch(Request::FreeGame(FreeGameRequest { game_id: created.id }))
            .unwrap();
        assert_eq!(response, Response::FreeGame);
        assert_eq!(engine.game_count(), 0);
    }
}

//! Request and response payloads exchanged with a hosting transport.
//!
//! Field names follow the message shapes the transport already speaks:
//! `gameId` is camelCase, `win_length` and `duration_ms` are not.

use serde::{Deserialize, Serialize};

use crate::core::Cell;

use super::GameId;

/// Board as seen by a renderer: one vector per column, bottom row first.
pub type BoardView = Vec<Vec<Cell>>;

/// `(column, weight)` pairs in legal-move order.
pub type MoveWeights = Vec<(usize, f64)>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameRequest {
    pub cols: Option<usize>,
    pub rows: Option<usize>,
    pub win_length: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameResponse {
    pub id: GameId,
    pub cols: usize,
    pub rows: usize,
    pub moves: Vec<usize>,
    pub board: BoardView,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeGameRequest {
    pub game_id: GameId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropRequest {
    pub game_id: GameId,
    pub column: usize,
}

/// Outcome of a successful drop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropResponse {
    /// `[column, row]` of the placed token.
    pub cell: [usize; 2],
    pub over: bool,
    /// The winning run, once the game is won.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<[usize; 2]>>,
    pub moves: Vec<usize>,
    pub board: BoardView,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkRequest {
    #[serde(rename = "gameId")]
    pub game_id: GameId,
    /// Falls back to the engine's default think time when absent.
    #[serde(default, alias = "duration")]
    pub duration_ms: Option<u64>,
}

/// A transport message, tagged by operation name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", content = "payload", rename_all = "camelCase")]
pub enum Request {
    NewGame(NewGameRequest),
    FreeGame(FreeGameRequest),
    Drop(DropRequest),
    Think(ThinkRequest),
}

/// Result of a dispatched [`Request`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "result", rename_all = "camelCase")]
pub enum Response {
    NewGame(NewGameResponse),
    FreeGame,
    Drop(DropResponse),
    Think(MoveWeights),
}

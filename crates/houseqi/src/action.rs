//! Move requests.
//!
//! A move names a source and a destination. The source is either a board
//! square or a slot in one side's reserve; the destination is always a
//! square. Moves are consumed once by whoever owns the game state.

use crate::piece::Side;
use serde::{Deserialize, Serialize};

/// Grid coordinates, row first.
///
/// Serialized as a `[row, col]` pair, the shape clients use to highlight
/// the last move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[usize; 2]", from = "[usize; 2]")]
pub struct Square {
    /// Row index, 0 at Black's back rank.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl Square {
    /// Creates a square.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<Square> for [usize; 2] {
    fn from(square: Square) -> Self {
        [square.row, square.col]
    }
}

impl From<[usize; 2]> for Square {
    fn from([row, col]: [usize; 2]) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Where a moved piece comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// A square on the move's board.
    OnBoard(Square),
    /// An entry in a side's reserve on the move's board.
    ///
    /// Indices shift when earlier entries are dropped, so they are only
    /// meaningful against the state at the time of the request.
    Reserve {
        /// Owner of the reserve.
        side: Side,
        /// Position in the reserve.
        index: usize,
    },
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::OnBoard(square) => write!(f, "{square}"),
            Location::Reserve { side, index } => write!(f, "{side} reserve #{index}"),
        }
    }
}

/// A request to move or drop one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Index of the board the move is played on.
    pub board: usize,
    /// Source of the piece.
    pub from: Location,
    /// Destination square.
    pub to: Square,
}

impl Move {
    /// A board-to-board move.
    pub fn on_board(board: usize, from: Square, to: Square) -> Self {
        Self {
            board,
            from: Location::OnBoard(from),
            to,
        }
    }

    /// A drop from `side`'s reserve.
    pub fn drop_from(board: usize, side: Side, index: usize, to: Square) -> Self {
        Self {
            board,
            from: Location::Reserve { side, index },
            to,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "board {}: {} -> {}", self.board, self.from, self.to)
    }
}

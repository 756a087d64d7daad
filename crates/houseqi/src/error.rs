//! Errors raised while applying a move.

use crate::action::Square;
use crate::piece::Side;

/// Broad classification of a [`MoveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MoveErrorKind {
    /// The request referenced something that does not exist.
    #[display("invalid input")]
    InvalidInput,
    /// The game state itself is inconsistent.
    #[display("invariant violation")]
    Invariant,
}

/// Error that can occur when resolving or applying a move.
///
/// A move that fails never mutates the game state.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The board index is past the end of the table.
    #[display("Board {} does not exist ({} boards)", board, boards)]
    NoSuchBoard {
        /// Requested board.
        board: usize,
        /// Number of boards in the game.
        boards: usize,
    },

    /// Coordinates fall outside the grid.
    #[display("Square {} is outside the {}x{} grid", square, rows, cols)]
    SquareOutOfRange {
        /// Requested square.
        square: Square,
        /// Grid height.
        rows: usize,
        /// Grid width.
        cols: usize,
    },

    /// The source square holds no piece.
    #[display("No piece at {}", _0)]
    EmptySquare(Square),

    /// The reserve index is past the end of the reserve.
    #[display("{} reserve has no entry {} ({} entries)", side, index, len)]
    EmptyReserveSlot {
        /// Owner of the reserve.
        side: Side,
        /// Requested index.
        index: usize,
        /// Current reserve length.
        len: usize,
    },

    /// The game state broke one of its own invariants.
    #[display("Invariant violation: {}", _0)]
    Invariant(String),
}

impl MoveError {
    /// Whether this is bad input or a state defect.
    pub fn kind(&self) -> MoveErrorKind {
        match self {
            MoveError::Invariant(_) => MoveErrorKind::Invariant,
            _ => MoveErrorKind::InvalidInput,
        }
    }
}

impl std::error::Error for MoveError {}

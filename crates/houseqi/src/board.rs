//! One playing surface: grid, reserves, turn and last-move trace.

use crate::action::Square;
use crate::error::MoveError;
use crate::piece::{Cell, ParsePieceError, Piece, Side};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Standard opening position, row 0 is Black's back rank.
pub const STARTING_POSITION: [[&str; 9]; 10] = [
    ["bR", "bH", "bE", "bA", "bG", "bA", "bE", "bH", "bR"],
    ["", "", "", "", "", "", "", "", ""],
    ["", "bC", "", "", "", "", "", "bC", ""],
    ["bP", "", "bP", "", "bP", "", "bP", "", "bP"],
    ["", "", "", "", "", "", "", "", ""],
    ["", "", "", "", "", "", "", "", ""],
    ["rP", "", "rP", "", "rP", "", "rP", "", "rP"],
    ["", "rC", "", "", "", "", "", "rC", ""],
    ["", "", "", "", "", "", "", "", ""],
    ["rR", "rH", "rE", "rA", "rG", "rA", "rE", "rH", "rR"],
];

/// State of a single board.
///
/// Field names match the JSON clients consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    position: Vec<Vec<Cell>>,
    red_drops: Vec<Piece>,
    black_drops: Vec<Piece>,
    turn: Side,
    previous: Vec<Square>,
}

impl Board {
    /// Creates a board in the standard starting position, Red to move.
    pub fn new() -> Self {
        let position = STARTING_POSITION
            .iter()
            .map(|row| {
                row.iter()
                    .map(|code| {
                        code.parse::<Piece>()
                            .map_or(Cell::Empty, Cell::Occupied)
                    })
                    .collect()
            })
            .collect();
        Self::with_position(position)
    }

    /// Creates a board from a grid, Red to move, no reserves.
    pub fn with_position(position: Vec<Vec<Cell>>) -> Self {
        Self {
            position,
            red_drops: Vec::new(),
            black_drops: Vec::new(),
            turn: Side::Red,
            previous: Vec::new(),
        }
    }

    /// Parses a grid of piece codes (`""` for empty).
    pub fn from_codes<R, S>(rows: &[R]) -> Result<Self, ParsePieceError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let position = rows
            .iter()
            .map(|row| {
                row.as_ref()
                    .iter()
                    .map(|code| Cell::try_from(code.as_ref().to_string()))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_position(position))
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.position.len()
    }

    /// Number of columns (width of the first row).
    pub fn cols(&self) -> usize {
        self.position.first().map_or(0, Vec::len)
    }

    /// The grid, row-major.
    pub fn position(&self) -> &[Vec<Cell>] {
        &self.position
    }

    /// An independent copy of the grid.
    pub fn duplicate_position(&self) -> Vec<Vec<Cell>> {
        self.position.iter().map(|row| row.to_vec()).collect()
    }

    /// The cell at `square`, if it is on the grid.
    pub fn cell(&self, square: Square) -> Option<Cell> {
        self.position
            .get(square.row)
            .and_then(|row| row.get(square.col))
            .copied()
    }

    /// Whose turn it is.
    pub fn turn(&self) -> Side {
        self.turn
    }

    /// Squares touched by the most recent move, destination first.
    pub fn previous(&self) -> &[Square] {
        &self.previous
    }

    /// Pieces `side` may drop.
    pub fn reserve(&self, side: Side) -> &[Piece] {
        match side {
            Side::Red => &self.red_drops,
            Side::Black => &self.black_drops,
        }
    }

    /// Overwrites a cell.
    pub fn set(&mut self, square: Square, cell: Cell) -> Result<(), MoveError> {
        self.check_square(square)?;
        self.position[square.row][square.col] = cell;
        Ok(())
    }

    /// Appends to a reserve, keeping every entry owned by the reserve's side.
    #[instrument(skip(self, piece), fields(piece = %piece))]
    pub fn push_reserve(&mut self, piece: Piece) {
        self.reserve_mut(piece.side()).push(piece);
    }

    /// Fails unless `square` lies on the grid.
    pub fn check_square(&self, square: Square) -> Result<(), MoveError> {
        if self.cell(square).is_some() {
            Ok(())
        } else {
            Err(MoveError::SquareOutOfRange {
                square,
                rows: self.rows(),
                cols: self.cols(),
            })
        }
    }

    /// Fails unless `index` holds an entry of `side`'s reserve.
    pub fn check_reserve(&self, side: Side, index: usize) -> Result<Piece, MoveError> {
        let reserve = self.reserve(side);
        let piece = reserve
            .get(index)
            .copied()
            .ok_or(MoveError::EmptyReserveSlot {
                side,
                index,
                len: reserve.len(),
            })?;
        if piece.side() != side {
            return Err(MoveError::Invariant(format!(
                "{side} reserve holds {piece} at index {index}"
            )));
        }
        Ok(piece)
    }

    /// Empties a cell, returning what it held.
    pub(crate) fn take(&mut self, square: Square) -> Cell {
        std::mem::take(&mut self.position[square.row][square.col])
    }

    /// Puts `piece` on `square`, returning the previous contents.
    pub(crate) fn place(&mut self, square: Square, piece: Piece) -> Cell {
        std::mem::replace(&mut self.position[square.row][square.col], piece.into())
    }

    /// Removes a reserve entry, shifting later entries down.
    pub(crate) fn remove_reserve(&mut self, side: Side, index: usize) -> Piece {
        self.reserve_mut(side).remove(index)
    }

    pub(crate) fn set_previous(&mut self, previous: Vec<Square>) {
        self.previous = previous;
    }

    pub(crate) fn toggle_turn(&mut self) {
        self.turn = self.turn.opponent();
    }

    fn reserve_mut(&mut self, side: Side) -> &mut Vec<Piece> {
        match side {
            Side::Red => &mut self.red_drops,
            Side::Black => &mut self.black_drops,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

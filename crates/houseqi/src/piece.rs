//! Sides, piece codes and cell values.
//!
//! On the wire every piece is a two letter code: the side (`r` or `b`)
//! followed by the kind (`R`, `H`, `E`, `A`, `G`, `C`, `P`). Empty cells
//! are the empty string.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the two players.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Side {
    /// Red moves first.
    #[serde(rename = "r")]
    #[strum(serialize = "r")]
    Red,
    /// Black.
    #[serde(rename = "b")]
    #[strum(serialize = "b")]
    Black,
}

impl Side {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Maps the numeric side used by move requests (0 = Red, 1 = Black).
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Side::Red),
            1 => Some(Side::Black),
            _ => None,
        }
    }
}

/// Kind of piece, independent of side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
)]
pub enum PieceKind {
    /// Chariot.
    #[strum(serialize = "R")]
    Rook,
    /// Horse.
    #[strum(serialize = "H")]
    Horse,
    /// Elephant (minister).
    #[strum(serialize = "E")]
    Elephant,
    /// Advisor (guard).
    #[strum(serialize = "A")]
    Advisor,
    /// General (king).
    #[strum(serialize = "G")]
    General,
    /// Cannon.
    #[strum(serialize = "C")]
    Cannon,
    /// Pawn (soldier).
    #[strum(serialize = "P")]
    Pawn,
}

/// A piece code: side plus kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{side}{kind}")]
#[serde(into = "String", try_from = "String")]
pub struct Piece {
    side: Side,
    kind: PieceKind,
}

impl Piece {
    /// Creates a piece.
    pub fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }

    /// Side that owns the piece.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Kind of the piece.
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Same kind, owned by `side`.
    pub fn relabeled(self, side: Side) -> Self {
        Self { side, ..self }
    }
}

/// A string that is not a valid piece code.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid piece code: {:?}", code)]
pub struct ParsePieceError {
    /// Offending input.
    pub code: String,
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePieceError {
            code: s.to_string(),
        };
        let mut chars = s.chars();
        let (Some(side), Some(kind), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(err());
        };
        let side = Side::from_str(&side.to_string()).map_err(|_| err())?;
        let kind = PieceKind::from_str(&kind.to_string()).map_err(|_| err())?;
        Ok(Self::new(side, kind))
    }
}

impl From<Piece> for String {
    fn from(piece: Piece) -> Self {
        piece.to_string()
    }
}

impl TryFrom<String> for Piece {
    type Error = ParsePieceError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

/// Contents of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Cell {
    /// No piece.
    #[default]
    Empty,
    /// A single piece.
    Occupied(Piece),
}

impl Cell {
    /// The piece in the cell, if any.
    pub fn piece(self) -> Option<Piece> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(piece) => Some(piece),
        }
    }

    /// Whether the cell holds no piece.
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<Piece> for Cell {
    fn from(piece: Piece) -> Self {
        Cell::Occupied(piece)
    }
}

impl From<Option<Piece>> for Cell {
    fn from(piece: Option<Piece>) -> Self {
        piece.map_or(Cell::Empty, Cell::Occupied)
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        cell.piece().map(String::from).unwrap_or_default()
    }
}

impl TryFrom<String> for Cell {
    type Error = ParsePieceError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        if code.is_empty() {
            Ok(Cell::Empty)
        } else {
            code.parse::<Piece>().map(Cell::Occupied)
        }
    }
}

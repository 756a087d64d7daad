//! JSON body of `POST /moves`.
//!
//! ```json
//! { "table": 0,
//!   "from": { "location": 0, "x": 6, "y": 0 },
//!   "to":   { "location": 0, "x": 5, "y": 0 } }
//! ```
//!
//! `location` 0 is a board square (`x` row, `y` column); 1 is a reserve
//! slot (`x` side, 0 Red or 1 Black; `y` index). Single-board clients omit
//! `table` and `location`, which both default to 0.

use derive_more::Display;
use houseqi::{Location, Move, Side, Square};
use serde::{Deserialize, Serialize};

/// Location tag for a board square.
pub const ON_BOARD: i64 = 0;
/// Location tag for a reserve slot.
pub const FROM_RESERVE: i64 = 1;

/// One end of a move as sent by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateBody {
    /// [`ON_BOARD`] or [`FROM_RESERVE`].
    #[serde(default)]
    pub location: i64,
    /// Row, or side for reserve slots.
    pub x: i64,
    /// Column, or reserve index.
    pub y: i64,
}

/// A move as sent by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveBody {
    /// Board index.
    #[serde(default)]
    pub table: i64,
    /// Source.
    pub from: CoordinateBody,
    /// Destination; must be a board square.
    pub to: CoordinateBody,
}

/// A decoded body that does not describe a move.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum WireError {
    /// `location` was neither 0 nor 1.
    #[display("Unknown location tag {}", _0)]
    UnknownLocation(i64),
    /// Reserve side was neither 0 nor 1.
    #[display("Unknown side {}", _0)]
    UnknownSide(i64),
    /// A coordinate or index was negative.
    #[display("{} must not be negative (got {})", field, value)]
    Negative {
        /// Which field.
        field: &'static str,
        /// Its value.
        value: i64,
    },
    /// The destination named a reserve slot.
    #[display("Destination must be a board square")]
    ReserveDestination,
}

impl std::error::Error for WireError {}

fn index(field: &'static str, value: i64) -> Result<usize, WireError> {
    usize::try_from(value).map_err(|_| WireError::Negative { field, value })
}

impl CoordinateBody {
    fn square(&self) -> Result<Square, WireError> {
        Ok(Square::new(index("x", self.x)?, index("y", self.y)?))
    }

    fn location(&self) -> Result<Location, WireError> {
        match self.location {
            ON_BOARD => self.square().map(Location::OnBoard),
            FROM_RESERVE => Ok(Location::Reserve {
                side: Side::from_index(self.x).ok_or(WireError::UnknownSide(self.x))?,
                index: index("y", self.y)?,
            }),
            other => Err(WireError::UnknownLocation(other)),
        }
    }
}

impl TryFrom<MoveBody> for Move {
    type Error = WireError;

    fn try_from(body: MoveBody) -> Result<Self, Self::Error> {
        let to = match body.to.location()? {
            Location::OnBoard(square) => square,
            Location::Reserve { .. } => return Err(WireError::ReserveDestination),
        };
        Ok(Move {
            board: index("table", body.table)?,
            from: body.from.location()?,
            to,
        })
    }
}

impl From<Move> for MoveBody {
    fn from(mv: Move) -> Self {
        let as_i64 = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        let from = match mv.from {
            Location::OnBoard(square) => CoordinateBody {
                location: ON_BOARD,
                x: as_i64(square.row),
                y: as_i64(square.col),
            },
            Location::Reserve { side, index } => CoordinateBody {
                location: FROM_RESERVE,
                x: match side {
                    Side::Red => 0,
                    Side::Black => 1,
                },
                y: as_i64(index),
            },
        };
        Self {
            table: as_i64(mv.board),
            from,
            to: CoordinateBody {
                location: ON_BOARD,
                x: as_i64(mv.to.row),
                y: as_i64(mv.to.col),
            },
        }
    }
}

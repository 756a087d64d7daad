//! Drop xiangqi game logic.
//!
//! Pure, synchronous game state for a xiangqi variant where captured pieces
//! return as droppable reserves. A game is either a single board or a table
//! of two boards, where each capture feeds the capturer's reserve on the
//! other board.
//!
//! # Example
//!
//! ```
//! use houseqi::{GameState, Move, Side, Square, Variant};
//!
//! let mut game = GameState::new(Variant::Table);
//! let mv = Move::on_board(0, Square::new(6, 0), Square::new(5, 0));
//! game.apply(&mv).unwrap();
//! assert_eq!(game.boards()[0].turn(), Side::Black);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod error;
mod game;
mod piece;

pub use action::{Location, Move, Square};
pub use board::{Board, STARTING_POSITION};
pub use error::{MoveError, MoveErrorKind};
pub use game::{GameState, MoveOutcome, Variant};
pub use piece::{Cell, ParsePieceError, Piece, PieceKind, Side};

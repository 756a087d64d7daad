//! Full game state and move application.
//!
//! A game is one board (the single variant) or two boards played side by
//! side (the table variant). On a table, pieces captured on one board are
//! handed to the capturing side's reserve on the other board.

use crate::action::{Location, Move};
use crate::board::Board;
use crate::error::MoveError;
use crate::piece::Piece;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, instrument};

/// Which layout of boards a game uses.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Variant {
    /// One board; captured pieces leave the game.
    Single,
    /// Two boards; captures feed the other board's reserves.
    #[default]
    Table,
}

impl Variant {
    /// Number of boards in this layout.
    pub fn board_count(self) -> usize {
        match self {
            Variant::Single => 1,
            Variant::Table => 2,
        }
    }

    /// The board that receives pieces captured on `board`, if any.
    ///
    /// `None` for a single board, or when `board` is not part of the layout.
    pub fn capture_target(self, board: usize) -> Option<usize> {
        match self {
            Variant::Single => None,
            Variant::Table => match board {
                0 => Some(1),
                1 => Some(0),
                _ => None,
            },
        }
    }
}

/// What applying a move did, beyond the board update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Piece that was on the destination square.
    pub captured: Option<Piece>,
    /// Board and converted piece added to a reserve, if any.
    pub transferred: Option<(usize, Piece)>,
}

/// Every board in the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    variant: Variant,
    boards: Vec<Board>,
}

impl GameState {
    /// Creates a game with every board in the starting position.
    #[instrument]
    pub fn new(variant: Variant) -> Self {
        debug!(boards = variant.board_count(), "Creating game state");
        Self {
            variant,
            boards: vec![Board::new(); variant.board_count()],
        }
    }

    /// Builds a game from existing boards; the count picks the variant.
    pub fn from_boards(boards: Vec<Board>) -> Option<Self> {
        let variant = match boards.len() {
            1 => Variant::Single,
            2 => Variant::Table,
            _ => return None,
        };
        Some(Self { variant, boards })
    }

    /// Board layout.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// All boards in table order.
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// Applies a move.
    ///
    /// Everything the move references is checked before anything changes,
    /// so a failed move leaves the state exactly as it was. Legality under
    /// the game's rules is not checked, nor is whose turn it is.
    #[instrument(skip(self, mv), fields(mv = %mv))]
    pub fn apply(&mut self, mv: &Move) -> Result<MoveOutcome, MoveError> {
        self.check(mv)?;
        let board = &mut self.boards[mv.board];

        let piece = match mv.from {
            Location::OnBoard(square) => board.take(square).piece(),
            Location::Reserve { side, index } => Some(board.remove_reserve(side, index)),
        }
        .ok_or_else(|| MoveError::Invariant(format!("source of {mv} resolved to nothing")))?;

        let captured = board.place(mv.to, piece).piece();

        let mut previous = vec![mv.to];
        if let Location::OnBoard(square) = mv.from {
            previous.push(square);
        }
        board.set_previous(previous);
        board.toggle_turn();

        let transferred = captured.and_then(|captured| self.transfer_capture(mv.board, captured));
        debug!(?captured, ?transferred, "Move applied");
        Ok(MoveOutcome {
            captured,
            transferred,
        })
    }

    /// Hands a captured piece to the capturer's reserve on the partner board.
    fn transfer_capture(&mut self, board: usize, captured: Piece) -> Option<(usize, Piece)> {
        let target = self.variant.capture_target(board)?;
        let converted = captured.relabeled(captured.side().opponent());
        self.boards.get_mut(target)?.push_reserve(converted);
        Some((target, converted))
    }

    fn check(&self, mv: &Move) -> Result<(), MoveError> {
        let board = self.boards.get(mv.board).ok_or(MoveError::NoSuchBoard {
            board: mv.board,
            boards: self.boards.len(),
        })?;
        board.check_square(mv.to)?;
        match mv.from {
            Location::OnBoard(square) => {
                board.check_square(square)?;
                if board.cell(square).is_none_or(|cell| cell.is_empty()) {
                    return Err(MoveError::EmptySquare(square));
                }
            }
            Location::Reserve { side, index } => {
                board.check_reserve(side, index)?;
            }
        }
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Variant::default())
    }
}

impl Serialize for GameState {
    /// A lone board object for the single variant, an array otherwise.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (self.variant, self.boards.as_slice()) {
            (Variant::Single, [board]) => board.serialize(serializer),
            _ => self.boards.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireGame {
    One(Board),
    Many(Vec<Board>),
}

impl<'de> Deserialize<'de> for GameState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let boards = match WireGame::deserialize(deserializer)? {
            WireGame::One(board) => vec![board],
            WireGame::Many(boards) => boards,
        };
        let count = boards.len();
        Self::from_boards(boards)
            .ok_or_else(|| serde::de::Error::invalid_length(count, &"one or two boards"))
    }
}

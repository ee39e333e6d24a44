use crate::logic::board::{Board, BoardCoordinate, Piece, PieceType, BOARD_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One ply. Built from the board *before* the move is applied, so that
/// `piece_moved` and `piece_captured` describe the pre-move squares.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Move {
    pub from: BoardCoordinate,
    pub to: BoardCoordinate,
    pub piece_moved: Piece,
    pub piece_captured: Option<Piece>,
    pub is_en_passant: bool,
    pub is_castle: bool,
    pub is_promotion: bool,
}

// Captured/moved piece bookkeeping does not take part in equality.
impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.is_en_passant == other.is_en_passant
            && self.is_castle == other.is_castle
            && self.is_promotion == other.is_promotion
    }
}

impl Eq for Move {}

impl Move {
    /// Reads the moved and captured pieces off `board`. `None` if `from` is empty.
    #[must_use]
    pub fn new(from: BoardCoordinate, to: BoardCoordinate, board: &Board) -> Option<Self> {
        let piece = board.get_piece(from)?;
        Some(Self::with_piece(from, to, piece, board))
    }

    pub(crate) fn with_piece(
        from: BoardCoordinate,
        to: BoardCoordinate,
        piece_moved: Piece,
        board: &Board,
    ) -> Self {
        Self {
            from,
            to,
            piece_moved,
            piece_captured: board.get_piece(to),
            is_en_passant: false,
            is_castle: false,
            is_promotion: false,
        }
    }

    /// Marks the move as an en-passant capture. The captured pawn is the
    /// opposite-coloured pawn standing beside the origin, not on `to`.
    #[must_use]
    pub fn en_passant(mut self) -> Self {
        self.is_en_passant = true;
        self.piece_captured = Some(Piece::new(
            PieceType::Pawn,
            self.piece_moved.color.opposite(),
        ));
        self
    }

    #[must_use]
    pub const fn castle(mut self) -> Self {
        self.is_castle = true;
        self
    }

    #[must_use]
    pub const fn promotion(mut self, is_promotion: bool) -> Self {
        self.is_promotion = is_promotion;
        self
    }

    /// Square of the pawn removed by an en-passant capture.
    pub const fn en_passant_victim(&self) -> BoardCoordinate {
        self.from.at_col_of(self.to)
    }

    /// Long coordinate form used by external engines, e.g. `e2e4` or `e7e8q`.
    pub fn to_coordinate_notation(&self) -> String {
        let mut s = String::with_capacity(5);
        s.push_str(&self.from.to_algebraic());
        s.push_str(&self.to.to_algebraic());
        if self.is_promotion {
            s.push('q');
        }
        s
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_coordinate_notation())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("expected 4 or 5 characters, got {0}")]
    InvalidLength(usize),
    #[error("invalid file '{0}'")]
    InvalidFile(char),
    #[error("invalid rank '{0}'")]
    InvalidRank(char),
    #[error("unsupported promotion piece '{0}'")]
    UnsupportedPromotion(char),
}

impl BoardCoordinate {
    /// Parses a square such as `e4`. Rank "1" maps to row 7, file "a" to col 0.
    pub fn from_algebraic(s: &str) -> Result<Self, NotationError> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(NotationError::InvalidLength(s.chars().count()));
        };
        Self::from_file_rank(file, rank)
    }

    fn from_file_rank(file: char, rank: char) -> Result<Self, NotationError> {
        let col = match file {
            'a'..='h' => file as usize - 'a' as usize,
            _ => return Err(NotationError::InvalidFile(file)),
        };
        let row = match rank {
            '1'..='8' => BOARD_SIZE - (rank as usize - '0' as usize),
            _ => return Err(NotationError::InvalidRank(rank)),
        };
        Self::new(row, col).ok_or(NotationError::InvalidRank(rank))
    }

    pub fn to_algebraic(self) -> String {
        let file = char::from(b'a' + self.col() as u8);
        let rank = char::from(b'0' + (BOARD_SIZE - self.row()) as u8);
        format!("{file}{rank}")
    }
}

/// Parsed form of a coordinate move string such as `g1f3` or `a7a8q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateMove {
    pub from: BoardCoordinate,
    pub to: BoardCoordinate,
    pub promotion: bool,
}

impl CoordinateMove {
    pub fn parse(s: &str) -> Result<Self, NotationError> {
        let chars: Vec<char> = s.trim().chars().collect();
        let (from, to, suffix) = match chars.as_slice() {
            [f1, r1, f2, r2] => ((*f1, *r1), (*f2, *r2), None),
            [f1, r1, f2, r2, p] => ((*f1, *r1), (*f2, *r2), Some(*p)),
            _ => return Err(NotationError::InvalidLength(chars.len())),
        };

        // Promotions are always to a queen at this layer.
        let promotion = match suffix {
            None => false,
            Some('q' | 'Q') => true,
            Some(other) => return Err(NotationError::UnsupportedPromotion(other)),
        };

        Ok(Self {
            from: BoardCoordinate::from_file_rank(from.0, from.1)?,
            to: BoardCoordinate::from_file_rank(to.0, to.1)?,
            promotion,
        })
    }

    /// True when `mv` goes between the same squares. A bare four-character
    /// move still matches a promotion, since promotions are always to a queen.
    pub fn matches(&self, mv: &Move) -> bool {
        self.from == mv.from && self.to == mv.to && (!self.promotion || mv.is_promotion)
    }
}

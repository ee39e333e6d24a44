use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    /// Row delta of a single pawn push. White moves towards row 0.
    pub const fn pawn_direction(self) -> isize {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    pub const fn pawn_start_row(self) -> usize {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    pub const fn promotion_row(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    pub const fn back_row(self) -> usize {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// e1 for White, e8 for Black.
    pub const fn king_home(self) -> BoardCoordinate {
        BoardCoordinate {
            row: self.back_row(),
            col: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Self { piece_type, color }
    }

    pub fn is(self, piece_type: PieceType, color: Color) -> bool {
        self.piece_type == piece_type && self.color == color
    }
}

/// A square on the board. Row 0 is rank 8, col 0 is the a-file.
///
/// Always on the board: the only ways in are `new`, `offset`, `from_index`
/// and deserialization, which all reject out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct BoardCoordinate {
    row: usize,
    col: usize,
}

#[derive(Deserialize)]
struct RawCoordinate {
    row: usize,
    col: usize,
}

impl TryFrom<RawCoordinate> for BoardCoordinate {
    type Error = &'static str;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.row, raw.col).ok_or("coordinate off the board")
    }
}

impl BoardCoordinate {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    pub const fn row(self) -> usize {
        self.row
    }

    pub const fn col(self) -> usize {
        self.col
    }

    /// The square on this row in `other`'s column.
    #[must_use]
    pub const fn at_col_of(self, other: Self) -> Self {
        Self {
            row: self.row,
            col: other.col,
        }
    }

    /// Steps `(dr, dc)` away from this square, or `None` when that leaves the board.
    #[must_use]
    pub fn offset(self, dr: isize, dc: isize) -> Option<Self> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Self::new(row, col)
    }

    pub const fn index(self) -> usize {
        self.row * BOARD_SIZE + self.col
    }

    #[must_use]
    pub const fn from_index(sq: usize) -> Option<Self> {
        Self::new(sq / BOARD_SIZE, sq % BOARD_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    // Mailbox indexed by BoardCoordinate::index
    #[serde(with = "BigArray")]
    grid: [Option<Piece>; NUM_SQUARES],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_initial_position();
        board
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            grid: [None; NUM_SQUARES],
        }
    }

    fn setup_initial_position(&mut self) {
        // Black on top (rows 0-1), White on the bottom (rows 6-7)
        self.setup_pieces(Color::Black);
        self.setup_pieces(Color::White);
    }

    fn setup_pieces(&mut self, color: Color) {
        let pieces = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        let back_row = color.back_row();
        let pawn_row = color.pawn_start_row();
        for (col, &pt) in pieces.iter().enumerate() {
            self.grid[back_row * BOARD_SIZE + col] = Some(Piece::new(pt, color));
            self.grid[pawn_row * BOARD_SIZE + col] = Some(Piece::new(PieceType::Pawn, color));
        }
    }

    #[must_use]
    pub fn get_piece(&self, pos: BoardCoordinate) -> Option<Piece> {
        self.grid[pos.index()]
    }

    pub fn is_empty(&self, pos: BoardCoordinate) -> bool {
        self.get_piece(pos).is_none()
    }

    /// Replaces the contents of `pos`, returning what was there.
    pub fn set_piece(&mut self, pos: BoardCoordinate, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.grid[pos.index()], piece)
    }

    pub fn add_piece(&mut self, pos: BoardCoordinate, piece_type: PieceType, color: Color) {
        self.set_piece(pos, Some(Piece::new(piece_type, color)));
    }

    pub fn remove_piece(&mut self, pos: BoardCoordinate) -> Option<Piece> {
        self.set_piece(pos, None)
    }

    /// Occupied squares in row-major order (rank 8 first).
    pub fn pieces(&self) -> impl Iterator<Item = (BoardCoordinate, Piece)> + '_ {
        self.grid.iter().enumerate().filter_map(|(sq, slot)| {
            let piece = (*slot)?;
            BoardCoordinate::from_index(sq).map(|pos| (pos, piece))
        })
    }

    #[must_use]
    pub fn find_king(&self, color: Color) -> Option<BoardCoordinate> {
        self.pieces()
            .find(|(_, piece)| piece.is(PieceType::King, color))
            .map(|(pos, _)| pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: usize, col: usize) -> BoardCoordinate {
        BoardCoordinate::new(row, col).unwrap()
    }

    #[test]
    fn test_initial_setup() {
        let board = Board::new();
        let piece = board.get_piece(sq(7, 4)).unwrap();
        assert_eq!(piece, Piece::new(PieceType::King, Color::White));

        let piece = board.get_piece(sq(0, 3)).unwrap();
        assert_eq!(piece, Piece::new(PieceType::Queen, Color::Black));

        assert_eq!(board.pieces().count(), 32);
        assert!(board.is_empty(sq(4, 4)));
    }

    #[test]
    fn test_find_king() {
        let board = Board::new();
        assert_eq!(board.find_king(Color::White), Some(sq(7, 4)));
        assert_eq!(board.find_king(Color::Black), Some(sq(0, 4)));
        assert_eq!(Board::empty().find_king(Color::White), None);
    }

    #[test]
    fn test_offset_stays_on_board() {
        assert_eq!(sq(0, 0).offset(-1, 0), None);
        assert_eq!(sq(7, 7).offset(0, 1), None);
        assert_eq!(sq(3, 3).offset(2, -1), Some(sq(5, 2)));
        assert_eq!(BoardCoordinate::new(8, 0), None);
    }

    #[test]
    fn test_coordinates_outside_the_board_are_unrepresentable() {
        assert_eq!(BoardCoordinate::new(6, 12), None);
        assert_eq!(BoardCoordinate::from_index(NUM_SQUARES), None);

        let parsed: Result<BoardCoordinate, _> = serde_json::from_str(r#"{"row":8,"col":0}"#);
        assert!(parsed.is_err());
        let parsed: Result<BoardCoordinate, _> = serde_json::from_str(r#"{"row":6,"col":12}"#);
        assert!(parsed.is_err());

        let e1: BoardCoordinate = serde_json::from_str(r#"{"row":7,"col":4}"#).unwrap();
        assert_eq!(e1, Color::White.king_home());
        assert_eq!(serde_json::to_string(&e1).unwrap(), r#"{"row":7,"col":4}"#);
    }

    #[test]
    fn test_king_home_squares() {
        let board = Board::new();
        for color in [Color::White, Color::Black] {
            assert_eq!(board.find_king(color), Some(color.king_home()));
        }
    }

    #[test]
    fn test_set_piece_returns_previous() {
        let mut board = Board::new();
        let previous = board.set_piece(sq(6, 4), None);
        assert_eq!(previous, Some(Piece::new(PieceType::Pawn, Color::White)));
        assert!(board.is_empty(sq(6, 4)));
    }
}

use crate::logic::board::{Board, BoardCoordinate, Color, Piece, PieceType};
use crate::logic::generator::MoveGenerator;
use crate::logic::moves::Move;
use crate::logic::rules::{Check, MoveError, Pin};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Checkmate(Color), // Winner
    Stalemate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}

impl CastlingRights {
    pub const fn all() -> Self {
        Self {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub const fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    pub const fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    // Rights are only ever revoked.
    pub fn revoke_kingside(&mut self, color: Color) {
        match color {
            Color::White => self.white_kingside = false,
            Color::Black => self.black_kingside = false,
        }
    }

    pub fn revoke_queenside(&mut self, color: Color) {
        match color {
            Color::White => self.white_queenside = false,
            Color::Black => self.black_queenside = false,
        }
    }

    pub fn revoke_all(&mut self, color: Color) {
        self.revoke_kingside(color);
        self.revoke_queenside(color);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub turn: Color,
    /// Cached king squares, indexed by `Color::index`.
    pub king_locations: [BoardCoordinate; 2],
    pub castling_rights: CastlingRights,
    pub castling_rights_log: Vec<CastlingRights>,
    /// Square a pawn may capture into this ply, if any.
    pub en_passant: Option<BoardCoordinate>,
    pub en_passant_log: Vec<Option<BoardCoordinate>>,
    pub move_log: Vec<Move>,

    // Refreshed by generate_legal_moves, stale after any apply/undo.
    pub in_check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    #[serde(skip)]
    pub pins: Vec<Pin>,
    #[serde(skip)]
    pub checks: Vec<Check>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        Self::with_kings(
            Board::new(),
            [Color::White.king_home(), Color::Black.king_home()],
            Color::White,
            CastlingRights::all(),
            None,
        )
    }

    /// Builds a position from an arbitrary board. `None` when a king is missing.
    #[must_use]
    pub fn from_board(board: Board, turn: Color, castling_rights: CastlingRights) -> Option<Self> {
        Self::from_parts(board, turn, castling_rights, None)
    }

    pub(crate) fn from_parts(
        board: Board,
        turn: Color,
        castling_rights: CastlingRights,
        en_passant: Option<BoardCoordinate>,
    ) -> Option<Self> {
        let white_king = board.find_king(Color::White)?;
        let black_king = board.find_king(Color::Black)?;
        Some(Self::with_kings(
            board,
            [white_king, black_king],
            turn,
            castling_rights,
            en_passant,
        ))
    }

    fn with_kings(
        board: Board,
        king_locations: [BoardCoordinate; 2],
        turn: Color,
        castling_rights: CastlingRights,
        en_passant: Option<BoardCoordinate>,
    ) -> Self {
        Self {
            board,
            turn,
            king_locations,
            castling_rights,
            castling_rights_log: vec![castling_rights],
            en_passant,
            en_passant_log: vec![en_passant],
            move_log: Vec::new(),
            in_check: false,
            checkmate: false,
            stalemate: false,
            pins: Vec::new(),
            checks: Vec::new(),
        }
    }

    pub const fn king_location(&self, color: Color) -> BoardCoordinate {
        self.king_locations[color.index()]
    }

    pub fn status(&self) -> GameStatus {
        if self.checkmate {
            GameStatus::Checkmate(self.turn.opposite())
        } else if self.stalemate {
            GameStatus::Stalemate
        } else {
            GameStatus::Playing
        }
    }

    /// Legal moves for the side to move. Also refreshes `in_check`,
    /// `checkmate`, `stalemate`, `pins` and `checks`.
    pub fn generate_legal_moves(&mut self) -> Vec<Move> {
        MoveGenerator::new().generate_legal_moves(self)
    }

    /// Applies a move that the caller has already taken from the legal list.
    pub fn apply_move(&mut self, mv: Move) {
        let color = mv.piece_moved.color;

        self.board.remove_piece(mv.from);
        let placed = if mv.is_promotion {
            // Always promote to a queen.
            Piece::new(PieceType::Queen, color)
        } else {
            mv.piece_moved
        };
        self.board.set_piece(mv.to, Some(placed));

        if mv.is_en_passant {
            self.board.remove_piece(mv.en_passant_victim());
        }

        if mv.is_castle {
            if let Some((rook_from, rook_to)) = castle_rook_squares(&mv) {
                let rook = self.board.remove_piece(rook_from);
                self.board.set_piece(rook_to, rook);
            }
        }

        if mv.piece_moved.piece_type == PieceType::King {
            self.king_locations[color.index()] = mv.to;
        }

        self.en_passant = if mv.piece_moved.piece_type == PieceType::Pawn
            && mv.from.row().abs_diff(mv.to.row()) == 2
        {
            BoardCoordinate::new((mv.from.row() + mv.to.row()) / 2, mv.from.col())
        } else {
            None
        };
        self.en_passant_log.push(self.en_passant);

        self.update_castling_rights(&mv);
        self.castling_rights_log.push(self.castling_rights);

        self.move_log.push(mv);
        self.turn = self.turn.opposite();

        self.debug_assert_king_cache();
    }

    /// Takes back the most recent move. Returns `None` when there is nothing to undo.
    pub fn undo_move(&mut self) -> Option<Move> {
        let mv = self.move_log.pop()?;
        let color = mv.piece_moved.color;

        self.board.set_piece(mv.from, Some(mv.piece_moved));
        if mv.is_en_passant {
            // The captured pawn goes back beside the origin, not onto `to`.
            self.board.remove_piece(mv.to);
            self.board.set_piece(mv.en_passant_victim(), mv.piece_captured);
        } else {
            self.board.set_piece(mv.to, mv.piece_captured);
        }

        if mv.piece_moved.piece_type == PieceType::King {
            self.king_locations[color.index()] = mv.from;
        }

        self.turn = self.turn.opposite();

        self.en_passant_log.pop();
        self.en_passant = self.en_passant_log.last().copied().flatten();

        self.castling_rights_log.pop();
        if let Some(&rights) = self.castling_rights_log.last() {
            self.castling_rights = rights;
        }

        if mv.is_castle {
            if let Some((rook_from, rook_to)) = castle_rook_squares(&mv) {
                let rook = self.board.remove_piece(rook_to);
                self.board.set_piece(rook_from, rook);
            }
        }

        self.checkmate = false;
        self.stalemate = false;

        self.debug_assert_king_cache();
        Some(mv)
    }

    /// Applies `mv` and returns a guard that undoes it when dropped.
    pub fn scoped_move(&mut self, mv: Move) -> MoveGuard<'_> {
        self.apply_move(mv);
        MoveGuard { state: self }
    }

    /// Validated entry point for the presentation layer: plays the legal move
    /// from `from` to `to`, then refreshes the status flags for the next side.
    pub fn make_move(
        &mut self,
        from: BoardCoordinate,
        to: BoardCoordinate,
    ) -> Result<Move, MoveError> {
        let piece = self.board.get_piece(from).ok_or(MoveError::NoPieceAtSource)?;
        if piece.color != self.turn {
            return Err(MoveError::NotYourTurn);
        }

        let legal_moves = self.generate_legal_moves();
        if legal_moves.is_empty() {
            return Err(MoveError::GameOver);
        }

        let mv = legal_moves
            .into_iter()
            .find(|m| m.from == from && m.to == to)
            .ok_or(MoveError::IllegalMove)?;

        self.apply_move(mv);
        self.generate_legal_moves();
        Ok(mv)
    }

    /// Whether the side *not* to move attacks `square`.
    ///
    /// Flips the side to move, looks at that side's pseudo-legal moves, and
    /// flips back.
    pub fn square_attacked(&mut self, square: BoardCoordinate) -> bool {
        self.with_turn_flipped(|state| {
            let generator = MoveGenerator::new();
            generator.pawn_attacks(state, square, state.turn)
                || generator
                    .generate_attack_moves(state)
                    .iter()
                    .any(|mv| mv.to == square)
        })
    }

    // The two flips always pair up, whatever `f` returns.
    fn with_turn_flipped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.turn = self.turn.opposite();
        let result = f(self);
        self.turn = self.turn.opposite();
        result
    }

    /// Move log in coordinate form, e.g. `["e2e4", "e7e5"]`.
    pub fn coordinate_history(&self) -> Vec<String> {
        self.move_log
            .iter()
            .map(Move::to_coordinate_notation)
            .collect()
    }

    fn update_castling_rights(&mut self, mv: &Move) {
        let color = mv.piece_moved.color;
        match mv.piece_moved.piece_type {
            PieceType::King => self.castling_rights.revoke_all(color),
            PieceType::Rook if mv.from.row() == color.back_row() => match mv.from.col() {
                0 => self.castling_rights.revoke_queenside(color),
                7 => self.castling_rights.revoke_kingside(color),
                _ => {}
            },
            _ => {}
        }

        // A rook captured on its home corner takes the opponent's right with it.
        if let Some(captured) = mv.piece_captured {
            if captured.piece_type == PieceType::Rook && mv.to.row() == captured.color.back_row() {
                match mv.to.col() {
                    0 => self.castling_rights.revoke_queenside(captured.color),
                    7 => self.castling_rights.revoke_kingside(captured.color),
                    _ => {}
                }
            }
        }
    }

    fn debug_assert_king_cache(&self) {
        debug_assert!(
            self.board
                .get_piece(self.king_location(Color::White))
                .is_some_and(|p| p.is(PieceType::King, Color::White)),
            "white king cache out of sync"
        );
        debug_assert!(
            self.board
                .get_piece(self.king_location(Color::Black))
                .is_some_and(|p| p.is(PieceType::King, Color::Black)),
            "black king cache out of sync"
        );
    }
}

/// Rook origin and destination for a castling king move.
fn castle_rook_squares(mv: &Move) -> Option<(BoardCoordinate, BoardCoordinate)> {
    let row = mv.to.row();
    if mv.to.col() > mv.from.col() {
        Some((
            BoardCoordinate::new(row, mv.to.col() + 1)?,
            BoardCoordinate::new(row, mv.to.col() - 1)?,
        ))
    } else {
        Some((
            BoardCoordinate::new(row, mv.to.col().checked_sub(2)?)?,
            BoardCoordinate::new(row, mv.to.col() + 1)?,
        ))
    }
}

/// A move applied for the lifetime of the guard. Dropping the guard undoes it,
/// so a search unwinds on every exit path, `break` included.
pub struct MoveGuard<'a> {
    state: &'a mut GameState,
}

impl Deref for MoveGuard<'_> {
    type Target = GameState;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.state.undo_move();
    }
}

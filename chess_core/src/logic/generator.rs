use crate::logic::board::{BoardCoordinate, Color, Piece, PieceType, BOARD_SIZE};
use crate::logic::game::GameState;
use crate::logic::moves::Move;
use crate::logic::rules::{
    detect_pins_and_checks, is_in_check, Check, Direction, PinTable, PinsAndChecks,
    DIAGONAL_DIRECTIONS, KING_DIRECTIONS, KNIGHT_OFFSETS, ORTHOGONAL_DIRECTIONS,
};

#[derive(Clone, Copy)]
enum CastleSide {
    King,
    Queen,
}

pub struct MoveGenerator;

impl Default for MoveGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveGenerator {
    pub const fn new() -> Self {
        Self
    }

    /// Every legal move for `state.turn`, castling included.
    ///
    /// Side effect: `in_check`, `pins`, `checks`, `checkmate` and `stalemate`
    /// are refreshed on `state`.
    pub fn generate_legal_moves(&self, state: &mut GameState) -> Vec<Move> {
        let color = state.turn;
        let king = state.king_location(color);
        let PinsAndChecks {
            in_check,
            pins,
            checks,
        } = detect_pins_and_checks(&state.board, king, color);
        let pin_table = PinTable::from_pins(&pins);

        let mut moves = match checks.as_slice() {
            [] => self.generate_pseudo_legal_moves(state, &pin_table),
            [check] => {
                let mut moves = self.generate_pseudo_legal_moves(state, &pin_table);
                let block_squares = Self::check_block_squares(king, check);
                moves.retain(|mv| {
                    mv.piece_moved.piece_type == PieceType::King
                        || block_squares.contains(&mv.to)
                        // En passant can take a checking pawn without landing on it.
                        || (mv.is_en_passant && mv.en_passant_victim() == check.square)
                });
                moves
            }
            // Double check: only the king can move.
            _ => {
                let mut moves = Vec::with_capacity(8);
                self.generate_king_moves(state, king, &mut moves);
                moves
            }
        };

        if !in_check {
            self.generate_castle_moves(state, king, &mut moves);
        }

        state.in_check = in_check;
        state.pins = pins;
        state.checks = checks;
        state.checkmate = in_check && moves.is_empty();
        state.stalemate = !in_check && moves.is_empty();

        moves
    }

    /// Moves that respect the geometry of each piece and the given pins, but
    /// ignore whether the mover's king is left in check by a non-pinned piece.
    /// Castling is not included.
    pub fn generate_pseudo_legal_moves(&self, state: &GameState, pins: &PinTable) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        let turn = state.turn;

        for (from, piece) in state.board.pieces() {
            if piece.color != turn {
                continue;
            }
            match piece.piece_type {
                PieceType::Pawn => self.generate_pawn_moves(state, from, piece, pins, &mut moves),
                PieceType::Knight => self.generate_knight_moves(state, from, piece, pins, &mut moves),
                PieceType::Bishop => {
                    self.generate_sliding_moves(state, from, piece, &DIAGONAL_DIRECTIONS, pins, &mut moves);
                }
                PieceType::Rook => {
                    self.generate_sliding_moves(state, from, piece, &ORTHOGONAL_DIRECTIONS, pins, &mut moves);
                }
                PieceType::Queen => {
                    self.generate_sliding_moves(state, from, piece, &KING_DIRECTIONS, pins, &mut moves);
                }
                PieceType::King => self.generate_king_moves(state, from, &mut moves),
            }
        }

        moves
    }

    /// Non-pawn pseudo-legal moves of `state.turn` with no pins applied.
    /// Pawn pushes never attack anything, so pawns are covered by `pawn_attacks`.
    pub(crate) fn generate_attack_moves(&self, state: &GameState) -> Vec<Move> {
        let mut moves = self.generate_pseudo_legal_moves(state, &PinTable::default());
        moves.retain(|mv| mv.piece_moved.piece_type != PieceType::Pawn);
        moves
    }

    /// Whether a pawn of `attacker` covers `square` diagonally, occupied or not.
    pub(crate) fn pawn_attacks(&self, state: &GameState, square: BoardCoordinate, attacker: Color) -> bool {
        [-1, 1].into_iter().any(|dc| {
            square
                .offset(-attacker.pawn_direction(), dc)
                .and_then(|pos| state.board.get_piece(pos))
                .is_some_and(|p| p.is(PieceType::Pawn, attacker))
        })
    }

    /// Squares a non-king move may land on to answer a single check: the
    /// checker itself plus, for sliders, everything between it and the king.
    fn check_block_squares(king: BoardCoordinate, check: &Check) -> Vec<BoardCoordinate> {
        let checker = check.square;
        let is_ray = check.direction.0.abs() <= 1 && check.direction.1.abs() <= 1;
        if !is_ray {
            return vec![checker];
        }

        let mut squares = Vec::with_capacity(BOARD_SIZE);
        let mut pos = king;
        while let Some(next) = pos.offset(check.direction.0, check.direction.1) {
            pos = next;
            squares.push(pos);
            if pos == checker {
                break;
            }
        }
        squares
    }

    fn generate_pawn_moves(
        &self,
        state: &GameState,
        from: BoardCoordinate,
        pawn: Piece,
        pins: &PinTable,
        moves: &mut Vec<Move>,
    ) {
        let board = &state.board;
        let color = pawn.color;
        let dir = color.pawn_direction();
        let promotion_row = color.promotion_row();

        if pins.allows(from, (dir, 0)) {
            if let Some(one) = from.offset(dir, 0).filter(|&pos| board.is_empty(pos)) {
                moves.push(Move::with_piece(from, one, pawn, board).promotion(one.row() == promotion_row));

                if from.row() == color.pawn_start_row() {
                    if let Some(two) = one.offset(dir, 0).filter(|&pos| board.is_empty(pos)) {
                        moves.push(Move::with_piece(from, two, pawn, board));
                    }
                }
            }
        }

        for dc in [-1, 1] {
            let Some(to) = from.offset(dir, dc) else {
                continue;
            };
            if !pins.allows(from, (dir, dc)) {
                continue;
            }
            match board.get_piece(to) {
                Some(target) if target.color != color => {
                    moves.push(Move::with_piece(from, to, pawn, board).promotion(to.row() == promotion_row));
                }
                None if state.en_passant == Some(to) => {
                    if !self.en_passant_exposes_king(state, from, to) {
                        moves.push(Move::with_piece(from, to, pawn, board).en_passant());
                    }
                }
                _ => {}
            }
        }
    }

    /// En passant clears two squares of the same rank at once, which the pin
    /// scan cannot see. Looks for a rook or queen on the king's rank that would
    /// be uncovered.
    fn en_passant_exposes_king(&self, state: &GameState, from: BoardCoordinate, to: BoardCoordinate) -> bool {
        let color = state.turn;
        let king = state.king_location(color);
        if king.row() != from.row() {
            return false;
        }
        let victim = from.at_col_of(to);

        [-1, 1].into_iter().any(|dc| {
            let mut pos = king;
            while let Some(next) = pos.offset(0, dc) {
                pos = next;
                if pos == from || pos == victim {
                    continue;
                }
                if let Some(piece) = state.board.get_piece(pos) {
                    return piece.color != color
                        && matches!(piece.piece_type, PieceType::Rook | PieceType::Queen);
                }
            }
            false
        })
    }

    fn generate_knight_moves(
        &self,
        state: &GameState,
        from: BoardCoordinate,
        knight: Piece,
        pins: &PinTable,
        moves: &mut Vec<Move>,
    ) {
        // A pinned knight can never stay on the pin line.
        if pins.pin_direction(from).is_some() {
            return;
        }
        for &(dr, dc) in &KNIGHT_OFFSETS {
            let Some(to) = from.offset(dr, dc) else {
                continue;
            };
            if state.board.get_piece(to).is_some_and(|p| p.color == knight.color) {
                continue;
            }
            moves.push(Move::with_piece(from, to, knight, &state.board));
        }
    }

    fn generate_sliding_moves(
        &self,
        state: &GameState,
        from: BoardCoordinate,
        piece: Piece,
        directions: &[Direction],
        pins: &PinTable,
        moves: &mut Vec<Move>,
    ) {
        let board = &state.board;
        for &dir in directions {
            if !pins.allows(from, dir) {
                continue;
            }
            let mut pos = from;
            while let Some(to) = pos.offset(dir.0, dir.1) {
                pos = to;
                match board.get_piece(to) {
                    None => moves.push(Move::with_piece(from, to, piece, board)),
                    Some(target) => {
                        if target.color != piece.color {
                            moves.push(Move::with_piece(from, to, piece, board));
                        }
                        break;
                    }
                }
            }
        }
    }

    /// King steps, each checked by running check detection from the
    /// destination square.
    fn generate_king_moves(&self, state: &GameState, from: BoardCoordinate, moves: &mut Vec<Move>) {
        let board = &state.board;
        let Some(king) = board.get_piece(from) else {
            return;
        };
        for &(dr, dc) in &KING_DIRECTIONS {
            let Some(to) = from.offset(dr, dc) else {
                continue;
            };
            if board.get_piece(to).is_some_and(|p| p.color == king.color) {
                continue;
            }
            if !is_in_check(board, to, king.color) {
                moves.push(Move::with_piece(from, to, king, board));
            }
        }
    }

    fn generate_castle_moves(&self, state: &mut GameState, king: BoardCoordinate, moves: &mut Vec<Move>) {
        let color = state.turn;
        if state.castling_rights.kingside(color) {
            self.try_castle(state, king, CastleSide::King, moves);
        }
        if state.castling_rights.queenside(color) {
            self.try_castle(state, king, CastleSide::Queen, moves);
        }
    }

    fn try_castle(&self, state: &mut GameState, king: BoardCoordinate, side: CastleSide, moves: &mut Vec<Move>) {
        let color = state.turn;
        // Squares that must be empty, then which of those the king crosses.
        let (dc, empty_span): (isize, isize) = match side {
            CastleSide::King => (1, 2),
            CastleSide::Queen => (-1, 3),
        };

        let Some(king_piece) = state.board.get_piece(king) else {
            return;
        };
        let rook_col = match side {
            CastleSide::King => BOARD_SIZE - 1,
            CastleSide::Queen => 0,
        };
        let Some(rook_home) = BoardCoordinate::new(king.row(), rook_col) else {
            return;
        };
        if !state.board.get_piece(rook_home).is_some_and(|p| p.is(PieceType::Rook, color)) {
            return;
        }

        for step in 1..=empty_span {
            match king.offset(0, dc * step) {
                Some(pos) if state.board.is_empty(pos) => {}
                _ => return,
            }
        }

        for step in 1..=2 {
            let Some(pos) = king.offset(0, dc * step) else {
                return;
            };
            if is_in_check(&state.board, pos, color) || state.square_attacked(pos) {
                return;
            }
        }

        if let Some(to) = king.offset(0, 2 * dc) {
            moves.push(Move::with_piece(king, to, king_piece, &state.board).castle());
        }
    }
}

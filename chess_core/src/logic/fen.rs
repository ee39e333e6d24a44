use crate::logic::board::{Board, BoardCoordinate, Color, PieceType, BOARD_SIZE};
use crate::logic::game::{CastlingRights, GameState};
use crate::logic::moves::NotationError;
use thiserror::Error;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("expected 8 ranks, got {0}")]
    WrongRankCount(usize),
    #[error("rank {rank} describes {files} files")]
    BadRankLength { rank: usize, files: usize },
    #[error("invalid piece '{0}'")]
    InvalidPiece(char),
    #[error("invalid side to move '{0}'")]
    InvalidSide(String),
    #[error("invalid castling flag '{0}'")]
    InvalidCastling(char),
    #[error("invalid en passant square: {0}")]
    InvalidEnPassant(#[from] NotationError),
    #[error("no {0:?} king on the board")]
    MissingKing(Color),
}

fn piece_from_char(c: char) -> Option<(PieceType, Color)> {
    let color = if c.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    let piece_type = match c.to_ascii_lowercase() {
        'p' => PieceType::Pawn,
        'n' => PieceType::Knight,
        'b' => PieceType::Bishop,
        'r' => PieceType::Rook,
        'q' => PieceType::Queen,
        'k' => PieceType::King,
        _ => return None,
    };
    Some((piece_type, color))
}

fn parse_placement(field: &str) -> Result<Board, FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != BOARD_SIZE {
        return Err(FenError::WrongRankCount(ranks.len()));
    }

    let mut board = Board::empty();
    // FEN lists rank 8 first, which is row 0.
    for (row, rank) in ranks.iter().enumerate() {
        let mut col = 0;
        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                col += skip as usize;
                continue;
            }
            let (piece_type, color) = piece_from_char(c).ok_or(FenError::InvalidPiece(c))?;
            let pos = BoardCoordinate::new(row, col).ok_or(FenError::BadRankLength {
                rank: BOARD_SIZE - row,
                files: col + 1,
            })?;
            board.add_piece(pos, piece_type, color);
            col += 1;
        }
        if col != BOARD_SIZE {
            return Err(FenError::BadRankLength {
                rank: BOARD_SIZE - row,
                files: col,
            });
        }
    }
    Ok(board)
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    let mut rights = CastlingRights::none();
    if field == "-" {
        return Ok(rights);
    }
    for c in field.chars() {
        match c {
            'K' => rights.white_kingside = true,
            'Q' => rights.white_queenside = true,
            'k' => rights.black_kingside = true,
            'q' => rights.black_queenside = true,
            _ => return Err(FenError::InvalidCastling(c)),
        }
    }
    Ok(rights)
}

/// Drops any right whose king or rook is not on its home square.
fn sanitize_castling(board: &Board, mut rights: CastlingRights) -> CastlingRights {
    for color in [Color::White, Color::Black] {
        let row = color.back_row();
        let at_home = |col: usize, piece_type: PieceType| {
            BoardCoordinate::new(row, col)
                .and_then(|pos| board.get_piece(pos))
                .is_some_and(|p| p.is(piece_type, color))
        };
        if !at_home(4, PieceType::King) {
            rights.revoke_all(color);
            continue;
        }
        if !at_home(BOARD_SIZE - 1, PieceType::Rook) {
            rights.revoke_kingside(color);
        }
        if !at_home(0, PieceType::Rook) {
            rights.revoke_queenside(color);
        }
    }
    rights
}

impl GameState {
    /// Sets up a position from Forsyth-Edwards notation. The halfmove and
    /// fullmove clocks are accepted but ignored.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut fields = fen.split_whitespace();

        let board = parse_placement(fields.next().ok_or(FenError::MissingField("placement"))?)?;

        let turn = match fields.next().ok_or(FenError::MissingField("side to move"))? {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSide(other.to_string())),
        };

        let castling = match fields.next() {
            Some(field) => sanitize_castling(&board, parse_castling(field)?),
            None => CastlingRights::none(),
        };

        let en_passant = match fields.next() {
            None | Some("-") => None,
            Some(square) => Some(BoardCoordinate::from_algebraic(square)?),
        };

        if board.find_king(Color::White).is_none() {
            return Err(FenError::MissingKing(Color::White));
        }
        Self::from_parts(board, turn, castling, en_passant).ok_or(FenError::MissingKing(Color::Black))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::Piece;

    fn sq(s: &str) -> BoardCoordinate {
        BoardCoordinate::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_starting_fen_matches_new_game() {
        let game = GameState::from_fen(STARTING_FEN).unwrap();
        let fresh = GameState::new();
        assert_eq!(game.board, fresh.board);
        assert_eq!(game.turn, Color::White);
        assert_eq!(game.castling_rights, CastlingRights::all());
        assert_eq!(game.en_passant, None);
        assert_eq!(game.king_location(Color::Black), sq("e8"));
    }

    #[test]
    fn test_side_and_en_passant() {
        let game =
            GameState::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
                .unwrap();
        assert_eq!(game.en_passant, Some(sq("d6")));
        assert_eq!(
            game.board.get_piece(sq("e5")),
            Some(Piece::new(PieceType::Pawn, Color::White))
        );
    }

    #[test]
    fn test_castling_rights_need_pieces_at_home() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/8/4K2R w KQkq - 0 1").unwrap();
        assert!(game.castling_rights.white_kingside);
        assert!(!game.castling_rights.white_queenside);
        assert!(!game.castling_rights.black_kingside);
        assert!(!game.castling_rights.black_queenside);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            GameState::from_fen("8/8/8/8/8/8/8 w - -").unwrap_err(),
            FenError::WrongRankCount(7)
        );
        assert_eq!(
            GameState::from_fen("4k3/8/8/8/8/8/8/4K3 x - -").unwrap_err(),
            FenError::InvalidSide("x".to_string())
        );
        assert_eq!(
            GameState::from_fen("4k3/8/8/8/8/8/8/4X3 w - -").unwrap_err(),
            FenError::InvalidPiece('X')
        );
        assert_eq!(
            GameState::from_fen("4k3/8/8/8/8/8/8/8 w - -").unwrap_err(),
            FenError::MissingKing(Color::White)
        );
        assert_eq!(
            GameState::from_fen("4k4/8/8/8/8/8/8/4K3 w - -").unwrap_err(),
            FenError::BadRankLength { rank: 8, files: 9 }
        );
        assert_eq!(
            GameState::from_fen("4k3/8/8/8/8/8/8/4K3 w - e9").unwrap_err(),
            FenError::InvalidEnPassant(NotationError::InvalidRank('9'))
        );
        assert!(GameState::from_fen("").is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = GameState::from_fen("4k3/8/8/8/8/8/8/4K3 w - i3").unwrap_err();
        assert_eq!(err.to_string(), "invalid en passant square: invalid file 'i'");
        assert_eq!(
            FenError::BadRankLength { rank: 8, files: 9 }.to_string(),
            "rank 8 describes 9 files"
        );
    }
}

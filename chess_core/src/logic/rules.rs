use crate::logic::board::{Board, BoardCoordinate, Color, PieceType, BOARD_SIZE, NUM_SQUARES};
use thiserror::Error;

pub type Direction = (isize, isize);

/// Up, left, down, right.
pub const ORTHOGONAL_DIRECTIONS: [Direction; 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];
/// NE, NW, SW, SE.
pub const DIAGONAL_DIRECTIONS: [Direction; 4] = [(-1, 1), (-1, -1), (1, -1), (1, 1)];
/// Orthogonal rays first, then diagonal rays.
pub const KING_DIRECTIONS: [Direction; 8] = [
    (-1, 0),
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 1),
    (-1, -1),
    (1, -1),
    (1, 1),
];
pub const KNIGHT_OFFSETS: [Direction; 8] = [
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
];

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on the origin square")]
    NoPieceAtSource,
    #[error("piece does not belong to the side to move")]
    NotYourTurn,
    #[error("move is not legal in this position")]
    IllegalMove,
    #[error("game is already over")]
    GameOver,
}

/// A friendly piece standing between its king and an enemy slider.
/// `direction` points from the king towards the pinned piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    pub square: BoardCoordinate,
    pub direction: Direction,
}

/// An enemy piece giving check. `direction` is the ray (or knight offset)
/// from the king to the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Check {
    pub square: BoardCoordinate,
    pub direction: Direction,
}

/// Read-only pin lookup keyed by square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinTable {
    directions: [Option<Direction>; NUM_SQUARES],
}

impl Default for PinTable {
    fn default() -> Self {
        Self {
            directions: [None; NUM_SQUARES],
        }
    }
}

impl PinTable {
    pub fn from_pins(pins: &[Pin]) -> Self {
        let mut table = Self::default();
        for pin in pins {
            table.directions[pin.square.index()] = Some(pin.direction);
        }
        table
    }

    pub fn pin_direction(&self, pos: BoardCoordinate) -> Option<Direction> {
        self.directions[pos.index()]
    }

    /// Whether a piece on `pos` may travel along `dir`. Unpinned pieces may
    /// go anywhere; pinned ones only along the pin axis, either way.
    pub fn allows(&self, pos: BoardCoordinate, dir: Direction) -> bool {
        match self.pin_direction(pos) {
            None => true,
            Some(pin) => pin == dir || pin == (-dir.0, -dir.1),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinsAndChecks {
    pub in_check: bool,
    pub pins: Vec<Pin>,
    pub checks: Vec<Check>,
}

/// Walks the eight rays and the knight offsets out from `king` and reports
/// every check on and every pin against `color`.
///
/// `king` does not have to be where the king actually stands: the king
/// generator passes candidate squares. The friendly king is ignored while
/// walking, so a king stepping along a checking ray still sees the checker.
pub fn detect_pins_and_checks(board: &Board, king: BoardCoordinate, color: Color) -> PinsAndChecks {
    let enemy = color.opposite();
    let mut result = PinsAndChecks::default();

    for (j, &(dr, dc)) in KING_DIRECTIONS.iter().enumerate() {
        let orthogonal = j < 4;
        let mut possible_pin: Option<Pin> = None;
        let mut pos = king;

        for distance in 1..BOARD_SIZE {
            let Some(next) = pos.offset(dr, dc) else {
                break;
            };
            pos = next;

            let Some(piece) = board.get_piece(pos) else {
                continue;
            };

            if piece.color == color {
                if piece.piece_type == PieceType::King {
                    continue;
                }
                if possible_pin.is_some() {
                    // Two friendly pieces in a row: nothing on this ray.
                    break;
                }
                possible_pin = Some(Pin {
                    square: pos,
                    direction: (dr, dc),
                });
                continue;
            }

            let attacks_king = match piece.piece_type {
                PieceType::Rook => orthogonal,
                PieceType::Bishop => !orthogonal,
                PieceType::Queen => true,
                PieceType::King => distance == 1,
                // A pawn attacks the king from the square diagonally in front of itself.
                PieceType::Pawn => distance == 1 && !orthogonal && dr == -enemy.pawn_direction(),
                PieceType::Knight => false,
            };

            if attacks_king {
                match possible_pin {
                    None => {
                        result.in_check = true;
                        result.checks.push(Check {
                            square: pos,
                            direction: (dr, dc),
                        });
                    }
                    Some(pin) => result.pins.push(pin),
                }
            }
            break;
        }
    }

    for &(dr, dc) in &KNIGHT_OFFSETS {
        let Some(pos) = king.offset(dr, dc) else {
            continue;
        };
        if board
            .get_piece(pos)
            .is_some_and(|p| p.is(PieceType::Knight, enemy))
        {
            result.in_check = true;
            result.checks.push(Check {
                square: pos,
                direction: (dr, dc),
            });
        }
    }

    result
}

/// Checks if a king of `color` standing on `king` would be attacked.
pub fn is_in_check(board: &Board, king: BoardCoordinate, color: Color) -> bool {
    detect_pins_and_checks(board, king, color).in_check
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> BoardCoordinate {
        BoardCoordinate::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_initial_position_is_quiet() {
        let board = Board::new();
        let result = detect_pins_and_checks(&board, sq("e1"), Color::White);
        assert!(!result.in_check);
        assert!(result.pins.is_empty());
        assert!(result.checks.is_empty());
    }

    #[test]
    fn test_rook_pin_and_bishop_check() {
        let mut board = Board::empty();
        board.add_piece(sq("e1"), PieceType::King, Color::White);
        board.add_piece(sq("e3"), PieceType::Knight, Color::White);
        board.add_piece(sq("e8"), PieceType::Rook, Color::Black);
        board.add_piece(sq("a5"), PieceType::Bishop, Color::Black);

        let result = detect_pins_and_checks(&board, sq("e1"), Color::White);
        assert!(result.in_check);
        assert_eq!(
            result.pins,
            vec![Pin {
                square: sq("e3"),
                direction: (-1, 0)
            }]
        );
        assert_eq!(
            result.checks,
            vec![Check {
                square: sq("a5"),
                direction: (-1, -1)
            }]
        );
    }

    #[test]
    fn test_two_friendly_pieces_block_the_ray() {
        let mut board = Board::empty();
        board.add_piece(sq("e1"), PieceType::King, Color::White);
        board.add_piece(sq("e2"), PieceType::Pawn, Color::White);
        board.add_piece(sq("e3"), PieceType::Bishop, Color::White);
        board.add_piece(sq("e8"), PieceType::Queen, Color::Black);

        let result = detect_pins_and_checks(&board, sq("e1"), Color::White);
        assert!(!result.in_check);
        assert!(result.pins.is_empty());
    }

    #[test]
    fn test_pawn_checks_only_from_its_attack_side() {
        let mut board = Board::empty();
        board.add_piece(sq("e4"), PieceType::King, Color::White);
        // Black pawn on d5 attacks e4.
        board.add_piece(sq("d5"), PieceType::Pawn, Color::Black);
        assert!(is_in_check(&board, sq("e4"), Color::White));

        // A black pawn behind the king does not.
        board.remove_piece(sq("d5"));
        board.add_piece(sq("d3"), PieceType::Pawn, Color::Black);
        assert!(!is_in_check(&board, sq("e4"), Color::White));

        // Nor does a pawn straight ahead.
        board.remove_piece(sq("d3"));
        board.add_piece(sq("e5"), PieceType::Pawn, Color::Black);
        assert!(!is_in_check(&board, sq("e4"), Color::White));
    }

    #[test]
    fn test_knight_check_and_double_check() {
        let mut board = Board::empty();
        board.add_piece(sq("e8"), PieceType::King, Color::Black);
        board.add_piece(sq("d6"), PieceType::Knight, Color::White);
        board.add_piece(sq("e1"), PieceType::Rook, Color::White);

        let result = detect_pins_and_checks(&board, sq("e8"), Color::Black);
        assert!(result.in_check);
        assert_eq!(result.checks.len(), 2);
    }

    #[test]
    fn test_relocated_king_sees_through_itself() {
        let mut board = Board::empty();
        board.add_piece(sq("e1"), PieceType::King, Color::White);
        board.add_piece(sq("a1"), PieceType::Rook, Color::Black);

        // Stepping to f1 stays on the rook's rank even though e1 is occupied.
        assert!(is_in_check(&board, sq("f1"), Color::White));
        assert!(!is_in_check(&board, sq("f2"), Color::White));
    }

    #[test]
    fn test_pin_table_allows_pin_axis_both_ways() {
        let pins = [Pin {
            square: sq("e3"),
            direction: (-1, 0),
        }];
        let table = PinTable::from_pins(&pins);
        assert!(table.allows(sq("e3"), (-1, 0)));
        assert!(table.allows(sq("e3"), (1, 0)));
        assert!(!table.allows(sq("e3"), (0, 1)));
        assert!(table.allows(sq("d3"), (0, 1)));
    }
}

use crate::engine::config::EngineConfig;
use crate::engine::Evaluator;
use crate::logic::board::{Color, PieceType};
use crate::logic::game::GameState;
use std::sync::Arc;

/// Material count with terminal overrides. Reads the cached `checkmate` and
/// `stalemate` flags, so the legal moves of `state` must have been generated.
pub struct MaterialEvaluator {
    config: Arc<EngineConfig>,
}

impl MaterialEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }

    fn piece_value(&self, pt: PieceType) -> i32 {
        match pt {
            PieceType::Pawn => self.config.val_pawn,
            PieceType::Knight => self.config.val_knight,
            PieceType::Bishop => self.config.val_bishop,
            PieceType::Rook => self.config.val_rook,
            PieceType::Queen => self.config.val_queen,
            PieceType::King => self.config.val_king,
        }
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, state: &GameState) -> i32 {
        if state.checkmate {
            // The side to move is the one mated.
            return match state.turn {
                Color::White => -self.config.checkmate_score,
                Color::Black => self.config.checkmate_score,
            };
        }
        if state.stalemate {
            return self.config.stalemate_score;
        }

        state
            .board
            .pieces()
            .map(|(_, piece)| match piece.color {
                Color::White => self.piece_value(piece.piece_type),
                Color::Black => -self.piece_value(piece.piece_type),
            })
            .sum()
    }
}

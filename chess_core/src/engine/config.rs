use crate::logic::eval_constants::{
    CHECKMATE_SCORE, STALEMATE_SCORE, VAL_BISHOP, VAL_KING, VAL_KNIGHT, VAL_PAWN, VAL_QUEEN,
    VAL_ROOK,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Evaluation Parameters
    pub val_pawn: i32,
    pub val_knight: i32,
    pub val_bishop: i32,
    pub val_rook: i32,
    pub val_queen: i32,
    pub val_king: i32,
    pub checkmate_score: i32,
    pub stalemate_score: i32,

    // Search Parameters
    pub max_depth: u8,
    pub shuffle_root_moves: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_pawn: VAL_PAWN,
            val_knight: VAL_KNIGHT,
            val_bishop: VAL_BISHOP,
            val_rook: VAL_ROOK,
            val_queen: VAL_QUEEN,
            val_king: VAL_KING,
            checkmate_score: CHECKMATE_SCORE,
            stalemate_score: STALEMATE_SCORE,

            max_depth: 3,
            shuffle_root_moves: true,
        }
    }
}

/// Tuning file format: piece values are multipliers on the defaults,
/// everything else is taken as-is.
#[derive(Deserialize)]
struct EngineConfigJson {
    val_pawn: Option<f32>,
    val_knight: Option<f32>,
    val_bishop: Option<f32>,
    val_rook: Option<f32>,
    val_queen: Option<f32>,
    val_king: Option<f32>,

    checkmate_score: Option<i32>,
    stalemate_score: Option<i32>,
    max_depth: Option<u8>,
    shuffle_root_moves: Option<bool>,
}

impl EngineConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            val_pawn: apply_scale(default.val_pawn, json_config.val_pawn),
            val_knight: apply_scale(default.val_knight, json_config.val_knight),
            val_bishop: apply_scale(default.val_bishop, json_config.val_bishop),
            val_rook: apply_scale(default.val_rook, json_config.val_rook),
            val_queen: apply_scale(default.val_queen, json_config.val_queen),
            val_king: apply_scale(default.val_king, json_config.val_king),

            checkmate_score: json_config
                .checkmate_score
                .unwrap_or(default.checkmate_score),
            stalemate_score: json_config
                .stalemate_score
                .unwrap_or(default.stalemate_score),
            max_depth: json_config.max_depth.unwrap_or(default.max_depth),
            shuffle_root_moves: json_config
                .shuffle_root_moves
                .unwrap_or(default.shuffle_root_moves),
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}

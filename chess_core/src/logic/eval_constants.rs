// Material values, white-positive. The king is never captured, so it counts for nothing.
pub const VAL_PAWN: i32 = 1;
pub const VAL_KNIGHT: i32 = 3;
pub const VAL_BISHOP: i32 = 3;
pub const VAL_ROOK: i32 = 5;
pub const VAL_QUEEN: i32 = 9;
pub const VAL_KING: i32 = 0;

// Terminal scores
pub const CHECKMATE_SCORE: i32 = 1000;
pub const STALEMATE_SCORE: i32 = 0;

pub mod board;
pub mod eval_constants;
pub mod fen;
pub mod game;
pub mod generator;
pub mod moves;
pub mod rules;

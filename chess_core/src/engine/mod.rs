use crate::logic::game::GameState;
use crate::logic::moves::Move;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod eval;
pub mod oracle;
pub mod random;
pub mod search;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchLimit {
    Depth(u8),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u32,
    pub score: i32,
}

pub trait Evaluator {
    /// Static score of `state`, positive when White is better.
    fn evaluate(&self, state: &GameState) -> i32;
}

/// A move source. Implementations may mutate `game_state` while thinking but
/// must hand it back exactly as they found it.
///
/// `limit` is an upper bound the engine may lower further, e.g. to its own
/// configured maximum depth. The returned stats report what was searched.
pub trait Searcher {
    fn search(
        &mut self,
        game_state: &mut GameState,
        limit: SearchLimit,
    ) -> Option<(Move, SearchStats)>;
}

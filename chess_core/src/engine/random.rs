use crate::engine::{SearchLimit, SearchStats, Searcher};
use crate::logic::game::GameState;
use crate::logic::moves::Move;
use rand::seq::SliceRandom;

/// Plays a uniformly random legal move. Also the fallback when an external
/// move source misbehaves.
#[derive(Debug, Default)]
pub struct RandomEngine;

impl RandomEngine {
    pub const fn new() -> Self {
        Self
    }

    pub fn pick(&self, moves: &[Move]) -> Option<Move> {
        moves.choose(&mut rand::thread_rng()).copied()
    }
}

impl Searcher for RandomEngine {
    fn search(
        &mut self,
        game_state: &mut GameState,
        _limit: SearchLimit,
    ) -> Option<(Move, SearchStats)> {
        let moves = game_state.generate_legal_moves();
        let mv = self.pick(&moves)?;
        let stats = SearchStats {
            depth: 0,
            nodes: 1,
            score: 0,
        };
        Some((mv, stats))
    }
}

use crate::engine::config::EngineConfig;
use crate::engine::eval::MaterialEvaluator;
use crate::engine::{Evaluator, SearchLimit, SearchStats, Searcher};
use crate::logic::board::Color;
use crate::logic::game::GameState;
use crate::logic::moves::Move;
use rand::seq::SliceRandom;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    pub best_move: Option<Move>,
}

/// Fixed-depth negamax with alpha-beta pruning over a single shared
/// `GameState`, mutated with apply/undo.
pub struct NegamaxEngine {
    config: Arc<EngineConfig>,
    evaluator: MaterialEvaluator,
    nodes_searched: u32,
}

impl NegamaxEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            evaluator: MaterialEvaluator::new(config.clone()),
            config,
            nodes_searched: 0,
        }
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.evaluator = MaterialEvaluator::new(config.clone());
        self.config = config;
    }

    // Strictly outside the checkmate range, so the first move searched always
    // beats the initial best score.
    fn infinity(&self) -> i32 {
        self.config.checkmate_score.saturating_abs().saturating_add(1)
    }

    /// Negamax score of `state` from the point of view of `sign` (+1 White,
    /// -1 Black). `moves` must be the legal moves of `state`, generated last so
    /// that the terminal flags are current.
    ///
    /// `best_move` is the first move to reach the returned score; `None` at
    /// depth 0 and in terminal positions.
    pub fn negamax_alpha_beta(
        &mut self,
        state: &mut GameState,
        moves: &[Move],
        depth: u8,
        mut alpha: i32,
        beta: i32,
        sign: i32,
    ) -> SearchResult {
        self.nodes_searched += 1;

        if depth == 0 || moves.is_empty() {
            return SearchResult {
                score: sign * self.evaluator.evaluate(state),
                best_move: None,
            };
        }

        let mut best = SearchResult {
            score: -self.infinity(),
            best_move: None,
        };

        for &mv in moves {
            let score = {
                let mut child = state.scoped_move(mv);
                let child_moves = child.generate_legal_moves();
                -self
                    .negamax_alpha_beta(&mut child, &child_moves, depth - 1, -beta, -alpha, -sign)
                    .score
            };

            if score > best.score {
                best = SearchResult {
                    score,
                    best_move: Some(mv),
                };
            }
            alpha = alpha.max(best.score);
            if alpha >= beta {
                break;
            }
        }

        best
    }

    /// Picks a move for the side to move at `depth` plies. The root move order
    /// is shuffled (unless disabled) so equal-scoring moves vary between games.
    pub fn find_best_move(&mut self, state: &mut GameState, depth: u8) -> SearchResult {
        let mut moves = state.generate_legal_moves();
        if self.config.shuffle_root_moves {
            moves.shuffle(&mut rand::thread_rng());
        }

        let sign = match state.turn {
            Color::White => 1,
            Color::Black => -1,
        };
        let infinity = self.infinity();
        self.negamax_alpha_beta(state, &moves, depth, -infinity, infinity, sign)
    }
}

impl Searcher for NegamaxEngine {
    /// Searches to `limit` plies, capped at `EngineConfig::max_depth` and
    /// raised to at least 1. `SearchStats::depth` reports the depth used.
    fn search(
        &mut self,
        game_state: &mut GameState,
        limit: SearchLimit,
    ) -> Option<(Move, SearchStats)> {
        self.nodes_searched = 0;
        let SearchLimit::Depth(limit_depth) = limit;
        // Depth 0 would only evaluate, which yields no move.
        let depth = limit_depth.clamp(1, self.config.max_depth.max(1));
        if depth != limit_depth {
            log::debug!(
                "requested depth {} adjusted to {} (max_depth {})",
                limit_depth,
                depth,
                self.config.max_depth
            );
        }

        let result = self.find_best_move(game_state, depth);
        let stats = SearchStats {
            depth,
            nodes: self.nodes_searched,
            score: result.score,
        };

        match result.best_move {
            Some(mv) => {
                log::debug!(
                    "depth {} nodes {} score {} best {}",
                    stats.depth,
                    stats.nodes,
                    stats.score,
                    mv
                );
                Some((mv, stats))
            }
            None => {
                log::debug!("no legal moves for {:?}", game_state.turn);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> NegamaxEngine {
        NegamaxEngine::new(Arc::new(EngineConfig::default()))
    }

    #[test]
    fn test_depth_zero_is_signed_evaluation() {
        let mut engine = engine();
        let evaluator = MaterialEvaluator::new(Arc::new(EngineConfig::default()));
        let mut game = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();
        let moves = game.generate_legal_moves();

        let result = engine.negamax_alpha_beta(&mut game, &moves, 0, -2000, 2000, -1);
        assert_eq!(result.score, -evaluator.evaluate(&game));
        assert_eq!(result.score, -5);
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn test_search_restores_state() {
        let mut engine = engine();
        let mut game = GameState::new();
        let before = game.board.clone();

        let (_, stats) = engine.search(&mut game, SearchLimit::Depth(2)).unwrap();
        assert!(stats.nodes > 20);
        assert_eq!(game.board, before);
        assert!(game.move_log.is_empty());
        assert_eq!(game.turn, Color::White);
    }

    #[test]
    fn test_takes_hanging_queen() {
        let mut engine = engine();
        let mut game = GameState::from_fen("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1").unwrap();
        let result = engine.find_best_move(&mut game, 1);
        let mv = result.best_move.unwrap();
        assert_eq!(mv.to_coordinate_notation(), "d2d5");
        assert_eq!(result.score, 5);
    }

    #[test]
    fn test_mated_side_still_returns_a_move() {
        let mut engine = engine();
        // Black can only prolong; every line loses. A move must still be chosen.
        let mut game = GameState::from_fen("7k/8/6K1/8/8/8/8/R7 b - - 0 1").unwrap();
        let result = engine.find_best_move(&mut game, 3);
        assert!(result.best_move.is_some());
        assert_eq!(result.score, -1000);
    }

    #[test]
    fn test_no_move_when_game_over() {
        let mut engine = engine();
        let mut game = GameState::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        assert!(engine.search(&mut game, SearchLimit::Depth(3)).is_none());
    }

    #[test]
    fn test_requested_depth_is_capped_by_config() {
        let mut engine = NegamaxEngine::new(Arc::new(EngineConfig {
            max_depth: 2,
            ..EngineConfig::default()
        }));
        let mut game = GameState::new();

        let (_, stats) = engine.search(&mut game, SearchLimit::Depth(5)).unwrap();
        assert_eq!(stats.depth, 2);

        let (_, stats) = engine.search(&mut game, SearchLimit::Depth(0)).unwrap();
        assert_eq!(stats.depth, 1);
        assert_eq!(stats.nodes, 21);
    }

    #[test]
    fn test_stalemated_node_scores_zero_inside_search() {
        let mut engine = engine();
        let mut game = GameState::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        let moves = game.generate_legal_moves();
        assert!(moves.is_empty());
        assert!(game.stalemate);

        for depth in 1..=3 {
            let result = engine.negamax_alpha_beta(&mut game, &moves, depth, -1001, 1001, -1);
            assert_eq!(result.score, 0);
            assert_eq!(result.best_move, None);
        }
    }

    #[test]
    fn test_stalemating_move_loses_to_mate() {
        let mut engine = NegamaxEngine::new(Arc::new(EngineConfig {
            shuffle_root_moves: false,
            ..EngineConfig::default()
        }));
        // Qg6 stalemates; Qg7 (guarded by the king) mates.
        let mut game = GameState::from_fen("7k/5K2/8/6Q1/8/8/8/8 w - - 0 1").unwrap();
        let moves = game.generate_legal_moves();
        let stalemating = moves
            .iter()
            .copied()
            .find(|m| m.to_coordinate_notation() == "g5g6")
            .unwrap();

        let stalemate_line = {
            let mut child = game.scoped_move(stalemating);
            let child_moves = child.generate_legal_moves();
            assert!(child.stalemate);
            -engine
                .negamax_alpha_beta(&mut child, &child_moves, 1, -1001, 1001, -1)
                .score
        };
        assert_eq!(stalemate_line, 0);

        let result = engine.find_best_move(&mut game, 2);
        assert_eq!(result.score, 1000);
        assert_ne!(result.best_move, Some(stalemating));
    }
}

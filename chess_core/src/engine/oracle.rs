use crate::engine::random::RandomEngine;
use crate::engine::{SearchLimit, SearchStats, Searcher};
use crate::logic::game::GameState;
use crate::logic::moves::{CoordinateMove, Move};

/// An outside source of best moves, such as a UCI engine process. It sees the
/// game so far in coordinate form (`"e2e4"`, promotions suffixed `"q"`) and
/// answers with one move in the same form, or nothing.
pub trait MoveOracle {
    fn suggest_move(&mut self, history: &[String]) -> Option<String>;
}

/// Asks `oracle` for a move and checks it against the legal list. A missing,
/// unparseable or illegal reply falls back to a random legal move. `None` only
/// when there are no legal moves at all.
pub fn select_oracle_move<O: MoveOracle + ?Sized>(
    oracle: &mut O,
    state: &mut GameState,
) -> Option<Move> {
    let moves = state.generate_legal_moves();
    if moves.is_empty() {
        return None;
    }

    let history = state.coordinate_history();
    let reply = oracle.suggest_move(&history);

    let chosen = match reply.as_deref().map(CoordinateMove::parse) {
        Some(Ok(parsed)) => {
            let found = moves.iter().copied().find(|mv| parsed.matches(mv));
            if found.is_none() {
                log::warn!("oracle suggested illegal move {parsed:?}, playing a random move");
            }
            found
        }
        Some(Err(e)) => {
            log::warn!("could not parse oracle reply {reply:?}: {e}, playing a random move");
            None
        }
        None => {
            log::warn!("oracle gave no move, playing a random move");
            None
        }
    };

    chosen.or_else(|| RandomEngine::new().pick(&moves))
}

/// Adapts a `MoveOracle` to the `Searcher` interface.
pub struct OracleEngine<O> {
    oracle: O,
}

impl<O: MoveOracle> OracleEngine<O> {
    pub const fn new(oracle: O) -> Self {
        Self { oracle }
    }
}

impl<O: MoveOracle> Searcher for OracleEngine<O> {
    fn search(
        &mut self,
        game_state: &mut GameState,
        _limit: SearchLimit,
    ) -> Option<(Move, SearchStats)> {
        let mv = select_oracle_move(&mut self.oracle, game_state)?;
        Some((mv, SearchStats::default()))
    }
}

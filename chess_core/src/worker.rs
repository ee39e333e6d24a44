use crate::engine::config::EngineConfig;
use crate::engine::search::NegamaxEngine;
use crate::engine::{SearchLimit, SearchStats, Searcher};
use crate::logic::game::GameState;
use crate::logic::moves::Move;
use gloo_worker::{HandlerId, Worker, WorkerScope};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize)]
pub enum Input {
    ComputeMove(GameState, SearchLimit, EngineConfig),
}

#[derive(Serialize, Deserialize)]
pub enum Output {
    MoveFound(Move, SearchStats),
    NoMove,
}

/// Runs searches off the UI thread. Each request carries its own copy of the
/// game, so the caller is free to ignore a reply that arrives too late.
pub struct SearchWorker {
    engine: Option<NegamaxEngine>,
}

impl SearchWorker {
    fn compute(&mut self, mut game_state: GameState, limit: SearchLimit, config: EngineConfig) -> Output {
        let config = Arc::new(config);
        if let Some(engine) = &mut self.engine {
            engine.update_config(config);
        } else {
            self.engine = Some(NegamaxEngine::new(config));
        }
        let Some(engine) = self.engine.as_mut() else {
            return Output::NoMove;
        };

        match engine.search(&mut game_state, limit) {
            Some((mv, stats)) => Output::MoveFound(mv, stats),
            None => Output::NoMove,
        }
    }
}

impl Worker for SearchWorker {
    type Input = Input;
    type Message = ();
    type Output = Output;

    fn create(_scope: &WorkerScope<Self>) -> Self {
        Self { engine: None }
    }

    fn update(&mut self, _scope: &WorkerScope<Self>, _msg: Self::Message) {}

    fn received(&mut self, scope: &WorkerScope<Self>, msg: Self::Input, id: HandlerId) {
        match msg {
            Input::ComputeMove(game_state, limit, config) => {
                let output = self.compute(game_state, limit, config);
                scope.respond(id, output);
            }
        }
    }
}

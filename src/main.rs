use chess_core::engine::config::EngineConfig;
use chess_core::engine::random::RandomEngine;
use chess_core::engine::search::NegamaxEngine;
use chess_core::engine::{SearchLimit, Searcher};
use chess_core::logic::board::Color;
use chess_core::logic::game::{GameState, GameStatus};
use clap::{Parser, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EngineKind {
    Negamax,
    Random,
}

impl EngineKind {
    fn build(self, config: &Arc<EngineConfig>) -> Box<dyn Searcher> {
        match self {
            Self::Negamax => Box::new(NegamaxEngine::new(Arc::clone(config))),
            Self::Random => Box::new(RandomEngine::new()),
        }
    }
}

/// Plays a game between two engines and prints the moves.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    #[arg(long, value_enum, default_value = "negamax")]
    white: EngineKind,

    #[arg(long, value_enum, default_value = "random")]
    black: EngineKind,

    /// Search depth in plies (overrides the config file)
    #[arg(long)]
    depth: Option<u8>,

    #[arg(long, default_value_t = 200)]
    max_plies: usize,

    /// Engine tuning file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting position, defaults to the standard one
    #[arg(long)]
    fen: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from_json(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    if let Some(depth) = args.depth {
        config.max_depth = depth;
    }
    let limit = SearchLimit::Depth(config.max_depth);
    let config = Arc::new(config);

    let mut game = match &args.fen {
        Some(fen) => GameState::from_fen(fen)?,
        None => GameState::new(),
    };
    let mut white = args.white.build(&config);
    let mut black = args.black.build(&config);

    tracing::info!(white = ?args.white, black = ?args.black, depth = config.max_depth, "starting game");

    for ply in 1..=args.max_plies {
        let engine = match game.turn {
            Color::White => &mut white,
            Color::Black => &mut black,
        };
        let Some((mv, stats)) = engine.search(&mut game, limit) else {
            break;
        };
        game.apply_move(mv);
        // Refresh the terminal flags for the side now to move.
        game.generate_legal_moves();
        tracing::info!(ply, %mv, score = stats.score, nodes = stats.nodes, "played");
    }

    match game.status() {
        GameStatus::Checkmate(winner) => tracing::info!(?winner, "checkmate"),
        GameStatus::Stalemate => tracing::info!("stalemate"),
        GameStatus::Playing => tracing::info!(plies = args.max_plies, "move limit reached"),
    }

    println!("{}", game.coordinate_history().join(" "));
    Ok(())
}

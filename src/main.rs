//! Goban-AI command-line front end.
//!
//! ## Usage
//!
//! - `goban-ai` - Play on the text console (Black human, White MCTS)
//! - `goban-ai play --black minimax --white human` - Pick who plays each color
//! - `goban-ai selfplay --black mcts --white random` - Let two engines play it out
//!
//! Set `RUST_LOG=debug` to see search diagnostics on stderr.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use goban_ai::board::Color;
use goban_ai::console::Console;
use goban_ai::constants::{DEFAULT_DEPTH, DEFAULT_SIMULATIONS, DEFAULT_SIZE, KOMI};
use goban_ai::controller::{GameController, Player};
use goban_ai::engine::{EngineConfig, build};
use goban_ai::groups::LifeRule;
use goban_ai::position::{BoardState, Rules};

/// Goban-AI: Go against MCTS and minimax engines
#[derive(Parser)]
#[command(name = "goban-ai")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play on the text console
    Play(GameArgs),
    /// Let engines play a whole game and print the result
    Selfplay(GameArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LifeArg {
    /// Any eye keeps a group alive
    OneEye,
    /// Two eyes, or one big eye
    TwoEyes,
}

impl From<LifeArg> for LifeRule {
    fn from(arg: LifeArg) -> Self {
        match arg {
            LifeArg::OneEye => LifeRule::OneEye,
            LifeArg::TwoEyes => LifeRule::TwoEyes,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct GameArgs {
    /// Board size
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,

    /// Points added to White's score
    #[arg(long, default_value_t = KOMI)]
    komi: f64,

    /// Rule deciding which groups survive the end of the game
    #[arg(long, value_enum, default_value = "two-eyes")]
    life_rule: LifeArg,

    /// Do not count empty regions touching the edge as territory
    #[arg(long)]
    no_edge_territory: bool,

    /// Black player: human, mcts, minimax or random
    #[arg(long)]
    black: Option<String>,

    /// White player: human, mcts, minimax or random
    #[arg(long)]
    white: Option<String>,

    /// Difficulty level 1-10 for engine sides (overrides the variant tag,
    /// --simulations and --threads)
    #[arg(long)]
    level: Option<u32>,

    /// Minimax search depth
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: usize,

    /// MCTS simulations per move
    #[arg(long, default_value_t = DEFAULT_SIMULATIONS)]
    simulations: usize,

    /// Parallel MCTS rollouts
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Seed for reproducible engines (White uses seed + 1)
    #[arg(long)]
    seed: Option<u64>,

    /// Per-move search time limit in milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Stop self-play after this many moves
    #[arg(long, default_value_t = 1000)]
    max_moves: usize,
}

impl Default for GameArgs {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            komi: KOMI,
            life_rule: LifeArg::TwoEyes,
            no_edge_territory: false,
            level: None,
            black: None,
            white: None,
            depth: DEFAULT_DEPTH,
            simulations: DEFAULT_SIMULATIONS,
            threads: 1,
            seed: None,
            time_limit_ms: None,
            max_moves: 1000,
        }
    }
}

impl GameArgs {
    fn rules(&self) -> Rules {
        Rules {
            komi: self.komi,
            life_rule: self.life_rule.into(),
            edge_territory: !self.no_edge_territory,
        }
    }

    fn player(&self, tag: &str, seed_offset: u64) -> Result<Player> {
        if tag.eq_ignore_ascii_case("human") {
            return Ok(Player::Human);
        }
        let mut config = match self.level {
            Some(level) => EngineConfig::from_level(level)?,
            None => EngineConfig::from_tag(tag)?
                .with_depth(self.depth)
                .with_simulations(self.simulations)
                .with_parallelism(self.threads),
        };
        if let Some(seed) = self.seed {
            config = config.with_seed(seed.wrapping_add(seed_offset));
        }
        if let Some(ms) = self.time_limit_ms {
            config = config.with_time_limit(Duration::from_millis(ms));
        }
        let engine = build(&config).with_context(|| format!("cannot build engine '{tag}'"))?;
        Ok(Player::Ai(engine))
    }

    fn game(&self, default_black: &str, default_white: &str) -> Result<GameController> {
        let board = BoardState::with_rules(self.size, self.rules())?;
        let black = self.player(self.black.as_deref().unwrap_or(default_black), 0)?;
        let white = self.player(self.white.as_deref().unwrap_or(default_white), 1)?;
        Ok(GameController::new(board, black, white))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Selfplay(args)) => run_selfplay(&args),
        Some(Commands::Play(args)) => run_console(&args),
        None => run_console(&GameArgs::default()),
    }
}

fn run_console(args: &GameArgs) -> Result<()> {
    let game = args.game("human", "mcts")?;
    println!(
        "Black: {} | White: {}",
        game.player(Color::Black).label(),
        game.player(Color::White).label()
    );
    println!("{}", game.board());

    let mut console = Console::new(game);
    let stdin = io::stdin();
    console.run(stdin.lock(), io::stdout())?;
    Ok(())
}

fn run_selfplay(args: &GameArgs) -> Result<()> {
    let mut game = args.game("mcts", "minimax")?;
    if !game.player(Color::Black).is_ai() || !game.player(Color::White).is_ai() {
        bail!("selfplay needs an engine on both sides");
    }

    for (color, mv) in game.run_ai(args.max_moves) {
        println!("{color}: {mv}");
    }
    println!("{}", game.board());
    let score = game.score();
    println!("Score: Black {} | White {}", score.black, score.white);
    if game.is_game_over() {
        println!("{}", game.winner());
    } else {
        println!("Stopped after {} moves", args.max_moves);
    }
    Ok(())
}

//! Move selection behind one interface.
//!
//! [`EngineConfig`] is the in-process configuration object; [`build`] turns
//! it into a boxed [`SearchEngine`]. Bad configuration fails here, at
//! construction, never during a search.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use fastrand::Rng;

use crate::board::Point;
use crate::constants::{
    DEFAULT_DEPTH, DEFAULT_SIMULATIONS, HIGH_LEVEL_FROM, HIGH_LEVEL_THREADS, LOW_LEVEL_THREADS,
    MAX_DEPTH, MAX_LEVEL, MAX_PARALLELISM, MAX_SIMULATIONS, MIN_LEVEL, RANDOM_MAX_LEVEL,
    SIMULATIONS_PER_LEVEL,
};
use crate::error::{Error, Result};
use crate::mcts::MctsEngine;
use crate::minimax::MinimaxEngine;
use crate::position::BoardState;

/// Anything that can propose a move for the side to move.
pub trait SearchEngine: Send {
    fn name(&self) -> &'static str;

    /// A placement for the side to move, or `None` to pass.
    fn select_move(&mut self, board: &BoardState) -> Option<Point>;
}

impl SearchEngine for MctsEngine {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn select_move(&mut self, board: &BoardState) -> Option<Point> {
        MctsEngine::select_move(self, board)
    }
}

impl SearchEngine for MinimaxEngine {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn select_move(&mut self, board: &BoardState) -> Option<Point> {
        MinimaxEngine::select_move(self, board)
    }
}

/// Uniformly random legal placement.
pub struct RandomEngine {
    rng: Rng,
}

impl RandomEngine {
    pub fn new(rng: Rng) -> Self {
        Self { rng }
    }
}

impl SearchEngine for RandomEngine {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select_move(&mut self, board: &BoardState) -> Option<Point> {
        let moves = board.legal_moves();
        if moves.is_empty() {
            return None;
        }
        Some(moves[self.rng.usize(..moves.len())])
    }
}

/// Search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Mcts,
    Minimax,
    Random,
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mcts" => Ok(Variant::Mcts),
            "minimax" => Ok(Variant::Minimax),
            "random" => Ok(Variant::Random),
            _ => Err(Error::UnknownVariant { tag: s.to_string() }),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Mcts => f.write_str("mcts"),
            Variant::Minimax => f.write_str("minimax"),
            Variant::Random => f.write_str("random"),
        }
    }
}

/// AI configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub variant: Variant,
    /// Plies searched (minimax only)
    pub depth: usize,
    /// Simulations per search (MCTS only)
    pub simulations: usize,
    /// Rollouts run at once (MCTS only)
    pub parallelism: usize,
    /// Seed for reproducible play; fresh entropy when `None`
    pub seed: Option<u64>,
    /// Stop searching after this long and return the best move so far
    pub time_limit: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(Variant::Mcts)
    }
}

impl EngineConfig {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            depth: DEFAULT_DEPTH,
            simulations: DEFAULT_SIMULATIONS,
            parallelism: 1,
            seed: None,
            time_limit: None,
        }
    }

    /// Defaults for the variant named by `tag`.
    pub fn from_tag(tag: &str) -> Result<Self> {
        Ok(Self::new(tag.parse()?))
    }

    /// Preset for a difficulty level from 1 to 10. Low levels play randomly;
    /// higher ones run MCTS with 100 simulations per level.
    pub fn from_level(level: u32) -> Result<Self> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            return Err(Error::InvalidConfiguration {
                message: format!("level must be {MIN_LEVEL}-{MAX_LEVEL} (got {level})"),
            });
        }
        if level <= RANDOM_MAX_LEVEL {
            return Ok(Self::new(Variant::Random));
        }
        let threads = if level >= HIGH_LEVEL_FROM {
            HIGH_LEVEL_THREADS
        } else {
            LOW_LEVEL_THREADS
        };
        Ok(Self::new(Variant::Mcts)
            .with_simulations(SIMULATIONS_PER_LEVEL * level as usize)
            .with_parallelism(threads))
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_simulations(mut self, simulations: usize) -> Self {
        self.simulations = simulations;
        self
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Check the options the chosen variant uses.
    pub fn validate(&self) -> Result<()> {
        let invalid =
            |message: String| -> Result<()> { Err(Error::InvalidConfiguration { message }) };
        match self.variant {
            Variant::Minimax if self.depth > MAX_DEPTH => {
                invalid(format!("depth {} exceeds maximum {MAX_DEPTH}", self.depth))
            }
            Variant::Mcts if !(1..=MAX_SIMULATIONS).contains(&self.simulations) => invalid(
                format!("simulations must be 1-{MAX_SIMULATIONS} (got {})", self.simulations),
            ),
            Variant::Mcts if !(1..=MAX_PARALLELISM).contains(&self.parallelism) => invalid(
                format!("parallelism must be 1-{MAX_PARALLELISM} (got {})", self.parallelism),
            ),
            _ => Ok(()),
        }
    }

    fn rng(&self) -> Rng {
        self.seed.map_or_else(Rng::new, Rng::with_seed)
    }
}

/// Build the engine described by `config`.
pub fn build(config: &EngineConfig) -> Result<Box<dyn SearchEngine>> {
    config.validate()?;
    let rng = config.rng();
    let engine: Box<dyn SearchEngine> = match config.variant {
        Variant::Mcts => Box::new(MctsEngine::new(
            config.simulations,
            config.parallelism,
            config.time_limit,
            rng,
        )?),
        Variant::Minimax => Box::new(MinimaxEngine::new(config.depth, config.time_limit, rng)),
        Variant::Random => Box::new(RandomEngine::new(rng)),
    };
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_tags() {
        assert_eq!("MCTS".parse::<Variant>().unwrap(), Variant::Mcts);
        assert_eq!("minimax".parse::<Variant>().unwrap(), Variant::Minimax);
        assert_eq!("Random".parse::<Variant>().unwrap(), Variant::Random);
        assert_eq!(Variant::Minimax.to_string(), "minimax");
    }

    #[test]
    fn test_unknown_tag_is_a_construction_error() {
        let err = EngineConfig::from_tag("alphago").unwrap_err();
        assert_eq!(
            err,
            Error::UnknownVariant {
                tag: "alphago".to_string()
            }
        );
    }

    #[test]
    fn test_level_presets() {
        assert_eq!(EngineConfig::from_level(1).unwrap().variant, Variant::Random);
        assert_eq!(EngineConfig::from_level(3).unwrap().variant, Variant::Random);

        let mid = EngineConfig::from_level(5).unwrap();
        assert_eq!(mid.variant, Variant::Mcts);
        assert_eq!(mid.simulations, 500);
        assert_eq!(mid.parallelism, 2);

        let top = EngineConfig::from_level(10).unwrap();
        assert_eq!(top.simulations, 1000);
        assert_eq!(top.parallelism, 4);
        assert!(top.validate().is_ok());

        for level in [0, 11] {
            assert!(matches!(
                EngineConfig::from_level(level),
                Err(Error::InvalidConfiguration { .. })
            ));
        }
    }

    #[test]
    fn test_out_of_range_options_rejected() {
        let deep = EngineConfig::new(Variant::Minimax).with_depth(MAX_DEPTH + 1);
        assert!(matches!(build(&deep), Err(Error::InvalidConfiguration { .. })));

        let idle = EngineConfig::new(Variant::Mcts).with_simulations(0);
        assert!(matches!(build(&idle), Err(Error::InvalidConfiguration { .. })));

        let crowded = EngineConfig::new(Variant::Mcts).with_parallelism(0);
        assert!(matches!(build(&crowded), Err(Error::InvalidConfiguration { .. })));

        // Options of other variants are not checked.
        let random = EngineConfig::new(Variant::Random).with_simulations(0);
        assert!(build(&random).is_ok());
    }

    #[test]
    fn test_build_names() {
        for (variant, name) in [
            (Variant::Mcts, "mcts"),
            (Variant::Minimax, "minimax"),
            (Variant::Random, "random"),
        ] {
            let engine = build(&EngineConfig::new(variant).with_seed(1)).unwrap();
            assert_eq!(engine.name(), name);
        }
    }

    #[test]
    fn test_random_engine_picks_legal_moves() {
        let mut board = BoardState::new(3).unwrap();
        let mut engine = RandomEngine::new(Rng::with_seed(5));
        for _ in 0..4 {
            let pt = engine.select_move(&board).unwrap();
            assert!(board.place(pt));
        }
    }

    #[test]
    fn test_random_engine_passes_when_stuck() {
        let mut board = BoardState::new(3).unwrap();
        board.pass_turn();
        board.pass_turn();
        let mut engine = RandomEngine::new(Rng::with_seed(5));
        assert_eq!(engine.select_move(&board), None);
    }
}

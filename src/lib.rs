//! Goban-AI: Go rules and computer opponents for small boards.
//!
//! This crate provides a complete Go rules engine (captures, ko, suicide,
//! territory and scoring) plus three interchangeable move selectors:
//! Monte Carlo Tree Search, alpha-beta minimax and a random player.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits and engine parameters
//! - [`board`] - Colors, cells and the square grid
//! - [`groups`] - Flood fills, liberties, eyes and life
//! - [`position`] - Game state (moves, captures, ko, undo, scoring)
//! - [`playout`] - Random game simulation
//! - [`mcts`] - Monte Carlo Tree Search with UCB1
//! - [`eval`] - Static evaluation for minimax
//! - [`minimax`] - Negamax with alpha-beta and a transposition cache
//! - [`engine`] - Engine configuration and the [`SearchEngine`] trait
//! - [`controller`] - Turn sequencing between humans and engines
//! - [`console`] - Text command loop
//!
//! ## Example
//!
//! ```
//! use goban_ai::engine::{build, EngineConfig, Variant};
//! use goban_ai::position::BoardState;
//!
//! let mut board = BoardState::new(9).unwrap();
//! board.place((4, 4));
//!
//! let config = EngineConfig::new(Variant::Mcts).with_simulations(50).with_seed(7);
//! let mut engine = build(&config).unwrap();
//! if let Some(pt) = engine.select_move(&board) {
//!     assert!(board.place(pt));
//! }
//! println!("{board}");
//! ```

pub mod board;
pub mod console;
pub mod constants;
pub mod controller;
pub mod engine;
pub mod error;
pub mod eval;
pub mod groups;
pub mod mcts;
pub mod minimax;
pub mod playout;
pub mod position;

pub use engine::SearchEngine;
pub use error::{Error, Result};

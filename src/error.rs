//! Error types for the engine.

use thiserror::Error;

use crate::constants::{MAX_SIZE, MIN_SIZE};

/// Library error type.
///
/// Illegal moves are not reported here; see [`MoveError`](crate::position::MoveError).
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("board size {size} is not supported (must be {MIN_SIZE}-{MAX_SIZE})")]
    InvalidBoardSize { size: usize },

    #[error("unknown search variant '{tag}' (expected mcts, minimax or random)")]
    UnknownVariant { tag: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid diagram: {message}")]
    InvalidDiagram { message: String },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, Error>;

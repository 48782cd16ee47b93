//! Monte Carlo playouts (random game simulation).
//!
//! A playout plays uniformly random legal moves until two consecutive passes
//! end the game, then scores the result. Random play fills its own eyes, so
//! games are also cut off after [`ROLLOUT_MOVES_PER_POINT`] moves per board
//! point and scored as they stand.

use fastrand::Rng;

use crate::constants::ROLLOUT_MOVES_PER_POINT;
use crate::position::{BoardState, Score};

/// Outcome of one playout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playout {
    /// Score at the end of the playout
    pub score: Score,
    /// Moves played, passes included
    pub moves: usize,
    /// Whether the game ended by two passes rather than the move cap
    pub finished: bool,
}

/// Play random moves from `board` to the end of the game.
pub fn playout(board: &BoardState, rng: &mut Rng) -> Playout {
    let mut sim = board.fork();
    let cap = ROLLOUT_MOVES_PER_POINT * sim.size() * sim.size();
    let mut moves = 0;

    while !sim.is_game_over() && moves < cap {
        let legal = sim.legal_moves();
        if legal.is_empty() {
            sim.pass_turn();
        } else {
            let pt = legal[rng.usize(..legal.len())];
            sim.place(pt);
        }
        moves += 1;
    }

    Playout {
        score: sim.score(),
        moves,
        finished: sim.is_game_over(),
    }
}

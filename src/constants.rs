//! Constants for board geometry, scoring, and search parameters.
//!
//! Everything tunable about the engine lives here. Board size is chosen at
//! runtime (see [`BoardState::new`](crate::position::BoardState::new)), so the
//! geometry constants only bound what is accepted.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN).
pub const DEFAULT_SIZE: usize = 9;

/// Smallest accepted board size.
pub const MIN_SIZE: usize = 2;

/// Largest accepted board size.
pub const MAX_SIZE: usize = 19;

/// Orthogonal neighbor offsets as (row, col) deltas.
/// Order: East, South, West, North
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

// =============================================================================
// Scoring
// =============================================================================

/// Compensation points awarded to White.
pub const KOMI: f64 = 6.5;

/// An eye at least this large keeps a group alive on its own under
/// [`LifeRule::TwoEyes`](crate::groups::LifeRule::TwoEyes).
pub const BIG_EYE_SIZE: usize = 4;

// =============================================================================
// Positional Values (move ordering and evaluation)
// =============================================================================

/// Value of a corner point.
pub const CORNER_VALUE: f64 = 3.0;

/// Value of a non-corner edge point.
pub const EDGE_VALUE: f64 = 2.0;

/// Value of an interior point.
pub const CENTER_VALUE: f64 = 1.0;

// =============================================================================
// Static Evaluation Coefficients
// =============================================================================

/// Weight per liberty of a group.
pub const LIBERTY_WEIGHT: f64 = 0.5;

/// Weight applied to the summed positional value of a group's stones.
pub const POSITION_WEIGHT: f64 = 0.3;

/// Weight per orthogonal contact between same-colored stones.
pub const CONNECTIVITY_WEIGHT: f64 = 0.4;

/// Bonus per enemy group at or below [`THREAT_LIBERTIES`].
pub const THREAT_BONUS: f64 = 2.0;

/// Liberty count at which an enemy group counts as threatened.
pub const THREAT_LIBERTIES: usize = 2;

/// Weight per stone in a group.
pub const GROUP_SIZE_WEIGHT: f64 = 0.2;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Exploration constant in the UCB1 formula.
pub const UCB_C: f64 = 1.4;

/// Default number of simulations per search.
pub const DEFAULT_SIMULATIONS: usize = 500;

/// Upper bound on the simulation budget.
pub const MAX_SIMULATIONS: usize = 1_000_000;

/// Rollouts are cut off after this many moves per board point.
pub const ROLLOUT_MOVES_PER_POINT: usize = 3;

// =============================================================================
// Minimax Parameters
// =============================================================================

/// Default search depth in plies.
pub const DEFAULT_DEPTH: usize = 3;

/// Deepest accepted search.
pub const MAX_DEPTH: usize = 8;

// =============================================================================
// Engine Threads
// =============================================================================

/// Largest accepted worker count.
pub const MAX_PARALLELISM: usize = 64;

// =============================================================================
// Difficulty Levels
// =============================================================================

/// Lowest and highest difficulty level.
pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 10;

/// Levels up to this one play random moves.
pub const RANDOM_MAX_LEVEL: u32 = 3;

/// MCTS simulations granted per level.
pub const SIMULATIONS_PER_LEVEL: usize = 100;

/// From this level on MCTS uses [`HIGH_LEVEL_THREADS`] rollout workers
/// instead of [`LOW_LEVEL_THREADS`].
pub const HIGH_LEVEL_FROM: u32 = 7;
pub const HIGH_LEVEL_THREADS: usize = 4;
pub const LOW_LEVEL_THREADS: usize = 2;

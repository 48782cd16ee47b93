//! Depth-limited negamax search with alpha-beta pruning.
//!
//! Values are always relative to the side to move, so each ply negates its
//! child's value. Moves are shuffled with the engine RNG and then stably
//! sorted by [`positional_value`], corners first.
//!
//! Every call to [`MinimaxEngine::search`] gets its own transposition cache,
//! keyed by grid, side to move, pass count and remaining depth. Entries record
//! whether the stored value is exact or only a bound from a pruned search.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use fastrand::Rng;
use tracing::debug;

use crate::board::{Color, Grid, Point};
use crate::eval::{evaluate, positional_value};
use crate::position::{BoardState, Move};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: f64,
    bound: Bound,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    grid: Grid,
    to_move: Color,
    passes: u32,
    depth: usize,
}

impl CacheKey {
    fn new(board: &BoardState, depth: usize) -> Self {
        Self {
            grid: board.grid().clone(),
            to_move: board.current_player(),
            passes: board.consecutive_passes(),
            depth,
        }
    }
}

/// Counters for one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited, root included
    pub nodes: u64,
    pub cache_hits: u64,
    pub cache_writes: u64,
}

/// Result of one minimax search.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimaxReport {
    /// Value of the root for the side to move
    pub score: f64,
    /// Best placement found; `None` at a leaf or when passing
    pub best_move: Option<Point>,
    pub stats: SearchStats,
    /// Whether the time limit cut the search short
    pub timed_out: bool,
    pub elapsed: Duration,
}

/// State owned by a single search call.
struct SearchContext<'a> {
    cache: HashMap<CacheKey, Entry>,
    stats: SearchStats,
    deadline: Option<Instant>,
    timed_out: bool,
    rng: &'a mut Rng,
}

impl<'a> SearchContext<'a> {
    fn new(deadline: Option<Instant>, rng: &'a mut Rng) -> Self {
        Self {
            cache: HashMap::new(),
            stats: SearchStats::default(),
            deadline,
            timed_out: false,
            rng,
        }
    }

    fn out_of_time(&mut self) -> bool {
        if !self.timed_out && self.deadline.is_some_and(|d| Instant::now() >= d) {
            self.timed_out = true;
        }
        self.timed_out
    }

    fn store(&mut self, key: CacheKey, value: f64, bound: Bound) {
        if self.timed_out {
            return;
        }
        self.cache.insert(key, Entry { value, bound });
        self.stats.cache_writes += 1;
    }

    fn ordered_moves(&mut self, board: &BoardState) -> Vec<Move> {
        let mut moves = board.legal_moves();
        if moves.is_empty() {
            return vec![Move::Pass];
        }
        self.rng.shuffle(&mut moves);
        let grid = board.grid();
        moves.sort_by(|&a, &b| positional_value(grid, b).total_cmp(&positional_value(grid, a)));
        moves.into_iter().map(Move::Place).collect()
    }

    fn negamax(
        &mut self,
        board: &BoardState,
        depth: usize,
        mut alpha: f64,
        beta: f64,
    ) -> (f64, Option<Point>) {
        self.stats.nodes += 1;
        let key = CacheKey::new(board, depth);

        if let Some(&entry) = self.cache.get(&key) {
            let usable = match entry.bound {
                Bound::Exact => true,
                Bound::Lower => entry.value >= beta,
                Bound::Upper => entry.value <= alpha,
            };
            if usable {
                self.stats.cache_hits += 1;
                return (entry.value, None);
            }
        }

        if depth == 0 || board.is_game_over() {
            let value = evaluate(board);
            self.store(key, value, Bound::Exact);
            return (value, None);
        }

        let alpha_orig = alpha;
        let mut best_value = f64::NEG_INFINITY;
        let mut best_move = None;

        for (i, mv) in self.ordered_moves(board).into_iter().enumerate() {
            if i > 0 && self.out_of_time() {
                break;
            }
            let mut child = board.fork();
            if !child.play(mv) {
                continue;
            }
            let (value, _) = self.negamax(&child, depth - 1, -beta, -alpha);
            let value = -value;
            if value > best_value {
                best_value = value;
                best_move = match mv {
                    Move::Place(pt) => Some(pt),
                    Move::Pass => None,
                };
            }
            alpha = alpha.max(value);
            if beta <= alpha {
                break;
            }
        }

        if best_value == f64::NEG_INFINITY {
            return (evaluate(board), None);
        }

        let bound = if best_value <= alpha_orig {
            Bound::Upper
        } else if best_value >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.store(key, best_value, bound);
        (best_value, best_move)
    }
}

/// Alpha-beta move selector.
pub struct MinimaxEngine {
    depth: usize,
    time_limit: Option<Duration>,
    rng: Rng,
}

impl MinimaxEngine {
    pub fn new(depth: usize, time_limit: Option<Duration>, rng: Rng) -> Self {
        Self {
            depth,
            time_limit,
            rng,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Search `board` to the configured depth.
    pub fn search(&mut self, board: &BoardState) -> MinimaxReport {
        let start = Instant::now();
        let deadline = self.time_limit.map(|limit| start + limit);
        let mut ctx = SearchContext::new(deadline, &mut self.rng);

        let (score, best_move) = ctx.negamax(board, self.depth, f64::NEG_INFINITY, f64::INFINITY);
        let elapsed = start.elapsed();
        debug!(
            depth = self.depth,
            score,
            best = ?best_move,
            nodes = ctx.stats.nodes,
            cache_hits = ctx.stats.cache_hits,
            timed_out = ctx.timed_out,
            elapsed_ms = elapsed.as_millis() as u64,
            "minimax search finished"
        );

        MinimaxReport {
            score,
            best_move,
            stats: ctx.stats,
            timed_out: ctx.timed_out,
            elapsed,
        }
    }

    /// Placement chosen for the side to move, `None` for a pass.
    pub fn select_move(&mut self, board: &BoardState) -> Option<Point> {
        self.search(board).best_move
    }
}

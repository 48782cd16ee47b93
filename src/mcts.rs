//! Monte Carlo Tree Search (MCTS) with UCB1 selection.
//!
//! Each simulation runs four phases:
//! - Selection: descend from the root through fully expanded nodes, picking
//!   the child with the best UCB1 score
//! - Expansion: attach one untried move as a new child
//! - Rollout: play the new child out with random moves (see [`playout`])
//! - Backpropagation: walk parent links back to the root, updating counts
//!
//! The tree is an arena: nodes live in one `Vec` and refer to each other by
//! index. Children are owned through the arena; the parent index is only used
//! to walk back up.
//!
//! With `parallelism > 1` simulations run in batches. Selection and expansion
//! of a batch happen one at a time, the batch's rollouts run on a rayon pool,
//! and results are backpropagated in batch order. Every rollout gets its own
//! seed drawn from the engine RNG, so a search is reproducible for a fixed
//! seed and parallelism.

use std::fmt;
use std::time::{Duration, Instant};

use fastrand::Rng;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::board::{Color, Point};
use crate::constants::UCB_C;
use crate::error::{Error, Result};
use crate::playout::playout;
use crate::position::{BoardState, Move};

/// A node in the search tree.
pub struct Node {
    /// Position at this node
    pub state: BoardState,
    /// Move that led here (`None` at the root)
    pub mv: Option<Move>,
    /// Index of the parent node (`None` at the root)
    pub parent: Option<usize>,
    /// Indices of child nodes, in creation order
    pub children: Vec<usize>,
    /// Moves not yet expanded, consumed from the back
    untried: Vec<Move>,
    /// Number of simulations through this node
    pub visits: u32,
    /// Wins for the player who moved into this node (draws count half)
    pub wins: f64,
}

impl Node {
    fn new(state: BoardState, mv: Option<Move>, parent: Option<usize>, rng: &mut Rng) -> Self {
        let untried = candidate_moves(&state, rng);
        Self {
            state,
            mv,
            parent,
            children: Vec::new(),
            untried,
            visits: 0,
            wins: 0.0,
        }
    }

    /// Win rate for the player who moved into this node.
    #[inline]
    pub fn winrate(&self) -> f64 {
        if self.visits > 0 {
            self.wins / f64::from(self.visits)
        } else {
            0.0
        }
    }

    /// True once every candidate move has a child.
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// The player whose move produced this position.
    fn mover(&self) -> Color {
        self.state.current_player().opponent()
    }
}

/// Legal placements in random order; a lone pass when there are none.
fn candidate_moves(state: &BoardState, rng: &mut Rng) -> Vec<Move> {
    if state.is_game_over() {
        return Vec::new();
    }
    let mut moves: Vec<Move> = state.legal_moves().into_iter().map(Move::Place).collect();
    if moves.is_empty() {
        moves.push(Move::Pass);
    }
    rng.shuffle(&mut moves);
    moves
}

/// Arena-backed search tree. Index 0 is the root.
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(root: BoardState, rng: &mut Rng) -> Self {
        Self {
            nodes: vec![Node::new(root, None, None, rng)],
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// UCB1 score of `child` as seen from its parent. Unvisited children
    /// score infinity.
    fn ucb1(&self, child: usize) -> f64 {
        let node = &self.nodes[child];
        if node.visits == 0 {
            return f64::INFINITY;
        }
        let parent_visits = node
            .parent
            .map_or(1, |p| self.nodes[p].visits.max(1));
        let visits = f64::from(node.visits);
        node.winrate() + UCB_C * (f64::from(parent_visits).ln() / visits).sqrt()
    }

    /// Descend from the root to the node to expand.
    fn select(&self) -> usize {
        let mut idx = 0;
        loop {
            let node = &self.nodes[idx];
            if !node.is_fully_expanded() || node.children.is_empty() {
                return idx;
            }
            // First child wins ties.
            let mut best = node.children[0];
            let mut best_score = self.ucb1(best);
            for &child in &node.children[1..] {
                let score = self.ucb1(child);
                if score > best_score {
                    best = child;
                    best_score = score;
                }
            }
            idx = best;
        }
    }

    /// Attach one untried move below `idx`. Returns the new child, or `idx`
    /// itself when nothing is left to try (terminal position).
    fn expand(&mut self, idx: usize, rng: &mut Rng) -> usize {
        let Some(mv) = self.nodes[idx].untried.pop() else {
            return idx;
        };
        let mut state = self.nodes[idx].state.fork();
        let applied = state.play(mv);
        debug_assert!(applied, "candidate move {mv} rejected");

        let child = self.nodes.len();
        self.nodes.push(Node::new(state, Some(mv), Some(idx), rng));
        self.nodes[idx].children.push(child);
        child
    }

    /// Credit a rollout result to `leaf` and all its ancestors.
    fn backpropagate(&mut self, leaf: usize, winner: Option<Color>) {
        let mut cursor = Some(leaf);
        while let Some(idx) = cursor {
            let node = &mut self.nodes[idx];
            node.visits += 1;
            node.wins += match winner {
                Some(color) if color == node.mover() => 1.0,
                Some(_) => 0.0,
                None => 0.5,
            };
            cursor = node.parent;
        }
    }

    /// The most visited root child. Ties go to the child created first.
    pub fn best_child(&self) -> Option<&Node> {
        let mut best: Option<&Node> = None;
        for &idx in &self.root().children {
            let node = &self.nodes[idx];
            if best.is_none_or(|b| node.visits > b.visits) {
                best = Some(node);
            }
        }
        best
    }
}

/// Statistics for one root child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildStats {
    pub mv: Move,
    pub visits: u32,
    pub wins: f64,
}

impl fmt::Display for ChildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wr = if self.visits > 0 {
            self.wins / f64::from(self.visits)
        } else {
            0.0
        };
        write!(f, "move {} v={} w={} wr={wr:.3}", self.mv, self.visits, self.wins)
    }
}

/// Result of one MCTS search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsReport {
    /// Chosen move; `None` when the root had no candidates
    pub best: Option<Move>,
    /// Root children in creation order
    pub children: Vec<ChildStats>,
    /// Simulations completed
    pub simulations: usize,
    /// Whether the time limit cut the search short
    pub timed_out: bool,
    pub elapsed: Duration,
}

/// MCTS move selector.
pub struct MctsEngine {
    simulations: usize,
    parallelism: usize,
    time_limit: Option<Duration>,
    rng: Rng,
    pool: Option<rayon::ThreadPool>,
}

impl MctsEngine {
    /// Build an engine. A worker pool is created when `parallelism > 1`.
    pub fn new(
        simulations: usize,
        parallelism: usize,
        time_limit: Option<Duration>,
        rng: Rng,
    ) -> Result<Self> {
        let pool = if parallelism > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(parallelism)
                .build()
                .map_err(|e| Error::ThreadPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };
        Ok(Self {
            simulations,
            parallelism: parallelism.max(1),
            time_limit,
            rng,
            pool,
        })
    }

    /// Run a full search from `board`.
    pub fn search(&mut self, board: &BoardState) -> MctsReport {
        let start = Instant::now();
        let deadline = self.time_limit.map(|limit| start + limit);
        let mut tree = Tree::new(board.fork(), &mut self.rng);

        let mut done = 0;
        let mut timed_out = false;
        while done < self.simulations {
            let batch = self.parallelism.min(self.simulations - done);
            let mut leaves = Vec::with_capacity(batch);
            for _ in 0..batch {
                let node = tree.select();
                let leaf = tree.expand(node, &mut self.rng);
                leaves.push((leaf, self.rng.u64(..)));
            }

            let winners = run_playouts(&tree, &leaves, self.pool.as_ref());
            for (&(leaf, _), winner) in leaves.iter().zip(winners) {
                tree.backpropagate(leaf, winner);
            }
            done += batch;

            if done < self.simulations && deadline.is_some_and(|d| Instant::now() >= d) {
                timed_out = true;
                break;
            }
        }

        let children: Vec<ChildStats> = tree
            .root()
            .children
            .iter()
            .map(|&idx| {
                let node = tree.node(idx);
                ChildStats {
                    mv: node.mv.unwrap_or(Move::Pass),
                    visits: node.visits,
                    wins: node.wins,
                }
            })
            .collect();
        for child in &children {
            trace!("{child}");
        }

        let best = tree.best_child().and_then(|node| node.mv);
        let elapsed = start.elapsed();
        debug!(
            simulations = done,
            nodes = tree.len(),
            best = ?best,
            timed_out,
            elapsed_ms = elapsed.as_millis() as u64,
            "mcts search finished"
        );

        MctsReport {
            best,
            children,
            simulations: done,
            timed_out,
            elapsed,
        }
    }

    /// Placement chosen for the side to move, `None` for a pass.
    pub fn select_move(&mut self, board: &BoardState) -> Option<Point> {
        match self.search(board).best {
            Some(Move::Place(pt)) => Some(pt),
            Some(Move::Pass) | None => None,
        }
    }
}

/// Roll out every leaf of a batch, each with its own seed. Results come back
/// in batch order whether or not a pool is used.
fn run_playouts(
    tree: &Tree,
    leaves: &[(usize, u64)],
    pool: Option<&rayon::ThreadPool>,
) -> Vec<Option<Color>> {
    let run = |&(leaf, seed): &(usize, u64)| {
        playout(&tree.node(leaf).state, &mut Rng::with_seed(seed))
            .score
            .leader()
    };
    match pool {
        Some(pool) => pool.install(|| leaves.par_iter().map(run).collect()),
        None => leaves.iter().map(run).collect(),
    }
}

//! Go position (rules engine).
//!
//! [`BoardState`] owns the grid, the history of earlier grids, the side to
//! move and the capture counters. It is mutated only through
//! [`place`](BoardState::place), [`pass_turn`](BoardState::pass_turn),
//! [`undo`](BoardState::undo) and [`reset`](BoardState::reset).
//!
//! Rules enforced on placement:
//! - the point must be on the board and empty, and the game not over
//! - adjacent enemy groups left without liberties are captured
//! - a placement whose own group ends up without liberties is suicide
//! - a capture that recreates the previous grid is a ko violation
//!
//! Two consecutive passes end the game; dead groups are then removed using
//! the configured [`LifeRule`] and credited to the opponent.

use std::fmt;

use tracing::{debug, trace};

use crate::board::{Cell, Color, Grid, Point};
use crate::constants::{DEFAULT_SIZE, KOMI, MAX_SIZE, MIN_SIZE};
use crate::error::{Error, Result};
use crate::groups::{
    connected_group, empty_region, has_liberty, is_alive, surrounding_colors, LifeRule, Visited,
};

/// Reason a placement was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// Point is off the board
    OutOfBounds,
    /// Point is not empty
    Occupied,
    /// Move recreates the previous position
    Ko,
    /// Move would leave its own group without liberties
    Suicide,
    /// Both players have passed
    GameOver,
    /// The side to move is played by an engine
    NotYourTurn,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::OutOfBounds => write!(f, "illegal move: point off the board"),
            MoveError::Occupied => write!(f, "illegal move: point not empty"),
            MoveError::Ko => write!(f, "illegal move: retakes ko"),
            MoveError::Suicide => write!(f, "illegal move: suicide"),
            MoveError::GameOver => write!(f, "illegal move: game is over"),
            MoveError::NotYourTurn => write!(f, "illegal move: engine is on turn"),
        }
    }
}

impl std::error::Error for MoveError {}

/// A move: a stone on a point, or a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Place(Point),
    Pass,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place((row, col)) => write!(f, "({row}, {col})"),
            Move::Pass => f.write_str("pass"),
        }
    }
}

/// Scoring rules fixed for the lifetime of a [`BoardState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rules {
    /// Points added to White's score
    pub komi: f64,
    /// Which groups survive at the end of the game
    pub life_rule: LifeRule,
    /// Whether empty regions touching the edge can be territory
    pub edge_territory: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            komi: KOMI,
            life_rule: LifeRule::default(),
            edge_territory: true,
        }
    }
}

/// Final or provisional score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub black: f64,
    pub white: f64,
}

impl Score {
    /// Captures plus territory per side, komi added for White.
    pub fn tally(
        black_captures: u32,
        black_territory: usize,
        white_captures: u32,
        white_territory: usize,
        komi: f64,
    ) -> Self {
        Self {
            black: f64::from(black_captures) + black_territory as f64,
            white: f64::from(white_captures) + white_territory as f64 + komi,
        }
    }

    /// Score of `color` minus score of its opponent.
    pub fn lead(&self, color: Color) -> f64 {
        match color {
            Color::Black => self.black - self.white,
            Color::White => self.white - self.black,
        }
    }

    /// Color with the higher score, `None` on a tie.
    pub fn leader(&self) -> Option<Color> {
        if self.black > self.white {
            Some(Color::Black)
        } else if self.white > self.black {
            Some(Color::White)
        } else {
            None
        }
    }

    /// The result these scores imply for a finished game.
    pub fn outcome(&self) -> Winner {
        match self.leader() {
            Some(Color::Black) => Winner::BlackWinsBy(self.black - self.white),
            Some(Color::White) => Winner::WhiteWinsBy(self.white - self.black),
            None => Winner::Draw,
        }
    }
}

/// Game result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Winner {
    InProgress,
    BlackWinsBy(f64),
    WhiteWinsBy(f64),
    Draw,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::InProgress => write!(f, "Game in progress"),
            Winner::BlackWinsBy(margin) => write!(f, "Black wins by {margin} points"),
            Winner::WhiteWinsBy(margin) => write!(f, "White wins by {margin} points"),
            Winner::Draw => write!(f, "Draw"),
        }
    }
}

/// Empty points credited to each side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Territory {
    pub black: Vec<Point>,
    pub white: Vec<Point>,
}

/// A Go game in progress.
#[derive(Clone, Debug)]
pub struct BoardState {
    grid: Grid,
    /// Grids before each placement or pass, oldest first
    history: Vec<Grid>,
    current: Color,
    consecutive_passes: u32,
    game_over: bool,
    black_captures: u32,
    white_captures: u32,
    rules: Rules,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            grid: Grid::new(DEFAULT_SIZE),
            history: Vec::new(),
            current: Color::Black,
            consecutive_passes: 0,
            game_over: false,
            black_captures: 0,
            white_captures: 0,
            rules: Rules::default(),
        }
    }
}

fn check_size(size: usize) -> Result<()> {
    if (MIN_SIZE..=MAX_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(Error::InvalidBoardSize { size })
    }
}

impl BoardState {
    /// Empty board of the given size with default rules.
    pub fn new(size: usize) -> Result<Self> {
        Self::with_rules(size, Rules::default())
    }

    pub fn with_rules(size: usize, rules: Rules) -> Result<Self> {
        check_size(size)?;
        Ok(Self {
            grid: Grid::new(size),
            rules,
            ..Self::default()
        })
    }

    /// Start from an arbitrary position with `to_move` on turn and no history.
    pub fn from_grid(grid: Grid, to_move: Color, rules: Rules) -> Result<Self> {
        check_size(grid.size())?;
        Ok(Self {
            grid,
            current: to_move,
            rules,
            ..Self::default()
        })
    }

    // -------------------------------------------------------------------------
    // Read-only views
    // -------------------------------------------------------------------------

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn cell(&self, pt: Point) -> Option<Cell> {
        self.grid.get(pt)
    }

    pub fn current_player(&self) -> Color {
        self.current
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn consecutive_passes(&self) -> u32 {
        self.consecutive_passes
    }

    /// Stones captured by `color`.
    pub fn captures(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black_captures,
            Color::White => self.white_captures,
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    // -------------------------------------------------------------------------
    // Legality
    // -------------------------------------------------------------------------

    /// Play the current player's stone at `pt` on a scratch grid.
    ///
    /// Returns the resulting grid and the number of stones captured.
    fn simulate(&self, pt: Point) -> std::result::Result<(Grid, u32), MoveError> {
        if self.game_over {
            return Err(MoveError::GameOver);
        }
        match self.grid.get(pt) {
            None => return Err(MoveError::OutOfBounds),
            Some(Cell::Empty) => {}
            Some(_) => return Err(MoveError::Occupied),
        }

        let mut grid = self.grid.clone();
        grid.set(pt, self.current.into());
        let enemy = Cell::from(self.current.opponent());

        let mut captured = 0u32;
        for n in self.grid.neighbors(pt) {
            if grid[n] != enemy {
                continue;
            }
            let group = connected_group(&grid, n);
            if !has_liberty(&group, &grid) {
                captured += group.len() as u32;
                for stone in group {
                    grid.set(stone, Cell::Empty);
                }
            }
        }

        if captured > 0 && self.history.last() == Some(&grid) {
            return Err(MoveError::Ko);
        }
        if !has_liberty(&connected_group(&grid, pt), &grid) {
            return Err(MoveError::Suicide);
        }
        Ok((grid, captured))
    }

    /// Why placing at `pt` would fail, if it would.
    pub fn check_place(&self, pt: Point) -> std::result::Result<(), MoveError> {
        self.simulate(pt).map(|_| ())
    }

    /// True iff the current player may place a stone at `pt`.
    pub fn can_place(&self, pt: Point) -> bool {
        self.check_place(pt).is_ok()
    }

    /// True iff placing at `pt` would recreate the previous grid.
    pub fn is_ko_violation(&self, pt: Point) -> bool {
        self.check_place(pt) == Err(MoveError::Ko)
    }

    /// Every point the current player may place on, in row-major order.
    ///
    /// Callers that need a different order shuffle the result themselves.
    pub fn legal_moves(&self) -> Vec<Point> {
        if self.game_over {
            return Vec::new();
        }
        self.grid
            .points()
            .filter(|&pt| self.grid[pt].is_empty() && self.can_place(pt))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Place a stone for the current player, reporting why it failed.
    ///
    /// On failure nothing changes.
    pub fn try_place(&mut self, pt: Point) -> std::result::Result<(), MoveError> {
        let (grid, captured) = self.simulate(pt).inspect_err(|err| {
            trace!(?pt, player = %self.current, %err, "placement rejected");
        })?;

        let previous = std::mem::replace(&mut self.grid, grid);
        self.history.push(previous);
        match self.current {
            Color::Black => self.black_captures += captured,
            Color::White => self.white_captures += captured,
        }
        self.current = self.current.opponent();
        self.consecutive_passes = 0;
        Ok(())
    }

    /// Place a stone for the current player. Returns `false` (and changes
    /// nothing) if the placement is illegal.
    pub fn place(&mut self, pt: Point) -> bool {
        self.try_place(pt).is_ok()
    }

    /// Apply a [`Move`]. A pass always succeeds unless the game is over.
    pub fn play(&mut self, mv: Move) -> bool {
        match mv {
            Move::Place(pt) => self.place(pt),
            Move::Pass if self.game_over => false,
            Move::Pass => {
                self.pass_turn();
                true
            }
        }
    }

    /// Pass the turn. The second consecutive pass ends the game and removes
    /// dead groups.
    pub fn pass_turn(&mut self) {
        if self.game_over {
            return;
        }
        self.history.push(self.grid.clone());
        self.consecutive_passes += 1;
        if self.consecutive_passes >= 2 {
            self.game_over = true;
            self.remove_dead_groups();
            debug!(
                black_captures = self.black_captures,
                white_captures = self.white_captures,
                "game over after two passes"
            );
        }
        self.current = self.current.opponent();
    }

    /// Take back the last placement or pass. Capture counters are kept.
    ///
    /// Does nothing once the game is over or when there is no history.
    pub fn undo(&mut self) {
        if self.game_over {
            return;
        }
        let Some(previous) = self.history.pop() else {
            return;
        };
        debug_assert_eq!(previous.size(), self.grid.size());
        self.grid = previous;
        self.current = self.current.opponent();
        self.consecutive_passes = self.consecutive_passes.saturating_sub(1);
    }

    /// Back to an empty board with Black to move.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.history.clear();
        self.current = Color::Black;
        self.consecutive_passes = 0;
        self.game_over = false;
        self.black_captures = 0;
        self.white_captures = 0;
    }

    /// Copy used by search: the same position, with only the last history
    /// entry kept (all the ko rule needs). Undo on the copy goes back one ply.
    pub fn fork(&self) -> Self {
        let start = self.history.len().saturating_sub(1);
        Self {
            grid: self.grid.clone(),
            history: self.history[start..].to_vec(),
            ..*self
        }
    }

    fn remove_dead_groups(&mut self) {
        let mut visited = Visited::new(self.size());
        for pt in self.grid.points() {
            let Some(color) = self.grid[pt].color() else {
                continue;
            };
            if visited.contains(pt) {
                continue;
            }
            let group = connected_group(&self.grid, pt);
            for &stone in &group {
                visited.insert(stone);
            }
            if is_alive(&group, &self.grid, self.rules.life_rule) {
                continue;
            }
            debug!(?pt, %color, stones = group.len(), "removing dead group");
            match color {
                Color::Black => self.white_captures += group.len() as u32,
                Color::White => self.black_captures += group.len() as u32,
            }
            for stone in group {
                self.grid.set(stone, Cell::Empty);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Scoring
    // -------------------------------------------------------------------------

    /// Empty regions bordered by exactly one color.
    pub fn territory(&self) -> Territory {
        let mut visited = Visited::new(self.size());
        let mut territory = Territory::default();
        for pt in self.grid.points() {
            let region = empty_region(&self.grid, pt, &mut visited);
            if region.is_empty() {
                continue;
            }
            if !self.rules.edge_territory && region.iter().any(|&p| self.grid.is_edge(p)) {
                continue;
            }
            match surrounding_colors(&region, &self.grid).sole() {
                Some(Color::Black) => territory.black.extend(region),
                Some(Color::White) => territory.white.extend(region),
                None => {}
            }
        }
        territory
    }

    /// Captures plus territory for each side, komi included.
    pub fn score(&self) -> Score {
        let territory = self.territory();
        Score::tally(
            self.black_captures,
            territory.black.len(),
            self.white_captures,
            territory.white.len(),
            self.rules.komi,
        )
    }

    pub fn winner(&self) -> Winner {
        if !self.game_over {
            return Winner::InProgress;
        }
        self.score().outcome()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for c in 0..self.size() {
            write!(f, " {c:>2}")?;
        }
        writeln!(f)?;
        for (r, row) in self.grid.to_string().lines().enumerate() {
            let cells: Vec<&str> = row.split(' ').collect();
            write!(f, "{r:>2}")?;
            for cell in cells {
                write!(f, " {cell:>2}")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "Black captures: {} | White captures: {}",
            self.black_captures, self.white_captures
        )
    }
}

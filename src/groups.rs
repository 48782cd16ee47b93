//! Flood-fill primitives over a grid snapshot.
//!
//! Everything here is a pure function of a [`Grid`]: connected groups,
//! liberties, empty regions and the eye/life heuristics used for scoring.
//! All fills use an explicit stack, so board size never threatens the call
//! stack.

use crate::board::{Cell, Color, Grid, Point};
use crate::constants::BIG_EYE_SIZE;

/// A maximal set of orthogonally connected points of one kind, in fill order.
pub type Group = Vec<Point>;

/// Rule deciding whether a group survives the end of the game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LifeRule {
    /// Any eye keeps the group alive.
    OneEye,
    /// Two eyes, or a single eye of at least [`BIG_EYE_SIZE`] points.
    #[default]
    TwoEyes,
}

/// Points already claimed by an earlier fill.
#[derive(Clone, Debug)]
pub struct Visited {
    size: usize,
    marks: Vec<bool>,
}

impl Visited {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            marks: vec![false; size * size],
        }
    }

    #[inline]
    pub fn contains(&self, (row, col): Point) -> bool {
        self.marks[row * self.size + col]
    }

    /// Mark `pt`; returns `false` if it was already marked.
    #[inline]
    pub fn insert(&mut self, (row, col): Point) -> bool {
        let mark = &mut self.marks[row * self.size + col];
        !std::mem::replace(mark, true)
    }
}

/// Stone colors found next to a region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Border {
    pub black: bool,
    pub white: bool,
}

impl Border {
    /// The only bordering color, if exactly one color borders the region.
    pub fn sole(self) -> Option<Color> {
        match (self.black, self.white) {
            (true, false) => Some(Color::Black),
            (false, true) => Some(Color::White),
            _ => None,
        }
    }

    fn add(&mut self, cell: Cell) {
        match cell {
            Cell::Black => self.black = true,
            Cell::White => self.white = true,
            Cell::Empty => {}
        }
    }
}

/// Flood fill over `grid` starting at `start`, following cells equal to
/// `grid[start]` and skipping anything already in `visited`.
fn fill(grid: &Grid, start: Point, visited: &mut Visited) -> Group {
    let kind = grid[start];
    let mut stack = vec![start];
    let mut group = Vec::new();

    while let Some(pt) = stack.pop() {
        if !visited.insert(pt) {
            continue;
        }
        group.push(pt);
        for n in grid.neighbors(pt) {
            if grid[n] == kind && !visited.contains(n) {
                stack.push(n);
            }
        }
    }
    group
}

/// The same-colored group containing `pt`.
///
/// Empty for an off-board or empty point.
pub fn connected_group(grid: &Grid, pt: Point) -> Group {
    match grid.get(pt) {
        Some(cell) if !cell.is_empty() => fill(grid, pt, &mut Visited::new(grid.size())),
        _ => Vec::new(),
    }
}

/// True iff any stone of `group` touches an empty point.
pub fn has_liberty(group: &[Point], grid: &Grid) -> bool {
    group
        .iter()
        .any(|&pt| grid.neighbors(pt).any(|n| grid[n].is_empty()))
}

/// Distinct empty points adjacent to `group`.
pub fn liberties(group: &[Point], grid: &Grid) -> Vec<Point> {
    let mut seen = Visited::new(grid.size());
    let mut libs = Vec::new();
    for &pt in group {
        for n in grid.neighbors(pt) {
            if grid[n].is_empty() && seen.insert(n) {
                libs.push(n);
            }
        }
    }
    libs
}

/// The empty region containing `pt`, marking every point of it in `visited`.
///
/// Empty if `pt` is off-board, occupied, or already visited.
pub fn empty_region(grid: &Grid, pt: Point, visited: &mut Visited) -> Group {
    match grid.get(pt) {
        Some(Cell::Empty) if !visited.contains(pt) => fill(grid, pt, visited),
        _ => Vec::new(),
    }
}

/// Colors of the stones bordering `region`.
pub fn surrounding_colors(region: &[Point], grid: &Grid) -> Border {
    let mut border = Border::default();
    for &pt in region {
        for n in grid.neighbors(pt) {
            border.add(grid[n]);
        }
    }
    border
}

/// Empty regions touching `group` that are bordered only by the group's color.
pub fn eyes(group: &[Point], grid: &Grid) -> Vec<Group> {
    let Some(color) = group.first().and_then(|&pt| grid[pt].color()) else {
        return Vec::new();
    };

    let mut visited = Visited::new(grid.size());
    let mut found = Vec::new();
    for &pt in group {
        for n in grid.neighbors(pt) {
            let region = empty_region(grid, n, &mut visited);
            if !region.is_empty() && surrounding_colors(&region, grid).sole() == Some(color) {
                found.push(region);
            }
        }
    }
    found
}

/// Whether `group` counts as alive under `rule`.
pub fn is_alive(group: &[Point], grid: &Grid, rule: LifeRule) -> bool {
    let eyes = eyes(group, grid);
    match rule {
        LifeRule::OneEye => !eyes.is_empty(),
        LifeRule::TwoEyes => eyes.len() >= 2 || eyes.iter().any(|eye| eye.len() >= BIG_EYE_SIZE),
    }
}

/// Every stone group on the board, scanned in row-major order of their first stone.
pub fn all_groups(grid: &Grid) -> Vec<Group> {
    let mut visited = Visited::new(grid.size());
    let mut groups = Vec::new();
    for pt in grid.points() {
        if !grid[pt].is_empty() && !visited.contains(pt) {
            groups.push(fill(grid, pt, &mut visited));
        }
    }
    groups
}

//! Stone colors, cells and the square grid they live on.

use std::fmt;
use std::ops::Index;

use crate::constants::{DIRECTIONS, MAX_SIZE, MIN_SIZE};
use crate::error::{Error, Result};

/// A player color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => f.write_str("Black"),
            Color::White => f.write_str("White"),
        }
    }
}

/// Content of a single board point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// The stone color, or `None` for an empty point.
    #[inline]
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Color::Black),
            Cell::White => Some(Color::White),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Occupant code: 0 = empty, 1 = black, 2 = white.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Black => 1,
            Cell::White => 2,
        }
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => 'X',
            Cell::White => 'O',
        }
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Cell::Black,
            Color::White => Cell::White,
        }
    }
}

/// A board point as `(row, col)`, both zero-based.
pub type Point = (usize, usize);

/// Square matrix of cells. The size never changes after construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid. The size is not validated here.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Parse a text diagram: one line per row, `X` black, `O` white, `.` empty.
    ///
    /// Whitespace inside a row and blank lines are ignored, so the `Display`
    /// output of a grid parses back.
    ///
    /// ```
    /// use goban_ai::board::{Cell, Grid};
    ///
    /// let grid = Grid::from_diagram(
    ///     "X . .
    ///      . O .
    ///      . . .",
    /// )
    /// .unwrap();
    /// assert_eq!(grid[(1, 1)], Cell::White);
    /// ```
    pub fn from_diagram(text: &str) -> Result<Grid> {
        let rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        let size = rows.len();
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(Error::InvalidBoardSize { size });
        }

        let mut grid = Grid::new(size);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(Error::InvalidDiagram {
                    message: format!("row {r} has {} points, expected {size}", row.len()),
                });
            }
            for (c, &ch) in row.iter().enumerate() {
                let cell = match ch {
                    '.' | '+' => Cell::Empty,
                    'X' | 'x' | 'B' | 'b' => Cell::Black,
                    'O' | 'o' | 'W' | 'w' => Cell::White,
                    other => {
                        return Err(Error::InvalidDiagram {
                            message: format!("unexpected '{other}' at row {r} col {c}"),
                        });
                    }
                };
                grid.set((r, c), cell);
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, (row, col): Point) -> usize {
        row * self.size + col
    }

    #[inline]
    pub fn in_bounds(&self, (row, col): Point) -> bool {
        row < self.size && col < self.size
    }

    /// The cell at `pt`, or `None` when `pt` is off the board.
    pub fn get(&self, pt: Point) -> Option<Cell> {
        if !self.in_bounds(pt) {
            return None;
        }
        Some(self.cells[self.idx(pt)])
    }

    pub fn set(&mut self, pt: Point, cell: Cell) {
        let i = self.idx(pt);
        self.cells[i] = cell;
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Rows as slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.size)
    }

    /// All points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let size = self.size;
        (0..size).flat_map(move |r| (0..size).map(move |c| (r, c)))
    }

    /// On-board orthogonal neighbors of `pt`.
    pub fn neighbors(&self, (row, col): Point) -> impl Iterator<Item = Point> + use<> {
        let size = self.size;
        DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;
            (r < size && c < size).then_some((r, c))
        })
    }

    pub fn is_edge(&self, (row, col): Point) -> bool {
        row == 0 || col == 0 || row + 1 == self.size || col + 1 == self.size
    }

    pub fn is_corner(&self, (row, col): Point) -> bool {
        (row == 0 || row + 1 == self.size) && (col == 0 || col + 1 == self.size)
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }
}

impl Index<Point> for Grid {
    type Output = Cell;

    fn index(&self, pt: Point) -> &Cell {
        &self.cells[self.idx(pt)]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

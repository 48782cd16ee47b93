//! Static position evaluation for the minimax search.
//!
//! The value is always from the point of view of the side to move and sums
//! the score lead with per-group terms (liberties, placement, connectivity,
//! threats against enemy groups, and size).

use crate::board::{Grid, Point};
use crate::constants::{
    CENTER_VALUE, CONNECTIVITY_WEIGHT, CORNER_VALUE, EDGE_VALUE, GROUP_SIZE_WEIGHT,
    LIBERTY_WEIGHT, POSITION_WEIGHT, THREAT_BONUS, THREAT_LIBERTIES,
};
use crate::groups::{all_groups, liberties};
use crate::position::BoardState;

/// Corner > edge > center.
pub fn positional_value(grid: &Grid, pt: Point) -> f64 {
    if grid.is_corner(pt) {
        CORNER_VALUE
    } else if grid.is_edge(pt) {
        EDGE_VALUE
    } else {
        CENTER_VALUE
    }
}

/// Terms of an evaluation, each already weighted and signed for the side to move.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Breakdown {
    pub score: f64,
    pub liberties: f64,
    pub position: f64,
    pub connectivity: f64,
    pub threat: f64,
    pub group_size: f64,
}

impl Breakdown {
    pub fn total(&self) -> f64 {
        self.score + self.liberties + self.position + self.connectivity + self.threat + self.group_size
    }
}

pub fn breakdown(board: &BoardState) -> Breakdown {
    let me = board.current_player();
    let grid = board.grid();
    let mut terms = Breakdown {
        score: board.score().lead(me),
        ..Breakdown::default()
    };

    for group in all_groups(grid) {
        let Some(color) = grid[group[0]].color() else {
            continue;
        };
        let sign = if color == me { 1.0 } else { -1.0 };
        let libs = liberties(&group, grid).len();

        terms.liberties += sign * LIBERTY_WEIGHT * libs as f64;
        terms.position += sign
            * POSITION_WEIGHT
            * group.iter().map(|&pt| positional_value(grid, pt)).sum::<f64>();
        let contacts: usize = group
            .iter()
            .map(|&pt| grid.neighbors(pt).filter(|&n| grid[n] == grid[pt]).count())
            .sum();
        terms.connectivity += sign * CONNECTIVITY_WEIGHT * contacts as f64;
        if color != me && libs <= THREAT_LIBERTIES {
            terms.threat += THREAT_BONUS;
        }
        terms.group_size += sign * GROUP_SIZE_WEIGHT * group.len() as f64;
    }
    terms
}

/// Evaluation of `board` for the side to move.
pub fn evaluate(board: &BoardState) -> f64 {
    breakdown(board).total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;
    use crate::position::Rules;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_positional_values() {
        let grid = Grid::new(9);
        assert_eq!(positional_value(&grid, (0, 0)), CORNER_VALUE);
        assert_eq!(positional_value(&grid, (0, 4)), EDGE_VALUE);
        assert_eq!(positional_value(&grid, (4, 4)), CENTER_VALUE);
    }

    #[test]
    fn test_empty_board_is_komi_down_for_black() {
        let board = BoardState::new(9).unwrap();
        assert!(close(evaluate(&board), -6.5));
    }

    #[test]
    fn test_single_stone_terms() {
        let mut board = BoardState::new(9).unwrap();
        board.place((4, 4));
        // White to move, Black owns the whole board as territory.
        let terms = breakdown(&board);
        assert!(close(terms.score, 6.5 - 80.0));
        assert!(close(terms.liberties, -2.0));
        assert!(close(terms.position, -0.3));
        assert!(close(terms.connectivity, 0.0));
        assert!(close(terms.threat, 0.0));
        assert!(close(terms.group_size, -0.2));
        assert!(close(terms.total(), -76.0));
    }

    #[test]
    fn test_threat_bonus_for_enemy_in_atari() {
        let grid = Grid::from_diagram(
            ". X O .
             . . X .
             . . . .
             . . . .",
        )
        .unwrap();
        let board = BoardState::from_grid(grid, Color::Black, Rules::default()).unwrap();
        let terms = breakdown(&board);
        assert!(close(terms.threat, THREAT_BONUS));
    }

    #[test]
    fn test_connectivity_counts_each_contact_from_both_sides() {
        let grid = Grid::from_diagram(
            ". . .
             X X .
             . . .",
        )
        .unwrap();
        let board = BoardState::from_grid(grid, Color::Black, Rules::default()).unwrap();
        assert!(close(breakdown(&board).connectivity, 2.0 * CONNECTIVITY_WEIGHT));
    }
}

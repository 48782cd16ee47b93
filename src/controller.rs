//! Turn sequencing between humans and engines.

use tracing::debug;

use crate::board::{Color, Point};
use crate::engine::SearchEngine;
use crate::position::{BoardState, Move, MoveError, Score, Winner};

/// Who plays a color.
pub enum Player {
    Human,
    Ai(Box<dyn SearchEngine>),
}

impl Player {
    pub fn is_ai(&self) -> bool {
        matches!(self, Player::Ai(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Player::Human => "human",
            Player::Ai(engine) => engine.name(),
        }
    }
}

/// A game with a player assigned to each color.
pub struct GameController {
    board: BoardState,
    black: Player,
    white: Player,
}

impl GameController {
    pub fn new(board: BoardState, black: Player, white: Player) -> Self {
        Self {
            board,
            black,
            white,
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn player(&self, color: Color) -> &Player {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    /// True when the side to move is an engine and the game is still on.
    pub fn is_ai_turn(&self) -> bool {
        !self.board.is_game_over() && self.player(self.board.current_player()).is_ai()
    }

    /// Place a stone for a human player.
    pub fn make_move(&mut self, pt: Point) -> Result<(), MoveError> {
        if self.is_ai_turn() {
            return Err(MoveError::NotYourTurn);
        }
        self.board.try_place(pt)
    }

    /// Pass for a human player.
    pub fn pass_turn(&mut self) -> Result<(), MoveError> {
        if self.board.is_game_over() {
            return Err(MoveError::GameOver);
        }
        if self.is_ai_turn() {
            return Err(MoveError::NotYourTurn);
        }
        self.board.pass_turn();
        Ok(())
    }

    /// Take back plies until a human is on turn again. With no human
    /// player this is a single ply. Returns the number of plies undone.
    pub fn undo_to_human(&mut self) -> usize {
        let has_human = !self.black.is_ai() || !self.white.is_ai();
        let mut undone = 0;
        loop {
            let before = self.board.history_len();
            self.board.undo();
            if self.board.history_len() == before {
                break;
            }
            undone += 1;
            if !has_human || !self.player(self.board.current_player()).is_ai() {
                break;
            }
        }
        undone
    }

    pub fn reset(&mut self) {
        self.board.reset();
    }

    pub fn score(&self) -> Score {
        self.board.score()
    }

    pub fn winner(&self) -> Winner {
        self.board.winner()
    }

    /// Let the engine on turn move. A missing or rejected proposal becomes a
    /// pass. Returns `None` if it is not an engine's turn.
    pub fn ai_turn(&mut self) -> Option<Move> {
        if !self.is_ai_turn() {
            return None;
        }
        let color = self.board.current_player();
        let engine = match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        };
        let Player::Ai(engine) = engine else {
            return None;
        };

        let mv = match engine.select_move(&self.board) {
            Some(pt) if self.board.place(pt) => Move::Place(pt),
            proposal => {
                if proposal.is_some() {
                    debug!(?proposal, %color, "engine proposed an illegal move, passing");
                }
                self.board.pass_turn();
                Move::Pass
            }
        };
        debug!(%color, engine = engine.name(), %mv, "engine moved");
        Some(mv)
    }

    /// Let engines play until a human is on turn, the game ends, or
    /// `max_moves` engine moves have been made. Returns the moves played.
    pub fn run_ai(&mut self, max_moves: usize) -> Vec<(Color, Move)> {
        let mut played = Vec::new();
        while played.len() < max_moves {
            let color = self.board.current_player();
            match self.ai_turn() {
                Some(mv) => played.push((color, mv)),
                None => break,
            }
        }
        played
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{build, EngineConfig, Variant};

    fn ai(variant: Variant, seed: u64) -> Player {
        let config = EngineConfig::new(variant)
            .with_seed(seed)
            .with_depth(1)
            .with_simulations(4);
        Player::Ai(build(&config).unwrap())
    }

    #[test]
    fn test_human_turn_is_not_played_by_ai() {
        let board = BoardState::new(5).unwrap();
        let mut game = GameController::new(board, Player::Human, ai(Variant::Random, 1));
        assert!(!game.is_ai_turn());
        assert_eq!(game.ai_turn(), None);

        game.make_move((2, 2)).unwrap();
        assert!(game.is_ai_turn());
        assert!(matches!(game.ai_turn(), Some(Move::Place(_))));
        assert_eq!(game.board().current_player(), Color::Black);
    }

    #[test]
    fn test_make_move_reports_reason() {
        let board = BoardState::new(5).unwrap();
        let mut game = GameController::new(board, Player::Human, Player::Human);
        game.make_move((0, 0)).unwrap();
        assert_eq!(game.make_move((0, 0)), Err(MoveError::Occupied));
    }

    #[test]
    fn test_human_cannot_move_for_engine() {
        let mut board = BoardState::new(5).unwrap();
        board.place((2, 2));
        let mut game = GameController::new(board, Player::Human, ai(Variant::Random, 6));
        assert_eq!(game.make_move((0, 0)), Err(MoveError::NotYourTurn));
        assert_eq!(game.pass_turn(), Err(MoveError::NotYourTurn));
        assert_eq!(game.board().cell((0, 0)), Some(crate::board::Cell::Empty));
        assert_eq!(game.board().current_player(), Color::White);
    }

    #[test]
    fn test_undo_to_human_skips_engine_reply() {
        let board = BoardState::new(5).unwrap();
        let mut game = GameController::new(board, Player::Human, ai(Variant::Random, 7));
        game.make_move((2, 2)).unwrap();
        game.run_ai(4);
        assert_eq!(game.board().history_len(), 2);

        assert_eq!(game.undo_to_human(), 2);
        assert_eq!(game.board().history_len(), 0);
        assert_eq!(game.board().current_player(), Color::Black);
        assert!(game.make_move((0, 0)).is_ok());
    }

    #[test]
    fn test_undo_to_human_between_humans_is_one_ply() {
        let board = BoardState::new(5).unwrap();
        let mut game = GameController::new(board, Player::Human, Player::Human);
        game.make_move((2, 2)).unwrap();
        game.make_move((1, 1)).unwrap();
        assert_eq!(game.undo_to_human(), 1);
        assert_eq!(game.board().current_player(), Color::White);
        assert_eq!(game.undo_to_human(), 1);
        assert_eq!(game.undo_to_human(), 0);
    }

    #[test]
    fn test_selfplay_alternates_colors() {
        let board = BoardState::new(3).unwrap();
        let mut game = GameController::new(board, ai(Variant::Random, 3), ai(Variant::Mcts, 4));
        let played = game.run_ai(12);
        assert!(played.len() == 12 || game.is_game_over());
        for (i, (color, _)) in played.iter().enumerate() {
            let expected = if i % 2 == 0 { Color::Black } else { Color::White };
            assert_eq!(*color, expected);
        }
    }

    #[test]
    fn test_run_ai_stops_at_human() {
        let board = BoardState::new(5).unwrap();
        let mut game = GameController::new(board, ai(Variant::Minimax, 2), Player::Human);
        let played = game.run_ai(10);
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].0, Color::Black);
        assert_eq!(game.player(Color::White).label(), "human");
    }
}

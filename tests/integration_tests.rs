//! Integration tests for goban-ai
//!
//! Full games played through the public API: rules, scoring, engines and the
//! text console.

use std::time::Duration;

use fastrand::Rng;
use goban_ai::board::{Cell, Color, Grid};
use goban_ai::console::Console;
use goban_ai::controller::{GameController, Player};
use goban_ai::engine::{EngineConfig, Variant, build};
use goban_ai::mcts::MctsEngine;
use goban_ai::minimax::MinimaxEngine;
use goban_ai::position::{BoardState, Move, MoveError, Rules, Winner};
use goban_ai::{Error, eval};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// Play a sequence of placements, alternating colors from Black.
fn setup_position(moves: &[(usize, usize)]) -> BoardState {
    let mut board = BoardState::new(9).unwrap();
    for &pt in moves {
        assert!(board.place(pt), "setup move {pt:?} was rejected");
    }
    board
}

/// Position where White has just been captured at (4,4) by Black at (4,5).
fn ko_position() -> BoardState {
    setup_position(&[
        (3, 4),
        (3, 5),
        (4, 3),
        (4, 6),
        (5, 4),
        (5, 5),
        (0, 0),
        (4, 4),
        (4, 5),
    ])
}

// =============================================================================
// Placement legality
// =============================================================================

#[test]
fn test_occupied_point_leaves_board_unchanged() {
    let mut board = setup_position(&[(4, 4)]);
    let before = board.grid().clone();
    assert_eq!(board.try_place((4, 4)), Err(MoveError::Occupied));
    assert_eq!(board.grid(), &before);
    assert_eq!(board.current_player(), Color::White);
}

#[test]
fn test_pure_suicide_is_rejected() {
    let mut board = setup_position(&[(0, 1), (8, 8), (1, 0)]);
    assert!(!board.can_place((0, 0)));
    assert_eq!(board.try_place((0, 0)), Err(MoveError::Suicide));
    assert_eq!(board.cell((0, 0)), Some(Cell::Empty));
}

#[test]
fn test_ko_retake_waits_one_move() {
    let mut board = ko_position();
    assert_eq!(board.cell((4, 4)), Some(Cell::Empty));
    assert_eq!(board.captures(Color::Black), 1);

    assert!(board.is_ko_violation((4, 4)));
    assert_eq!(board.try_place((4, 4)), Err(MoveError::Ko));
    assert_eq!(board.current_player(), Color::White);

    assert!(board.place((8, 8)));
    assert!(board.place((8, 0)));
    assert!(board.place((4, 4)));
    assert_eq!(board.cell((4, 5)), Some(Cell::Empty));
    assert_eq!(board.captures(Color::White), 1);
}

#[test]
fn test_capture_end_to_end() {
    let board = setup_position(&[(4, 4), (4, 5), (3, 5), (0, 0), (5, 5), (0, 8), (4, 6)]);
    assert_eq!(board.cell((4, 5)), Some(Cell::Empty));
    assert_eq!(board.captures(Color::Black), 1);
    assert_eq!(board.captures(Color::White), 0);
    assert_eq!(board.current_player(), Color::White);
}

// =============================================================================
// History, passing and scoring
// =============================================================================

#[test]
fn test_undo_restores_grid_player_and_passes() {
    let mut board = setup_position(&[(2, 2)]);
    let grid = board.grid().clone();
    board.pass_turn();
    assert_eq!(board.consecutive_passes(), 1);

    board.undo();
    assert_eq!(board.grid(), &grid);
    assert_eq!(board.current_player(), Color::White);
    assert_eq!(board.consecutive_passes(), 0);

    board.undo();
    assert_eq!(board.grid(), &Grid::new(9));
    assert_eq!(board.current_player(), Color::Black);
}

#[test]
fn test_two_passes_remove_dead_stones() {
    let mut board = setup_position(&[(0, 1), (0, 0)]);
    board.pass_turn();
    assert!(!board.is_game_over());
    board.pass_turn();
    assert!(board.is_game_over());

    assert_eq!(board.cell((0, 0)), Some(Cell::Empty));
    assert_eq!(board.captures(Color::Black), 1);
    let score = board.score();
    assert_eq!(score.black, 81.0);
    assert_eq!(score.white, 6.5);
    assert_eq!(board.winner(), Winner::BlackWinsBy(74.5));
    assert!(!board.place((4, 4)));
}

#[test]
fn test_custom_rules_change_the_count() {
    let rules = Rules {
        komi: 0.5,
        edge_territory: false,
        ..Rules::default()
    };
    let mut board = BoardState::with_rules(5, rules).unwrap();
    board.place((2, 2));
    let score = board.score();
    assert_eq!(score.black, 0.0);
    assert_eq!(score.white, 0.5);
}

#[test]
fn test_unsupported_board_size() {
    assert_eq!(
        BoardState::new(1).unwrap_err(),
        Error::InvalidBoardSize { size: 1 }
    );
    assert!(BoardState::new(20).is_err());
}

// =============================================================================
// Engines
// =============================================================================

#[test]
fn test_mcts_single_simulation_is_seeded() {
    let board = setup_position(&[(4, 4)]);
    let run = || {
        let mut engine = MctsEngine::new(1, 1, None, Rng::with_seed(11)).unwrap();
        engine.search(&board)
    };
    let first = run();
    let second = run();
    assert_eq!(first.simulations, 1);
    assert_eq!(first.children.len(), 1);
    assert_eq!(first.best, second.best);
    let Some(Move::Place(pt)) = first.best else {
        panic!("expected a placement, got {:?}", first.best);
    };
    assert!(board.can_place(pt));
}

#[test]
fn test_mcts_parallel_batches_count_every_simulation() {
    let board = BoardState::new(5).unwrap();
    let mut engine = MctsEngine::new(24, 4, None, Rng::with_seed(2)).unwrap();
    let report = engine.search(&board);
    assert_eq!(report.simulations, 24);
    let visits: u32 = report.children.iter().map(|c| c.visits).sum();
    assert_eq!(visits, 24);
}

#[test]
fn test_minimax_depth_zero_scores_the_root() {
    let board = setup_position(&[(4, 4), (0, 0)]);
    let mut engine = MinimaxEngine::new(0, None, Rng::with_seed(1));
    let report = engine.search(&board);
    assert_eq!(report.best_move, None);
    assert_eq!(report.stats.nodes, 1);
    assert_eq!(report.score, eval::evaluate(&board));
}

#[test]
fn test_engines_only_propose_legal_moves() {
    let board = ko_position();
    for variant in [Variant::Mcts, Variant::Minimax, Variant::Random] {
        let config = EngineConfig::new(variant)
            .with_seed(5)
            .with_depth(1)
            .with_simulations(16)
            .with_time_limit(Duration::from_secs(30));
        let mut engine = build(&config).unwrap();
        if let Some(pt) = engine.select_move(&board) {
            assert!(board.can_place(pt), "{} proposed {pt:?}", engine.name());
            assert_ne!(pt, (4, 4), "{} retook the ko", engine.name());
        }
    }
}

#[test]
fn test_engine_configuration_errors() {
    assert!(matches!(
        EngineConfig::from_tag("gnugo"),
        Err(Error::UnknownVariant { .. })
    ));
    let bad = EngineConfig::new(Variant::Mcts).with_simulations(0);
    assert!(matches!(
        build(&bad),
        Err(Error::InvalidConfiguration { .. })
    ));
}

// =============================================================================
// Controller and console
// =============================================================================

#[test]
fn test_console_session_against_engine() {
    let config = EngineConfig::new(Variant::Random).with_seed(8);
    let game = GameController::new(
        BoardState::new(9).unwrap(),
        Player::Human,
        Player::Ai(build(&config).unwrap()),
    );
    let mut console = Console::new(game);

    let input = b"place 4 4\nplace 4 4\nundo\nshow\nquit\n";
    let mut output = Vec::new();
    console.run(&input[..], &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();

    assert!(text.contains("White plays"));
    assert!(text.contains("? illegal move: point not empty"));
    // Undo took back White's reply and Black's stone.
    let board = console.game().board();
    assert_eq!(board.grid(), &Grid::new(9));
    assert_eq!(board.current_player(), Color::Black);
}

#[test]
fn test_human_cannot_play_for_the_engine() {
    let config = EngineConfig::new(Variant::Random).with_seed(3);
    let mut board = BoardState::new(9).unwrap();
    assert!(board.place((4, 4)));
    let mut game = GameController::new(board, Player::Human, Player::Ai(build(&config).unwrap()));

    assert_eq!(game.make_move((0, 0)), Err(MoveError::NotYourTurn));
    assert!(matches!(game.ai_turn(), Some(Move::Place(_))));
    assert!(game.make_move((0, 0)).is_ok());
    assert_eq!(game.board().cell((0, 0)), Some(Cell::Black));
}

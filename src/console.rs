//! Line-oriented text console for playing a game.
//!
//! Each input line is one command; each reply starts with `=` on success or
//! `?` on failure and ends with a blank line. After every human action the
//! engines on turn (if any) move, and their moves are appended to the reply.
//!
//! ## Supported Commands
//!
//! - `place <row> <col>` (alias `play`) - Place a stone for the side to move
//! - `pass` - Pass the turn
//! - `genmove` - Let the engine on turn play one move
//! - `undo` - Take back moves until a human is on turn
//! - `reset` - Start over on an empty board
//! - `show` - Print the board
//! - `score` - Print the current score
//! - `winner` - Print the result
//! - `list_commands` - List all supported commands
//! - `quit` - Exit

use std::io::{self, BufRead, Write};

use crate::controller::GameController;
use crate::position::Move;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "genmove",
    "list_commands",
    "pass",
    "place",
    "play",
    "quit",
    "reset",
    "score",
    "show",
    "undo",
    "winner",
];

/// Engine moves allowed per board point in reply to one command.
const AI_MOVES_PER_POINT: usize = 4;

pub struct Console {
    game: GameController,
}

impl Console {
    pub fn new(game: GameController) -> Self {
        Self { game }
    }

    pub fn game(&self) -> &GameController {
        &self.game
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        // Engines may own the first move.
        let opening = self.advance_ai();
        if !opening.is_empty() {
            writeln!(output, "= {}\n", opening.join("\n"))?;
        }

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            writeln!(output, "{prefix} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Execute a command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "quit" => (true, String::new()),

            "place" | "play" => {
                let [row, col] = args else {
                    return (false, "usage: place <row> <col>".to_string());
                };
                let (Ok(row), Ok(col)) = (row.parse::<usize>(), col.parse::<usize>()) else {
                    return (false, "row and col must be numbers".to_string());
                };
                if let Err(err) = self.game.make_move((row, col)) {
                    return (false, err.to_string());
                }
                (true, self.after_human())
            }

            "pass" => {
                if let Err(err) = self.game.pass_turn() {
                    return (false, err.to_string());
                }
                (true, self.after_human())
            }

            "genmove" => match self.game.ai_turn() {
                Some(mv) => {
                    let mut reply = mv.to_string();
                    if self.game.is_game_over() {
                        reply.push('\n');
                        reply.push_str(&self.game.winner().to_string());
                    }
                    (true, reply)
                }
                None => (false, "no engine on turn".to_string()),
            },

            "undo" => {
                if self.game.undo_to_human() == 0 {
                    return (false, "nothing to undo".to_string());
                }
                (true, self.after_human())
            }

            "reset" => {
                self.game.reset();
                (true, self.after_human())
            }

            "show" => (true, format!("\n{}", self.game.board())),

            "score" => {
                let score = self.game.score();
                (true, format!("Black: {} | White: {}", score.black, score.white))
            }

            "winner" => (true, self.game.winner().to_string()),

            _ => (false, format!("unknown command: {command}")),
        }
    }

    /// Let engines reply, then report the result if the game ended.
    fn after_human(&mut self) -> String {
        let mut lines = self.advance_ai();
        if self.game.is_game_over() {
            lines.push(self.game.winner().to_string());
        }
        lines.join("\n")
    }

    fn advance_ai(&mut self) -> Vec<String> {
        let size = self.game.board().size();
        self.game
            .run_ai(AI_MOVES_PER_POINT * size * size)
            .into_iter()
            .map(|(color, mv)| match mv {
                Move::Place((row, col)) => format!("{color} plays {row} {col}"),
                Move::Pass => format!("{color} passes"),
            })
            .collect()
    }
}

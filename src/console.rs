use rustyline::config::Configurer;
use rustyline::Editor;
use tracing::warn;

use crate::board::{Board, BoardResult};
use crate::error::SanError;
use crate::piece::Color;
use crate::player::Player;
use crate::r#move::Move;
use crate::san;

/// Terminal game between two players. Humans type moves in SAN or long
/// algebraic notation, `u` takes the last move back.
pub struct Console {
    board: Board,
    // Indexed by `Color as usize`
    players: [Player; 2],
    editor: Editor<()>,
}

enum ConsoleOkCode {
    Played,
    Undone,
    Help,
    ShouldQuit,
}

enum ConsoleErrCode {
    NoCommand,
    BadMove(SanError),
}

impl Console {
    pub fn new(board: Board, white: Player, black: Player) -> Console {
        let mut editor = Editor::<()>::new();
        editor.set_auto_add_history(true);
        Console {
            board,
            players: [black, white],
            editor,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn run(&mut self) {
        println!(
            "{} (white) vs {} (black)\n",
            self.players[Color::White as usize],
            self.players[Color::Black as usize]
        );
        println!("{}", self.board);

        while !self.board.result().is_over() {
            let side = self.board.side_to_move();
            if self.players[side as usize].is_human() {
                let prompt = format!("{} {}> ", self.board.move_counter(), color_name(side));
                let Ok(line) = self.editor.readline(&prompt) else {
                    return;
                };
                match self.handle_command(&line) {
                    Ok(ConsoleOkCode::ShouldQuit) => return,
                    Ok(ConsoleOkCode::Help) => print_help(),
                    Ok(ConsoleOkCode::Played) | Ok(ConsoleOkCode::Undone) => println!("{}", self.board),
                    Err(ConsoleErrCode::BadMove(err)) => eprintln!("{}", err),
                    Err(ConsoleErrCode::NoCommand) => (),
                }
            } else {
                let Some(mv) = self.players[side as usize].try_get_move(&mut self.board) else {
                    break;
                };
                self.play(mv);
                println!("{}", self.board);
            }
        }

        println!("{}", describe_result(&self.board));
    }

    fn handle_command(&mut self, line: &str) -> Result<ConsoleOkCode, ConsoleErrCode> {
        let command = line.trim();
        match command {
            "" => Err(ConsoleErrCode::NoCommand),
            "quit" | "exit" => Ok(ConsoleOkCode::ShouldQuit),
            "help" | "?" => Ok(ConsoleOkCode::Help),
            "u" | "undo" => {
                self.undo();
                Ok(ConsoleOkCode::Undone)
            }
            text => match san::parse_move(&self.board, text) {
                Ok(mv) => {
                    self.play(mv);
                    Ok(ConsoleOkCode::Played)
                }
                Err(err) => {
                    warn!(input = text, %err, "could not resolve move");
                    Err(ConsoleErrCode::BadMove(err))
                }
            },
        }
    }

    fn play(&mut self, mv: Move) {
        let number = self.board.move_counter();
        let dots = if self.board.side_to_move() == Color::White { "." } else { "..." };
        let notation = san::to_san(&mut self.board, mv);
        if self.board.move_piece(mv).is_ok() {
            println!("{}{} {}", number, dots, notation);
        }
    }

    // Takes moves back until a human is to move again, so a computer
    // opponent does not replay its answer straight away
    fn undo(&mut self) {
        self.board.undo_move();
        let side = self.board.side_to_move();
        if !self.players[side as usize].is_human() && self.players[side.opposite() as usize].is_human() {
            self.board.undo_move();
        }
    }
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

fn describe_result(board: &Board) -> String {
    match board.result() {
        BoardResult::Checkmate => format!(
            "Checkmate, {} wins",
            color_name(board.side_to_move().opposite())
        ),
        BoardResult::StaleMate => String::from("Stalemate"),
        BoardResult::ThreefoldRepetition => String::from("Draw by threefold repetition"),
        BoardResult::Playing => String::from("Game left unfinished"),
    }
}

fn print_help() {
    println!("Commands:");
    println!("    <move>     play a move, in SAN (Nf3, exd5, O-O, e8=Q) or long algebraic (g1f3)");
    println!("    u, undo    take back the last move");
    println!("    quit       leave the game");
}

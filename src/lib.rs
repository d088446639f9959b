use crate::board::Board;

pub mod bitboard;
pub mod board;
pub mod castling;
pub mod console;
pub mod error;
pub mod evaluation;
pub mod history;
pub mod move_generator;
pub mod movelist;
pub mod piece;
pub mod player;
pub mod r#move;
pub mod san;
pub mod search;
pub mod square;
pub mod transposition_table;
pub mod zob_hash;

pub use board::{BoardResult, START_FEN};
pub use error::{FenError, MoveError, SanError};
pub use player::Player;
pub use r#move::Move;
pub use search::{Engine, SearchOptions, SearchReport, StopHandle};

/// Counts the leaves of the legal move tree `depth` plies deep.
pub fn perft(board: &mut Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    if depth == 1 {
        return board.legal_moves().len() as u64;
    }
    let moves: Vec<_> = board.legal_moves().iter().copied().collect();
    let mut nodes = 0;
    for mv in moves {
        board.make(mv);
        nodes += perft(board, depth - 1);
        board.unmake();
    }
    nodes
}

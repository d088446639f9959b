//! Standard algebraic notation, the text players read and type.
//! ```
//! use castellan::board::Board;
//! use castellan::san;
//!
//! let mut board = Board::new();
//! let mv = san::parse_san(&board, "Nf3").unwrap();
//! assert_eq!(san::to_san(&mut board, mv), "Nf3");
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::board::{Board, BoardResult};
use crate::error::SanError;
use crate::piece::PieceType;
use crate::r#move::Move;
use crate::square::{file_char, file_of, parse_square, rank_char, rank_of, square_representation};

fn san_regex() -> &'static Regex {
    static SAN: OnceLock<Regex> = OnceLock::new();
    SAN.get_or_init(|| {
        Regex::new(r"^([KQRBN])?([a-h])?([1-8])?(x)?([a-h][1-8])(?:=?([QRBNqrbn]))?$")
            .expect("SAN pattern compiles")
    })
}

/// Writes a legal move in SAN. The move is played and taken back to find
/// out whether it checks or mates, hence the mutable board.
/// Moves outside the legal set fall back to long algebraic notation.
pub fn to_san(board: &mut Board, mv: Move) -> String {
    let Some(piece) = board.piece_on(mv.from) else {
        return mv.to_string();
    };
    if !board.legal_moves().contains(&mv) {
        return mv.to_string();
    }

    let mut san = String::new();
    if piece.piece_type == PieceType::King && mv.is_two_file_step() {
        san.push_str(if file_of(mv.to) > file_of(mv.from) { "O-O" } else { "O-O-O" });
    } else {
        let capture = board.is_capture(&mv);
        if piece.piece_type == PieceType::Pawn {
            if capture {
                san.push(file_char(file_of(mv.from)));
            }
        } else {
            san.push(piece.piece_type.as_char().to_ascii_uppercase());
            let (needs_file, needs_rank) = disambiguation(board, mv, piece.piece_type);
            if needs_file {
                san.push(file_char(file_of(mv.from)));
            }
            if needs_rank {
                san.push(rank_char(rank_of(mv.from)));
            }
        }
        if capture {
            san.push('x');
        }
        san.push_str(&square_representation(mv.to).unwrap_or_default());
        if let Some(promotion) = mv.promote_to {
            san.push('=');
            san.push(promotion.as_char().to_ascii_uppercase());
        }
    }

    board.make(mv);
    if board.result() == BoardResult::Checkmate {
        san.push('#');
    } else if board.in_check() {
        san.push('+');
    }
    board.unmake();
    san
}

// (needs_file, needs_rank) to tell `mv` apart from moves of twin pieces
fn disambiguation(board: &Board, mv: Move, piece_type: PieceType) -> (bool, bool) {
    let twins: Vec<Move> = board
        .legal_moves()
        .iter()
        .copied()
        .filter(|m| {
            m.to == mv.to
                && m.from != mv.from
                && board.piece_on(m.from).map(|p| p.piece_type) == Some(piece_type)
        })
        .collect();
    if twins.is_empty() {
        return (false, false);
    }

    let same_file = twins.iter().any(|m| file_of(m.from) == file_of(mv.from));
    let same_rank = twins.iter().any(|m| rank_of(m.from) == rank_of(mv.from));
    match (same_file, same_rank) {
        (false, _) => (true, false),
        (true, false) => (false, true),
        (true, true) => (true, true),
    }
}

/// Reads a SAN move and resolves it against the legal moves of the board.
/// Check and mate markers are optional, castling may be written with
/// zeroes.
pub fn parse_san(board: &Board, text: &str) -> Result<Move, SanError> {
    let san = text.trim().trim_end_matches(['+', '#', '!', '?']);
    if san.is_empty() {
        return Err(SanError::Malformed(text.to_string()));
    }

    let castle = match san {
        "O-O" | "0-0" => Some(true),
        "O-O-O" | "0-0-0" => Some(false),
        _ => None,
    };
    if let Some(kingside) = castle {
        let king = board
            .king_square(board.side_to_move())
            .ok_or_else(|| SanError::NoMatch(text.to_string()))?;
        let to = if kingside { king + 2 } else { king.wrapping_sub(2) };
        let mv = Move::new(king, to);
        return if board.legal_moves().contains(&mv) {
            Ok(mv)
        } else {
            Err(SanError::NoMatch(text.to_string()))
        };
    }

    let caps = san_regex()
        .captures(san)
        .ok_or_else(|| SanError::Malformed(text.to_string()))?;
    let piece_type = match caps.get(1) {
        Some(m) => PieceType::from_char(m.as_str().chars().next().unwrap_or('p')),
        None => Some(PieceType::Pawn),
    }
    .ok_or_else(|| SanError::Malformed(text.to_string()))?;
    let from_file = caps.get(2).map(|m| m.as_str().as_bytes()[0] - b'a');
    let from_rank = caps.get(3).map(|m| m.as_str().as_bytes()[0] - b'1');
    let capture = caps.get(4).is_some();
    let to = caps
        .get(5)
        .and_then(|m| parse_square(m.as_str()))
        .ok_or_else(|| SanError::Malformed(text.to_string()))?;
    let promote_to = caps
        .get(6)
        .and_then(|m| m.as_str().chars().next())
        .and_then(PieceType::from_char);

    let mut candidates = board.legal_moves().iter().copied().filter(|m| {
        m.to == to
            && m.promote_to == promote_to
            && board.piece_on(m.from).map(|p| p.piece_type) == Some(piece_type)
            && from_file.map_or(true, |f| file_of(m.from) == f as usize)
            && from_rank.map_or(true, |r| rank_of(m.from) == r as usize)
            && (!capture || board.is_capture(m))
    });

    match (candidates.next(), candidates.next()) {
        (Some(mv), None) => Ok(mv),
        (Some(_), Some(_)) => Err(SanError::Ambiguous(text.to_string())),
        (None, _) => Err(SanError::NoMatch(text.to_string())),
    }
}

/// SAN first, long algebraic (`e2e4`, `e7e8q`) as a fallback. Either way the
/// move has to be legal on the board.
pub fn parse_move(board: &Board, text: &str) -> Result<Move, SanError> {
    match parse_san(board, text) {
        Ok(mv) => Ok(mv),
        Err(err) => match Move::parse(text) {
            Some(mv) if board.legal_moves().contains(&mv) => Ok(mv),
            _ => Err(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn san_of(fen: &str, mv: &str) -> String {
        let mut board = Board::from_fen(fen).unwrap();
        to_san(&mut board, Move::parse(mv).unwrap())
    }

    fn parsed(fen: &str, san: &str) -> Result<Move, SanError> {
        parse_san(&Board::from_fen(fen).unwrap(), san)
    }

    #[test]
    fn opening_moves() {
        let mut board = Board::new();
        assert_eq!(parse_san(&board, "e4"), Ok(Move::new(12, 28)));
        assert_eq!(parse_san(&board, "Nf3"), Ok(Move::new(6, 21)));
        assert_eq!(to_san(&mut board, Move::new(12, 28)), "e4");
        assert_eq!(to_san(&mut board, Move::new(1, 18)), "Nc3");
        assert_eq!(parse_san(&board, "Qh5"), Err(SanError::NoMatch("Qh5".to_string())));
        assert_eq!(parse_san(&board, "Nxf3"), Err(SanError::NoMatch("Nxf3".to_string())));
    }

    #[test]
    fn captures() {
        let fen = "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2";
        assert_eq!(san_of(fen, "e4d5"), "exd5");
        assert_eq!(parsed(fen, "exd5"), Ok(Move::new(28, 35)));

        let en_passant = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1";
        assert_eq!(san_of(en_passant, "e5d6"), "exd6");
        assert_eq!(parsed(en_passant, "exd6"), Ok(Move::new(36, 43)));
    }

    #[test]
    fn castling() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        assert_eq!(san_of(fen, "e1g1"), "O-O");
        assert_eq!(san_of(fen, "e1c1"), "O-O-O");
        assert_eq!(parsed(fen, "O-O"), Ok(Move::new(4, 6)));
        assert_eq!(parsed(fen, "0-0-0"), Ok(Move::new(4, 2)));

        let black = "r3k2r/8/8/8/8/8/8/R3K2R b KQk - 0 1";
        assert_eq!(parsed(black, "O-O"), Ok(Move::new(60, 62)));
        assert!(matches!(parsed(black, "O-O-O"), Err(SanError::NoMatch(_))));
    }

    #[test]
    fn disambiguation() {
        let knights = "4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1";
        assert_eq!(san_of(knights, "b1d2"), "Nbd2");
        assert_eq!(san_of(knights, "f3d2"), "Nfd2");
        assert_eq!(parsed(knights, "Nbd2"), Ok(Move::new(1, 11)));
        assert_eq!(parsed(knights, "Nd2"), Err(SanError::Ambiguous("Nd2".to_string())));

        let rooks = "4k3/8/8/R7/8/8/8/R3K3 w - - 0 1";
        assert_eq!(san_of(rooks, "a1a3"), "R1a3");
        assert_eq!(san_of(rooks, "a5a3"), "R5a3");
        assert_eq!(parsed(rooks, "R5a3"), Ok(Move::new(32, 16)));
    }

    #[test]
    fn promotions() {
        let fen = "8/4P3/8/8/8/8/k7/4K3 w - - 0 1";
        assert_eq!(san_of(fen, "e7e8q"), "e8=Q");
        assert_eq!(parsed(fen, "e8=N"), Ok(Move::new_promotion(52, 60, PieceType::Knight)));
        assert_eq!(parsed(fen, "e8Q"), Ok(Move::new_promotion(52, 60, PieceType::Queen)));
        assert!(matches!(parsed(fen, "e8"), Err(SanError::NoMatch(_))));
    }

    #[test]
    fn check_and_mate_markers() {
        assert_eq!(san_of("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", "a1a8"), "Ra8+");
        assert_eq!(san_of("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "a1a8"), "Ra8#");
        assert_eq!(parsed("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", "Ra8#"), Ok(Move::new(0, 56)));
    }

    #[test]
    fn malformed_text() {
        assert_eq!(parsed(crate::board::START_FEN, "Zz9"), Err(SanError::Malformed("Zz9".to_string())));
        assert_eq!(parsed(crate::board::START_FEN, ""), Err(SanError::Malformed(String::new())));
    }

    #[test]
    fn long_algebraic_fallback() {
        let board = Board::new();
        assert_eq!(parse_move(&board, "g1f3"), Ok(Move::new(6, 21)));
        assert_eq!(parse_move(&board, "d4"), Ok(Move::new(11, 27)));
        assert!(parse_move(&board, "e2e5").is_err());
    }

    #[test]
    fn printing_leaves_the_board_alone() {
        let mut board = Board::new();
        let hash = board.zobrist_hash();
        to_san(&mut board, Move::new(12, 28));
        assert_eq!(board.zobrist_hash(), hash);
        assert_eq!(board.ply(), 0);
    }
}

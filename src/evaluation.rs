use crate::board::Board;
use crate::piece::Color;
use crate::piece::PieceType::{self, King, Pawn};
use crate::square::{vertical_symmetry, Square};

// Piece-square tables are written out by the build script
include!(concat!(env!("OUT_DIR"), "/evaluation_constants.rs"));

pub type Score = i32;

/// Static evaluation of a position, split per color so it can be inspected.
/// `score` is from the side to move's point of view.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Evaluation {
    pub material: [Score; 2],
    pub positional: [Score; 2],
    pub endgame_weight: [f32; 2],
    pub score: Score,
}

impl Evaluation {
    pub const PIECE_TYPE_VALUE: [Score; 6] = [100, 320, 330, 500, 900, 0];
    pub const MATE_SCORE: Score = 1_000_000;
    pub const DRAW_SCORE: Score = 0;
    /// Non-pawn material under which a side is fully in its endgame:
    /// two rooks, a knight and a bishop.
    pub const ENDGAME_MATERIAL_START: Score = 1650;

    pub fn evaluate(board: &Board) -> Evaluation {
        let mut material = [0; 2];
        let mut positional = [0; 2];
        let mut endgame_weight = [0.0; 2];
        for color in [Color::Black, Color::White] {
            let c = color as usize;
            material[c] = Self::material(board, color);
            endgame_weight[c] = Self::endgame_weight(board, color);
            positional[c] = Self::positional(board, color, endgame_weight[c]);
        }

        let white = Color::White as usize;
        let black = Color::Black as usize;
        let balance = material[white] - material[black] + positional[white] - positional[black];
        Evaluation {
            material,
            positional,
            endgame_weight,
            score: balance * board.side_to_move().perspective(),
        }
    }

    /// Sum of piece values for a color, in centipawns
    pub fn material(board: &Board, color: Color) -> Score {
        PieceType::ALL
            .iter()
            .map(|p| board.piece_count(*p, color) as Score * Self::PIECE_TYPE_VALUE[*p as usize])
            .sum()
    }

    /// 0 with a full set of pieces, moving to 1 as pieces other than pawns leave
    /// the board.
    pub fn endgame_weight(board: &Board, color: Color) -> f32 {
        let pawns = board.piece_count(Pawn, color) as Score * Self::PIECE_TYPE_VALUE[Pawn as usize];
        let without_pawns = Self::material(board, color) - pawns;
        1.0 - (without_pawns as f32 / Self::ENDGAME_MATERIAL_START as f32).min(1.0)
    }

    pub fn positional(board: &Board, color: Color, endgame_weight: f32) -> Score {
        let mut value = 0;
        for piece_type in PieceType::ALL {
            for sq in board.piece_bitboard(piece_type, color) {
                let index = Self::table_index(sq, color);
                value += match piece_type {
                    King => {
                        let midgame = KING_MIDGAME_TABLE[index] as f32 * (1.0 - endgame_weight);
                        let endgame = KING_ENDGAME_TABLE[index] as f32 * endgame_weight;
                        (midgame + endgame) as Score
                    }
                    p => PIECE_SQUARE_TABLE[p as usize][index],
                };
            }
        }
        value
    }

    // Tables read like a diagram from white's side, rank 8 first. Black sees the
    // board upside down, which makes its own squares line up without flipping.
    #[inline]
    fn table_index(sq: Square, color: Color) -> usize {
        match color {
            Color::White => vertical_symmetry(sq),
            Color::Black => sq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::START_FEN;

    fn score(fen: &str) -> Score {
        Evaluation::evaluate(&Board::from_fen(fen).unwrap()).score
    }

    #[test]
    fn start_position_is_balanced() {
        let eval = Evaluation::evaluate(&Board::new());
        assert_eq!(eval.score, 0);
        assert_eq!(eval.material, [4000, 4000]);
        assert_eq!(eval.endgame_weight, [0.0, 0.0]);
        assert_eq!(score(&START_FEN.replace(" w ", " b ")), 0);
    }

    #[test]
    fn score_follows_the_side_to_move() {
        let white = score("4k3/8/8/8/8/8/8/3QK3 w - - 0 1");
        let black = score("4k3/8/8/8/8/8/8/3QK3 b - - 0 1");
        assert!(white > 800);
        assert_eq!(white, -black);
    }

    #[test]
    fn mirrored_positions_score_the_same() {
        assert_eq!(
            score("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3"),
            score("rnbqkb1r/pppp1ppp/5n2/4p3/4P3/2N5/PPPP1PPP/R1BQKBNR b KQkq - 2 3"),
        );
    }

    #[test]
    fn endgame_weight_grows_as_pieces_go() {
        let bare = Board::from_fen("4k3/pppp4/8/8/8/8/PPPP4/4K3 w - - 0 1").unwrap();
        assert_eq!(Evaluation::endgame_weight(&bare, Color::White), 1.0);

        let rook = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let weight = Evaluation::endgame_weight(&rook, Color::White);
        assert!(weight > 0.6 && weight < 0.7);

        // A centralised king is worth more once the board is empty
        assert!(score("8/8/8/3k4/8/8/8/3K4 w - - 0 1") > score("8/8/8/3k4/8/8/8/K7 w - - 0 1"));
    }

    #[test]
    fn pawns_prefer_advancing() {
        assert!(score("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1") > score("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"));
        assert!(score("4k3/4p3/8/8/8/8/8/4K3 b - - 0 1") < score("4k3/8/8/4p3/8/8/8/4K3 b - - 0 1"));
    }
}

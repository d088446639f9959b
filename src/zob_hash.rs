use crate::castling::CastlingRights;
use crate::piece::{Color, Piece};
use crate::square::{file_of, Square};
use rand_mt::Mt64;

pub type Hash = u64;

/// Seed of the default key table. Any value works; a fixed one keeps hashes
/// reproducible between runs.
pub const DEFAULT_SEED: u64 = 0x5a0b_1157_c0de_f00d;

/// Random keys XORed together to fingerprint a position.
/// Generated once and shared by every board that should agree on hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZobristKeys {
    pieces: [[Hash; 12]; 64],
    black_to_move: Hash,
    castling: Hash,
    en_passant: Hash,
}

impl ZobristKeys {
    pub fn new(seed: u64) -> ZobristKeys {
        let mut rng = Mt64::new(seed);
        let mut pieces = [[0; 12]; 64];
        for square in pieces.iter_mut() {
            for key in square.iter_mut() {
                *key = rng.next_u64();
            }
        }
        ZobristKeys {
            pieces,
            black_to_move: rng.next_u64(),
            castling: rng.next_u64(),
            en_passant: rng.next_u64(),
        }
    }

    #[inline]
    pub fn piece_square(&self, piece: Piece, sq: Square) -> Hash {
        self.pieces[sq][piece.zobrist_index()]
    }

    #[inline]
    pub fn side_to_move(&self, color: Color) -> Hash {
        match color {
            Color::Black => self.black_to_move,
            Color::White => 0,
        }
    }

    /// A single key mixed with the rights bitmap, distinct for each of the 16 bitmaps.
    #[inline]
    pub fn castling_rights(&self, rights: CastlingRights) -> Hash {
        self.castling.rotate_left(rights.bits() as u32)
    }

    /// The en passant key mixed with the target's file. Callers only pass a
    /// target when a capture on it is actually available.
    #[inline]
    pub fn en_passant(&self, target: Option<Square>) -> Hash {
        match target {
            Some(sq) => self.en_passant.rotate_left(17 + file_of(sq) as u32),
            None => 0,
        }
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceType;
    use std::collections::HashSet;

    #[test]
    fn keys_are_reproducible() {
        assert_eq!(ZobristKeys::new(7), ZobristKeys::new(7));
        assert_ne!(ZobristKeys::new(7), ZobristKeys::new(8));
    }

    #[test]
    fn castling_keys_are_distinct() {
        let keys = ZobristKeys::default();
        let mut seen = HashSet::new();
        for fen in ["-", "K", "Q", "k", "q", "KQ", "Kk", "Kq", "Qk", "Qq", "kq", "KQk", "KQq", "Kkq", "Qkq", "KQkq"] {
            assert!(seen.insert(keys.castling_rights(CastlingRights::from_fen(fen).unwrap())));
        }
    }

    #[test]
    fn piece_keys_depend_on_color_and_square() {
        let keys = ZobristKeys::default();
        let white_pawn = Piece::new(PieceType::Pawn, Color::White);
        let black_pawn = Piece::new(PieceType::Pawn, Color::Black);
        assert_ne!(keys.piece_square(white_pawn, 12), keys.piece_square(black_pawn, 12));
        assert_ne!(keys.piece_square(white_pawn, 12), keys.piece_square(white_pawn, 13));
    }
}

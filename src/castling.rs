use crate::piece::Color;
use crate::piece::Color::{Black, White};
use crate::square::{Square, A1, A8, E1, E8, H1, H8};
use std::fmt::{Display, Formatter};

const WHITE_KINGSIDE: u8 = 0b1000;
const WHITE_QUEENSIDE: u8 = 0b0100;
const BLACK_KINGSIDE: u8 = 0b0010;
const BLACK_QUEENSIDE: u8 = 0b0001;

/// Four castling flags. Rights are only ever removed during a game.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub fn new() -> CastlingRights {
        CastlingRights(0b1111)
    }
    pub fn none() -> CastlingRights {
        CastlingRights(0)
    }

    /// Parses the castling field of a FEN string (`KQkq`, any subset, or `-`).
    pub fn from_fen(s: &str) -> Option<CastlingRights> {
        if s == "-" {
            return Some(Self::none());
        }
        let mut res = Self::none();
        for c in s.chars() {
            res.0 |= match c {
                'K' => WHITE_KINGSIDE,
                'Q' => WHITE_QUEENSIDE,
                'k' => BLACK_KINGSIDE,
                'q' => BLACK_QUEENSIDE,
                _ => return None,
            }
        }
        Some(res)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Returns the (kingside, queenside) rights of a given color
    pub fn get(&self, side: Color) -> (bool, bool) {
        match side {
            White => (self.0 & WHITE_KINGSIDE != 0, self.0 & WHITE_QUEENSIDE != 0),
            Black => (self.0 & BLACK_KINGSIDE != 0, self.0 & BLACK_QUEENSIDE != 0),
        }
    }

    /// Drops whatever right depends on the piece standing on `sq`.
    /// Called for both the origin and the destination of every move,
    /// which covers king moves, rook moves and rooks being captured.
    pub fn touch(&mut self, sq: Square) {
        self.0 &= match sq {
            E1 => !(WHITE_KINGSIDE | WHITE_QUEENSIDE),
            E8 => !(BLACK_KINGSIDE | BLACK_QUEENSIDE),
            H1 => !WHITE_KINGSIDE,
            A1 => !WHITE_QUEENSIDE,
            H8 => !BLACK_KINGSIDE,
            A8 => !BLACK_QUEENSIDE,
            _ => 0b1111,
        }
    }
}

impl Display for CastlingRights {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        let (wking, wqueen) = self.get(White);
        let (bking, bqueen) = self.get(Black);
        write!(
            f,
            "{}{}{}{}",
            if wking { "K" } else { "" },
            if wqueen { "Q" } else { "" },
            if bking { "k" } else { "" },
            if bqueen { "q" } else { "" }
        )
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::new()
    }
}

use crate::piece::Color::{Black, White};
use crate::piece::PieceType::{Bishop, King, Knight, Pawn, Queen, Rook};
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [Pawn, Knight, Bishop, Rook, Queen, King];
    pub const PROMOTIONS: [PieceType; 4] = [Queen, Rook, Bishop, Knight];

    pub fn from_determinant(i: usize) -> Option<PieceType> {
        Self::ALL.get(i).copied()
    }
    pub fn can_slide(&self) -> bool {
        matches!(self, Bishop | Queen | Rook)
    }
    pub fn is_bishop_like(&self) -> bool {
        matches!(self, Bishop | Queen)
    }
    pub fn is_rook_like(&self) -> bool {
        matches!(self, Queen | Rook)
    }

    /// Lowercase letter, as used for promotions in long algebraic notation.
    pub fn as_char(&self) -> char {
        match self {
            Pawn => 'p',
            Knight => 'n',
            Bishop => 'b',
            Rook => 'r',
            Queen => 'q',
            King => 'k',
        }
    }

    pub fn from_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Some(Pawn),
            'n' => Some(Knight),
            'b' => Some(Bishop),
            'r' => Some(Rook),
            'q' => Some(Queen),
            'k' => Some(King),
            _ => None,
        }
    }
}

impl Display for PieceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            White => Black,
            Black => White,
        }
    }
    /// +1 for white, -1 for black.
    pub fn perspective(&self) -> i32 {
        match self {
            White => 1,
            Black => -1,
        }
    }
    /// Rank a pawn of this color promotes on.
    pub fn promotion_rank(&self) -> usize {
        match self {
            White => 7,
            Black => 0,
        }
    }
    /// Rank a pawn of this color may double push from.
    pub fn pawn_rank(&self) -> usize {
        match self {
            White => 1,
            Black => 6,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if *self == Black { "b" } else { "w" })
    }
}

impl Piece {
    pub fn new(piece_type: PieceType, color: Color) -> Piece {
        Piece { piece_type, color }
    }

    /// FEN letter to piece, uppercase being white.
    pub fn from_char(c: char) -> Option<Piece> {
        let piece_type = PieceType::from_char(c)?;
        let color = if c.is_ascii_lowercase() { Black } else { White };
        Some(Piece { piece_type, color })
    }

    pub fn as_char(&self) -> char {
        let c = self.piece_type.as_char();
        match self.color {
            White => c.to_ascii_uppercase(),
            Black => c,
        }
    }

    /// Index into the 12 piece planes of the Zobrist table.
    pub fn zobrist_index(&self) -> usize {
        self.color as usize * 6 + self.piece_type as usize
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_letters() {
        assert_eq!(Piece::from_char('N'), Some(Piece::new(Knight, White)));
        assert_eq!(Piece::from_char('k'), Some(Piece::new(King, Black)));
        assert_eq!(Piece::from_char('x'), None);
        assert_eq!(Piece::new(Queen, White).to_string(), "Q");
        assert_eq!(Piece::new(Pawn, Black).to_string(), "p");
    }

    #[test]
    fn zobrist_indices_are_distinct() {
        let mut seen = [false; 12];
        for color in [White, Black] {
            for piece_type in PieceType::ALL {
                let i = Piece::new(piece_type, color).zobrist_index();
                assert!(!seen[i]);
                seen[i] = true;
            }
        }
    }
}

use crate::piece::PieceType;
use crate::square::{self, file_of, square_representation, Square};
use std::fmt::{Display, Formatter};

/// A move as a plain (origin, target, promotion) triple.
/// Castling is written as the king's two-square move, en passant as the
/// capturing pawn's diagonal step; the board works out the rest.
///
/// The derived ordering is lexicographic on (from, to, promote_to), so
/// moves can live in ordered sets and compare by value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promote_to: Option<PieceType>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            promote_to: None,
        }
    }
    pub fn new_promotion(from: Square, to: Square, promote_to: PieceType) -> Move {
        Move {
            from,
            to,
            promote_to: Some(promote_to),
        }
    }
    pub fn all_promotions(from: Square, to: Square) -> [Move; 4] {
        PieceType::PROMOTIONS.map(|p| Self::new_promotion(from, to, p))
    }

    pub fn is_promotion(&self) -> bool {
        self.promote_to.is_some()
    }

    /// Whether the move changes file by two, which for a king means castling.
    pub fn is_two_file_step(&self) -> bool {
        file_of(self.from).abs_diff(file_of(self.to)) == 2
    }

    /// Parses a move formatted in long algebraic notation (`e2e4`, `e7e8q`).
    /// ```
    /// use castellan::r#move::Move;
    /// use castellan::piece::PieceType;
    /// assert_eq!(Move::parse("e2e4"), Some(Move::new(12, 28)));
    /// assert_eq!(Move::parse("a7a8n"), Some(Move::new_promotion(48, 56, PieceType::Knight)));
    /// assert_eq!(Move::parse("a7a8k"), None);
    /// assert_eq!(Move::parse("e2"), None);
    /// ```
    pub fn parse(mv: &str) -> Option<Move> {
        let mv = mv.trim();
        if !mv.is_ascii() || !(4..=5).contains(&mv.len()) {
            return None;
        }
        let from = square::parse_square(&mv[0..2])?;
        let to = square::parse_square(&mv[2..4])?;
        let promote_to = match mv[4..].chars().next() {
            None => None,
            Some(c) => match PieceType::from_char(c)? {
                PieceType::Pawn | PieceType::King => return None,
                p => Some(p),
            },
        };
        Some(Move { from, to, promote_to })
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let o = square_representation(self.from).unwrap_or_else(|| String::from("**"));
        let t = square_representation(self.to).unwrap_or_else(|| String::from("**"));
        match self.promote_to {
            Some(p) => write!(f, "{}{}{}", o, t, p),
            None => write!(f, "{}{}", o, t),
        }
    }
}

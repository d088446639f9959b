/// Squares are indexed rank by rank from white's side: a1 = 0, h1 = 7, a8 = 56, h8 = 63.
pub type Square = usize;

pub const A1: Square = 0;
pub const C1: Square = 2;
pub const D1: Square = 3;
pub const E1: Square = 4;
pub const F1: Square = 5;
pub const G1: Square = 6;
pub const H1: Square = 7;
pub const A8: Square = 56;
pub const C8: Square = 58;
pub const D8: Square = 59;
pub const E8: Square = 60;
pub const F8: Square = 61;
pub const G8: Square = 62;
pub const H8: Square = 63;

pub fn rank_of(sq: Square) -> usize {
    sq / 8
}
pub fn file_of(sq: Square) -> usize {
    sq % 8
}
pub fn square_at(file: usize, rank: usize) -> Square {
    rank * 8 + file
}
/// Mirrors a square across the horizontal middle line (a1 <-> a8).
pub fn vertical_symmetry(sq: Square) -> Square {
    sq ^ 56
}

/// Parses a square from the first two characters of a string slice
/// ```
/// use castellan::square::parse_square;
/// assert_eq!(parse_square("e4"), Some(28));
/// assert_eq!(parse_square("h8"), Some(63));
/// assert_eq!(parse_square("d2d4"), Some(11));
/// assert_eq!(parse_square("i1"), None);
/// assert_eq!(parse_square("a9"), None);
/// ```
pub fn parse_square(s: &str) -> Option<Square> {
    let mut chars = s.chars();
    let file = match chars.next()? {
        c @ 'a'..='h' => c as usize - 'a' as usize,
        _ => return None,
    };
    let rank = match chars.next()?.to_digit(10) {
        Some(r) if (1..=8).contains(&r) => r as usize - 1,
        _ => return None,
    };
    Some(square_at(file, rank))
}

/// Returns the algebraic name of a square
/// ```
/// use castellan::square::square_representation;
/// assert_eq!(square_representation(28), Some(String::from("e4")));
/// assert_eq!(square_representation(0), Some(String::from("a1")));
/// assert_eq!(square_representation(64), None);
/// ```
pub fn square_representation(sq: Square) -> Option<String> {
    if !is_valid(sq) {
        return None;
    }
    let file = (b'a' + file_of(sq) as u8) as char;
    let rank = (b'1' + rank_of(sq) as u8) as char;
    Some([file, rank].iter().collect())
}

pub fn is_valid(sq: Square) -> bool {
    sq < 64
}

/// Character of a file index, `0 -> 'a'`.
pub fn file_char(file: usize) -> char {
    (b'a' + file as u8) as char
}
/// Character of a rank index, `0 -> '1'`.
pub fn rank_char(rank: usize) -> char {
    (b'1' + rank as u8) as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetry_is_an_involution() {
        for sq in 0..64 {
            assert_eq!(vertical_symmetry(vertical_symmetry(sq)), sq);
            assert_eq!(file_of(vertical_symmetry(sq)), file_of(sq));
            assert_eq!(rank_of(vertical_symmetry(sq)), 7 - rank_of(sq));
        }
    }

    #[test]
    fn names_round_trip() {
        for sq in 0..64 {
            let name = square_representation(sq).unwrap();
            assert_eq!(parse_square(&name), Some(sq));
        }
    }
}

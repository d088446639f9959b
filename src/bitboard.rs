use crate::piece::Color;
use crate::square::Square;
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

// Knight, king and ray tables are generated by the build script
include!(concat!(env!("OUT_DIR"), "/lookup.rs"));

#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u64);

/// Index of a direction in `Bitboard::RAYS`.
/// Even directions walk towards higher squares, odd ones towards lower squares.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    East = 0,
    West = 1,
    North = 2,
    South = 3,
    NorthWest = 4,
    SouthEast = 5,
    NorthEast = 6,
    SouthWest = 7,
}

impl Direction {
    pub const ROOK: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::North,
        Direction::South,
    ];
    pub const BISHOP: [Direction; 4] = [
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::NorthEast,
        Direction::SouthWest,
    ];

    #[inline(always)]
    pub fn ascending(&self) -> bool {
        (*self as usize) % 2 == 0
    }
}

impl Bitboard {
    #[inline]
    pub fn from_square(square: Square) -> Bitboard {
        Bitboard(1u64 << square)
    }
    #[inline]
    pub fn from_squares(squares: &[Square]) -> Bitboard {
        squares
            .iter()
            .fold(Bitboard::EMPTY, |bb, sq| bb | Bitboard::from_square(*sq))
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
    #[inline(always)]
    pub fn is_set(&self, sq: Square) -> bool {
        self.0 & (1 << sq) != 0
    }
    #[inline(always)]
    pub fn set(&mut self, sq: Square) {
        self.0 |= 1 << sq
    }
    #[inline(always)]
    pub fn unset(&mut self, sq: Square) {
        self.0 &= !(1 << sq)
    }

    #[inline(always)]
    pub fn ls1b(&self) -> Option<Square> {
        if self.is_empty() {
            return None;
        }
        Some(self.0.trailing_zeros() as Square)
    }
    #[inline(always)]
    pub fn ms1b(&self) -> Option<Square> {
        if self.is_empty() {
            return None;
        }
        Some(63 - self.0.leading_zeros() as Square)
    }

    #[inline(always)]
    pub fn pop_ls1b(&mut self) -> Option<Square> {
        let ls1b = self.ls1b()?;
        self.0 &= self.0 - 1;
        Some(ls1b)
    }

    #[inline(always)]
    pub fn pop_count(&self) -> u32 {
        self.0.count_ones()
    }

    /*
    SHIFTS
     */
    #[inline]
    pub fn north_shift(bb: &Bitboard) -> Bitboard {
        Bitboard(bb.0 << 8)
    }
    #[inline]
    pub fn south_shift(bb: &Bitboard) -> Bitboard {
        Bitboard(bb.0 >> 8)
    }
    #[inline]
    pub fn north_west_shift(bb: &Bitboard) -> Bitboard {
        Bitboard(bb.0 << 7) & !Self::FILES[7]
    }
    #[inline]
    pub fn north_east_shift(bb: &Bitboard) -> Bitboard {
        Bitboard(bb.0 << 9) & !Self::FILES[0]
    }
    #[inline]
    pub fn south_west_shift(bb: &Bitboard) -> Bitboard {
        Bitboard(bb.0 >> 9) & !Self::FILES[7]
    }
    #[inline]
    pub fn south_east_shift(bb: &Bitboard) -> Bitboard {
        Bitboard(bb.0 >> 7) & !Self::FILES[0]
    }

    /*
    GENERALLY USEFUL BITBOARDS
    */
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FILES: [Bitboard; 8] = [
        Bitboard(0x0101010101010101),
        Bitboard(0x0202020202020202),
        Bitboard(0x0404040404040404),
        Bitboard(0x0808080808080808),
        Bitboard(0x1010101010101010),
        Bitboard(0x2020202020202020),
        Bitboard(0x4040404040404040),
        Bitboard(0x8080808080808080),
    ];
    pub const RANKS: [Bitboard; 8] = [
        Bitboard(0x00000000000000ff),
        Bitboard(0x000000000000ff00),
        Bitboard(0x0000000000ff0000),
        Bitboard(0x00000000ff000000),
        Bitboard(0x000000ff00000000),
        Bitboard(0x0000ff0000000000),
        Bitboard(0x00ff000000000000),
        Bitboard(0xff00000000000000),
    ];
    // Indexed by [color][kingside, queenside]. Squares that must be empty.
    pub const CASTLING_OCCUPANCY_MASKS: [[Bitboard; 2]; 2] = [
        [Bitboard(0x6000000000000000), Bitboard(0x0e00000000000000)],
        [Bitboard(0x60), Bitboard(0x0e)],
    ];
    // Squares the king stands on, crosses or lands on, none of which may be attacked.
    pub const CASTLING_ATTACKED_MASKS: [[Bitboard; 2]; 2] = [
        [Bitboard(0x7000000000000000), Bitboard(0x1c00000000000000)],
        [Bitboard(0x70), Bitboard(0x1c)],
    ];

    /// Squares hit by a slider on `origin` walking in `direction`, up to and
    /// including the first occupied square. Also returns that blocker, if any.
    #[inline]
    pub fn ray_attacks(origin: Square, direction: Direction, occupancy: Bitboard) -> (Bitboard, Option<Square>) {
        let ray = Self::RAYS[direction as usize][origin];
        let blocker = Self::nearest(ray & occupancy, direction);
        match blocker {
            Some(sq) => (ray ^ Self::RAYS[direction as usize][sq], Some(sq)),
            None => (ray, None),
        }
    }

    /// Closest set square to the ray's origin.
    #[inline(always)]
    pub fn nearest(bb: Bitboard, direction: Direction) -> Option<Square> {
        if direction.ascending() {
            bb.ls1b()
        } else {
            bb.ms1b()
        }
    }

    #[inline]
    pub fn pawn_pushes(pawns_bb: Bitboard, empty: Bitboard, color: Color) -> Bitboard {
        let shift = match color {
            Color::White => Self::north_shift(&pawns_bb),
            Color::Black => Self::south_shift(&pawns_bb),
        };
        shift & empty
    }

    #[inline]
    pub fn pawn_double_pushes(pawns_bb: Bitboard, empty: Bitboard, color: Color) -> Bitboard {
        let single_push = Self::pawn_pushes(pawns_bb, empty, color);
        let shift = match color {
            Color::White => Self::north_shift(&(single_push & Self::RANKS[2])),
            Color::Black => Self::south_shift(&(single_push & Self::RANKS[5])),
        };
        shift & empty
    }

    #[inline]
    pub fn pawn_attacks(pawns_bb: Bitboard, color: Color) -> Bitboard {
        match color {
            Color::White => Self::north_west_shift(&pawns_bb) | Self::north_east_shift(&pawns_bb),
            Color::Black => Self::south_west_shift(&pawns_bb) | Self::south_east_shift(&pawns_bb),
        }
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                write!(f, "{}", if self.is_set(rank * 8 + file) { "x " } else { ". " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// Pops the LS1B each time
impl Iterator for Bitboard {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        self.pop_ls1b()
    }
}

/*
BITWISE OPERATIONS IMPLEMENTATIONS
 */
impl BitAnd for Bitboard {
    type Output = Bitboard;
    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}
impl BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0
    }
}
impl BitOr for Bitboard {
    type Output = Bitboard;
    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}
impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}
impl BitXor for Bitboard {
    type Output = Bitboard;
    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}
impl BitXorAssign for Bitboard {
    fn bitxor_assign(&mut self, rhs: Bitboard) {
        self.0 ^= rhs.0
    }
}
impl Not for Bitboard {
    type Output = Bitboard;
    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::parse_square;

    fn sq(name: &str) -> Square {
        parse_square(name).unwrap()
    }

    #[test]
    fn leaper_tables() {
        assert_eq!(Bitboard::KNIGHT_ATTACKS[sq("a1")], Bitboard::from_squares(&[sq("b3"), sq("c2")]));
        assert_eq!(Bitboard::KING_ATTACKS[sq("h8")].pop_count(), 3);
        assert_eq!(Bitboard::KING_ATTACKS[sq("e4")].pop_count(), 8);
        assert_eq!(Bitboard::KNIGHT_ATTACKS[sq("d4")].pop_count(), 8);
    }

    #[test]
    fn rays_stop_at_the_first_blocker() {
        let occupancy = Bitboard::from_squares(&[sq("e6"), sq("e7")]);
        let (attacks, blocker) = Bitboard::ray_attacks(sq("e2"), Direction::North, occupancy);
        assert_eq!(blocker, Some(sq("e6")));
        assert_eq!(attacks, Bitboard::from_squares(&[sq("e3"), sq("e4"), sq("e5"), sq("e6")]));

        let (attacks, blocker) = Bitboard::ray_attacks(sq("e2"), Direction::SouthWest, occupancy);
        assert_eq!(blocker, None);
        assert_eq!(attacks, Bitboard::from_square(sq("d1")));

        let (attacks, blocker) = Bitboard::ray_attacks(sq("h1"), Direction::West, Bitboard::from_square(sq("c1")));
        assert_eq!(blocker, Some(sq("c1")));
        assert_eq!(attacks.pop_count(), 5);
    }

    #[test]
    fn rays_do_not_wrap() {
        assert!(Bitboard::RAYS[Direction::East as usize][sq("h4")].is_empty());
        assert!(Bitboard::RAYS[Direction::NorthWest as usize][sq("a4")].is_empty());
        assert_eq!(Bitboard::RAYS[Direction::SouthWest as usize][sq("c3")].pop_count(), 2);
    }

    #[test]
    fn pawn_shifts() {
        let pawns = Bitboard::from_squares(&[sq("a2"), sq("h7")]);
        assert_eq!(
            Bitboard::pawn_attacks(pawns, Color::White),
            Bitboard::from_squares(&[sq("b3"), sq("g8")])
        );
        assert_eq!(
            Bitboard::pawn_double_pushes(pawns, !Bitboard::EMPTY, Color::White),
            Bitboard::from_square(sq("a4"))
        );
    }
}

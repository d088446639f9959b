use crate::{
    bitboard::{Bitboard, Direction},
    board::{Board, Position},
    movelist::MoveList,
    piece::{Color, Piece, PieceType},
    r#move::Move,
    square::{rank_of, Square, A1, A8, E1, E8, H1, H8},
};
use std::collections::BTreeSet;

/// What a side's pieces see: every square they attack (own pieces included,
/// so that defended pieces count as attacked) and the enemy pieces their
/// sliders pin against the enemy king.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Scan {
    pub attacks: Bitboard,
    pub pins: Bitboard,
}

/// Everything the board derives from a position after a move.
/// Both arrays are indexed by color: `attacks[c]` are the squares `c` attacks,
/// `pinned[c]` the pieces of `c` that are pinned.
pub struct Generated {
    pub attacks: [Bitboard; 2],
    pub pinned: [Bitboard; 2],
    pub legal_moves: BTreeSet<Move>,
    pub in_check: bool,
}

struct ScanInfo<'a> {
    side: Color,
    own: Bitboard,
    opponents: Bitboard,
    occupancy: Bitboard,
    enemy_king: Option<Square>,
    enemy_attacks: Bitboard,
    scan: Scan,
    moves: Option<&'a mut MoveList>,
}

impl<'a> ScanInfo<'a> {
    fn new(position: &Position, side: Color, enemy_attacks: Bitboard, moves: Option<&'a mut MoveList>) -> Self {
        ScanInfo {
            side,
            own: position.color_bitboard(side),
            opponents: position.color_bitboard(side.opposite()),
            occupancy: position.occupancy(),
            enemy_king: position.king_square(side.opposite()),
            enemy_attacks,
            scan: Scan::default(),
            moves,
        }
    }

    fn push_targets(&mut self, origin: Square, targets: Bitboard) {
        let own = self.own;
        if let Some(moves) = self.moves.as_deref_mut() {
            for target in targets & !own {
                moves.push(Move::new(origin, target));
            }
        }
    }
}

/// Attack map and pins of `side`, without producing any move.
pub fn attacks(position: &Position, side: Color) -> Scan {
    let mut info = ScanInfo::new(position, side, Bitboard::EMPTY, None);
    scan_pieces(position, &mut info);
    info.scan
}

/// Pseudo-legal moves of the side to move, generated in the same pass as its
/// attack map and pins. The opponent's attacks are needed for king safety
/// and castling.
pub fn pseudo_legal(position: &Position, enemy_attacks: Bitboard, moves: &mut MoveList) -> Scan {
    let mut info = ScanInfo::new(position, position.side_to_move(), enemy_attacks, Some(moves));
    scan_pieces(position, &mut info);
    castling(position, &mut info);
    info.scan
}

/// Scans both sides, the opponent first, then keeps the pseudo-legal moves
/// that do not leave the mover's king attacked.
pub(crate) fn generate(board: &mut Board) -> Generated {
    let position = *board.position();
    let us = position.side_to_move();
    let them = us.opposite();

    let enemy = attacks(&position, them);
    let mut pseudo = MoveList::default();
    let own = pseudo_legal(&position, enemy.attacks, &mut pseudo);

    let mut attacked = [Bitboard::EMPTY; 2];
    let mut pinned = [Bitboard::EMPTY; 2];
    attacked[them as usize] = enemy.attacks;
    attacked[us as usize] = own.attacks;
    pinned[us as usize] = enemy.pins;
    pinned[them as usize] = own.pins;

    let in_check = match position.king_square(us) {
        Some(king) => enemy.attacks.is_set(king),
        None => false,
    };

    let mut legal_moves = BTreeSet::new();
    for mv in &pseudo {
        let needs_test = in_check || pinned[us as usize].is_set(mv.from) || is_en_passant(&position, mv);
        if !needs_test || leaves_king_safe(board, *mv) {
            legal_moves.insert(*mv);
        }
    }

    Generated {
        attacks: attacked,
        pinned,
        legal_moves,
        in_check,
    }
}

/// Plays the move, recomputes the opponent's attacks from scratch and looks
/// at the mover's king. The board is restored before returning.
fn leaves_king_safe(board: &mut Board, mv: Move) -> bool {
    board.with_move_applied(mv, |position| {
        let mover = position.side_to_move().opposite();
        match position.king_square(mover) {
            Some(king) => !attacks(position, position.side_to_move()).attacks.is_set(king),
            None => true,
        }
    })
}

pub fn is_en_passant(position: &Position, mv: &Move) -> bool {
    position.en_passant_target() == Some(mv.to)
        && matches!(position.piece_on(mv.from), Some(Piece { piece_type: PieceType::Pawn, .. }))
}

fn scan_pieces(position: &Position, info: &mut ScanInfo) {
    pawn_moves(position, info);
    knight_moves(position, info);
    king_moves(position, info);
    slider_moves(position, info);
}

fn pawn_moves(position: &Position, info: &mut ScanInfo) {
    let pawns = position.piece_bitboard(PieceType::Pawn, info.side);
    info.scan.attacks |= Bitboard::pawn_attacks(pawns, info.side);

    let Some(moves) = info.moves.as_deref_mut() else { return };
    let empty = !info.occupancy;
    let mut capturable = info.opponents;
    if let Some(ep) = position.en_passant_target() {
        capturable.set(ep)
    }

    for origin in pawns {
        let from = Bitboard::from_square(origin);
        let targets = Bitboard::pawn_pushes(from, empty, info.side)
            | Bitboard::pawn_double_pushes(from, empty, info.side)
            | (Bitboard::pawn_attacks(from, info.side) & capturable);
        for target in targets {
            if rank_of(target) == info.side.promotion_rank() {
                for promotion in Move::all_promotions(origin, target) {
                    moves.push(promotion)
                }
            } else {
                moves.push(Move::new(origin, target))
            }
        }
    }
}

fn knight_moves(position: &Position, info: &mut ScanInfo) {
    for origin in position.piece_bitboard(PieceType::Knight, info.side) {
        let targets = Bitboard::KNIGHT_ATTACKS[origin];
        info.scan.attacks |= targets;
        info.push_targets(origin, targets);
    }
}

// The king never steps onto an attacked square. While in check the move is
// still tested, since a slider's ray continues behind the king.
fn king_moves(position: &Position, info: &mut ScanInfo) {
    for origin in position.piece_bitboard(PieceType::King, info.side) {
        let targets = Bitboard::KING_ATTACKS[origin];
        info.scan.attacks |= targets;
        info.push_targets(origin, targets & !info.enemy_attacks);
    }
}

fn slider_moves(position: &Position, info: &mut ScanInfo) {
    for (piece_type, directions) in [
        (PieceType::Bishop, &Direction::BISHOP[..]),
        (PieceType::Rook, &Direction::ROOK[..]),
        (PieceType::Queen, &Direction::ROOK[..]),
        (PieceType::Queen, &Direction::BISHOP[..]),
    ] {
        for origin in position.piece_bitboard(piece_type, info.side) {
            for direction in directions {
                ray_walk(origin, *direction, info);
            }
        }
    }
}

// Walks one ray: squares are reachable up to the first piece. If that piece is
// an enemy and the next piece behind it is the enemy king, it is pinned.
fn ray_walk(origin: Square, direction: Direction, info: &mut ScanInfo) {
    let (ray, blocker) = Bitboard::ray_attacks(origin, direction, info.occupancy);
    info.scan.attacks |= ray;
    info.push_targets(origin, ray);

    if let Some(first) = blocker {
        if !info.opponents.is_set(first) {
            return;
        }
        let behind = Bitboard::RAYS[direction as usize][first] & info.occupancy;
        if let Some(king) = info.enemy_king {
            if Bitboard::nearest(behind, direction) == Some(king) {
                info.scan.pins.set(first)
            }
        }
    }
}

fn castling(position: &Position, info: &mut ScanInfo) {
    let side = info.side;
    let (king_home, kingside_rook, queenside_rook) = match side {
        Color::White => (E1, H1, A1),
        Color::Black => (E8, H8, A8),
    };
    let king = Piece::new(PieceType::King, side);
    let rook = Some(Piece::new(PieceType::Rook, side));
    if position.piece_on(king_home) != Some(king) || info.enemy_attacks.is_set(king_home) {
        return;
    }

    let (kingside, queenside) = position.castling_rights().get(side);
    let occupancy = info.occupancy;
    let attacked = info.enemy_attacks;
    let Some(moves) = info.moves.as_deref_mut() else { return };

    let masks = |i: usize| {
        (occupancy & Bitboard::CASTLING_OCCUPANCY_MASKS[side as usize][i]).is_empty()
            && (attacked & Bitboard::CASTLING_ATTACKED_MASKS[side as usize][i]).is_empty()
    };
    if kingside && position.piece_on(kingside_rook) == rook && masks(0) {
        moves.push(Move::new(king_home, king_home + 2))
    }
    if queenside && position.piece_on(queenside_rook) == rook && masks(1) {
        moves.push(Move::new(king_home, king_home - 2))
    }
}

#[cfg(test)]
mod perft_tests {
    use crate::board::Board;
    use crate::perft;

    // Verification goes up to depth 3 for every position and depth 4 for the
    // lighter ones, the positions are varied enough to cover all kinds of moves
    const TEST_POSITIONS: [(&str, [u64; 4]); 7] = [
        (
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            [20, 400, 8902, 197281],
        ),
        (
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            [48, 2039, 97862, 4085603],
        ),
        (
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            [14, 191, 2812, 43238],
        ),
        (
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            [6, 264, 9467, 422333],
        ),
        (
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
            [6, 264, 9467, 422333],
        ),
        (
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            [44, 1486, 62379, 2103487],
        ),
        (
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
            [46, 2079, 89890, 3894594],
        ),
    ];

    #[test]
    fn perft_verification() {
        for (fen, results) in TEST_POSITIONS {
            let mut board = Board::from_fen(fen).unwrap();
            let max_depth = if results[3] < 500_000 { 4 } else { 3 };
            for d in 1..=max_depth {
                assert_eq!(results[d - 1], perft(&mut board, d as u8), "{} at depth {}", fen, d);
            }
            assert_eq!(board.to_fen(), fen);
        }
    }
}

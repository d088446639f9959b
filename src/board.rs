use crate::bitboard::Bitboard;
use crate::castling::CastlingRights;
use crate::error::{FenError, FenResult, MoveError};
use crate::history::History;
use crate::move_generator;
use crate::piece::Color::{Black, White};
use crate::piece::PieceType::{King, Pawn, Rook};
use crate::piece::{Color, Piece, PieceType};
use crate::r#move::Move;
use crate::square::{file_of, parse_square, rank_of, square_at, square_representation, Square};
use crate::zob_hash::{Hash, ZobristKeys};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, warn};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Dense view of the board from white's side: `[0][0]` is a8, `[7][7]` is h1.
pub type PieceMatrix = [[Option<Piece>; 8]; 8];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardResult {
    Playing,
    Checkmate,
    StaleMate,
    ThreefoldRepetition,
}

impl BoardResult {
    pub fn is_over(&self) -> bool {
        *self != BoardResult::Playing
    }
}

/// The raw state of a game at one point in time. Copied whole into the history
/// on every move, so undoing is restoring the previous copy.
///
/// Bitboards are indexed by color and piece type, with a redundant color
/// bitboard at index 6.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Position {
    bitboards: [[Bitboard; 7]; 2],
    pieces: [Option<Piece>; 64],
    side_to_move: Color,
    castling_rights: CastlingRights,
    ep_target: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: Hash,
}

impl Position {
    fn empty() -> Position {
        Position {
            bitboards: [[Bitboard::EMPTY; 7]; 2],
            pieces: [None; 64],
            side_to_move: White,
            castling_rights: CastlingRights::none(),
            ep_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
        }
    }

    pub fn starting(keys: &ZobristKeys) -> Position {
        const BACK_RANK: [PieceType; 8] = [
            Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            King,
            PieceType::Bishop,
            PieceType::Knight,
            Rook,
        ];
        let mut position = Position::empty();
        position.castling_rights = CastlingRights::new();
        for (file, piece_type) in BACK_RANK.iter().enumerate() {
            position.add_piece(Piece::new(*piece_type, White), square_at(file, 0), keys);
            position.add_piece(Piece::new(Pawn, White), square_at(file, 1), keys);
            position.add_piece(Piece::new(Pawn, Black), square_at(file, 6), keys);
            position.add_piece(Piece::new(*piece_type, Black), square_at(file, 7), keys);
        }
        position.hash = position.compute_hash(keys);
        position
    }

    /// Places a new piece on a given square
    fn add_piece(&mut self, piece: Piece, sq: Square, keys: &ZobristKeys) {
        self.pieces[sq] = Some(piece);
        self.bitboards[piece.color as usize][piece.piece_type as usize].set(sq);
        self.bitboards[piece.color as usize][6].set(sq);
        self.hash ^= keys.piece_square(piece, sq);
    }

    /// Clears the given square, returning the piece that has been removed if any
    fn remove_piece(&mut self, sq: Square, keys: &ZobristKeys) -> Option<Piece> {
        let removed = self.pieces[sq].take();
        if let Some(p) = removed {
            self.bitboards[p.color as usize][p.piece_type as usize].unset(sq);
            self.bitboards[p.color as usize][6].unset(sq);
            self.hash ^= keys.piece_square(p, sq);
        }
        removed
    }

    /// Plays a move with no legality check, updating the hash as it goes.
    pub(crate) fn apply(&mut self, mv: Move, keys: &ZobristKeys) {
        let Some(moving) = self.pieces[mv.from] else { return };
        let mover = self.side_to_move;

        self.hash ^= keys.castling_rights(self.castling_rights) ^ keys.en_passant(self.hashed_en_passant());

        self.remove_piece(mv.from, keys);
        let captured = self.remove_piece(mv.to, keys);
        let mut irreversible = moving.piece_type == Pawn || captured.is_some();

        if moving.piece_type == Pawn && Some(mv.to) == self.ep_target {
            let passed = if mover == White { mv.to - 8 } else { mv.to + 8 };
            self.remove_piece(passed, keys);
            irreversible = true;
        }
        if moving.piece_type == King && mv.is_two_file_step() {
            let (rook_from, rook_to) = if file_of(mv.to) == 6 {
                (mv.to + 1, mv.to - 1)
            } else {
                (mv.to - 2, mv.to + 1)
            };
            if let Some(rook) = self.remove_piece(rook_from, keys) {
                self.add_piece(rook, rook_to, keys);
            }
        }

        let placed = match mv.promote_to {
            Some(p) => Piece::new(p, mover),
            None => moving,
        };
        self.add_piece(placed, mv.to, keys);

        self.ep_target = if moving.piece_type == Pawn && mv.from.abs_diff(mv.to) == 16 {
            Some((mv.from + mv.to) / 2)
        } else {
            None
        };
        self.castling_rights.touch(mv.from);
        self.castling_rights.touch(mv.to);
        self.halfmove_clock = if irreversible { 0 } else { self.halfmove_clock + 1 };
        if mover == Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = mover.opposite();
        self.hash ^= keys.side_to_move(Black);

        self.hash ^= keys.castling_rights(self.castling_rights) ^ keys.en_passant(self.hashed_en_passant());
    }

    /// The en passant target, only if the side to move can actually take on it.
    /// Positions that differ by an unusable target hash the same.
    fn hashed_en_passant(&self) -> Option<Square> {
        let target = self.ep_target?;
        let capturers = Bitboard::pawn_attacks(Bitboard::from_square(target), self.side_to_move.opposite())
            & self.piece_bitboard(Pawn, self.side_to_move);
        if capturers.is_empty() {
            None
        } else {
            Some(target)
        }
    }

    /// Hash recomputed from scratch, for cross-checking the incremental one.
    pub fn compute_hash(&self, keys: &ZobristKeys) -> Hash {
        let mut hash = 0;
        for (sq, piece) in self.pieces.iter().enumerate() {
            if let Some(p) = piece {
                hash ^= keys.piece_square(*p, sq);
            }
        }
        hash ^ keys.side_to_move(self.side_to_move)
            ^ keys.castling_rights(self.castling_rights)
            ^ keys.en_passant(self.hashed_en_passant())
    }

    /*
    GETTERS
     */
    pub fn hash(&self) -> Hash {
        self.hash
    }
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }
    pub fn en_passant_target(&self) -> Option<Square> {
        self.ep_target
    }
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.pieces[sq]
    }
    pub fn piece_bitboard(&self, piece_type: PieceType, color: Color) -> Bitboard {
        self.bitboards[color as usize][piece_type as usize]
    }
    pub fn color_bitboard(&self, color: Color) -> Bitboard {
        self.bitboards[color as usize][6]
    }
    pub fn occupancy(&self) -> Bitboard {
        self.bitboards[0][6] | self.bitboards[1][6]
    }
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.bitboards[color as usize][King as usize].ls1b()
    }

    /*
    FEN STRING OPERATIONS
     */
    pub fn from_fen(fen: &str, keys: &ZobristKeys) -> FenResult<Position> {
        let mut sections = fen.split_whitespace();
        let placement = sections.next().ok_or(FenError::MissingField("piece placement"))?;
        let side = sections.next().ok_or(FenError::MissingField("side to move"))?;
        let castling = sections.next().ok_or(FenError::MissingField("castling rights"))?;
        let ep_target = sections.next().ok_or(FenError::MissingField("en passant target"))?;
        let halfmove = sections.next().unwrap_or("0");
        let fullmove = sections.next().unwrap_or("1");

        let mut position = Position::empty();

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPlacement(format!("expected 8 ranks, found {}", ranks.len())));
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else {
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece(c))?;
                    if file > 7 {
                        return Err(FenError::InvalidPlacement(format!("rank {} is too long", rank + 1)));
                    }
                    position.add_piece(piece, square_at(file, rank), keys);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPlacement(format!(
                    "rank {} covers {} files",
                    rank + 1,
                    file
                )));
            }
        }

        for (color, name) in [(White, "white"), (Black, "black")] {
            let found = position.piece_bitboard(King, color).pop_count();
            if found != 1 {
                return Err(FenError::KingCount { color: name, found });
            }
        }

        position.side_to_move = match side {
            "w" => White,
            "b" => Black,
            _ => return Err(FenError::InvalidSide(side.to_owned())),
        };
        position.castling_rights =
            CastlingRights::from_fen(castling).ok_or_else(|| FenError::InvalidCastling(castling.to_owned()))?;
        position.ep_target = match ep_target {
            "-" => None,
            s => {
                let expected_rank = if position.side_to_move == White { 5 } else { 2 };
                match parse_square(s) {
                    Some(sq) if s.len() == 2 && rank_of(sq) == expected_rank => Some(sq),
                    _ => return Err(FenError::InvalidEnPassant(s.to_owned())),
                }
            }
        };
        position.halfmove_clock = halfmove
            .parse()
            .map_err(|_| FenError::InvalidCounter(halfmove.to_owned()))?;
        position.fullmove_number = fullmove
            .parse()
            .map_err(|_| FenError::InvalidCounter(fullmove.to_owned()))?;

        position.hash = position.compute_hash(keys);
        Ok(position)
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8).rev() {
            let mut empty_counter = 0;
            for file in 0..8 {
                match self.pieces[square_at(file, rank)] {
                    Some(p) => {
                        if empty_counter != 0 {
                            fen.push_str(&empty_counter.to_string());
                            empty_counter = 0;
                        }
                        fen.push(p.as_char());
                    }
                    None => empty_counter += 1,
                }
            }
            if empty_counter != 0 {
                fen.push_str(&empty_counter.to_string());
            }
            if rank != 0 {
                fen.push('/');
            }
        }

        let ep = self
            .ep_target
            .and_then(square_representation)
            .unwrap_or_else(|| String::from("-"));
        format!(
            "{} {} {} {} {} {}",
            fen, self.side_to_move, self.castling_rights, ep, self.halfmove_clock, self.fullmove_number
        )
    }
}

/// A game in progress: the current position, the positions that led to it, and
/// everything derived from it (attack maps, pins, legal moves, result), which
/// is rebuilt after every make and unmake.
#[derive(Clone)]
pub struct Board {
    position: Position,
    history: History,
    keys: Arc<ZobristKeys>,

    legal_moves: BTreeSet<Move>,
    attacks: [Bitboard; 2],
    pinned: [Bitboard; 2],
    in_check: bool,
    result: BoardResult,
}

impl Board {
    /// Standard starting position
    pub fn new() -> Board {
        let keys = Arc::new(ZobristKeys::default());
        let position = Position::starting(&keys);
        Self::from_position(position, keys)
    }

    pub fn from_fen(fen: &str) -> FenResult<Board> {
        Self::with_keys(fen, Arc::new(ZobristKeys::default()))
    }

    /// Loads a position hashing with an existing key table, so that several
    /// boards can compare hashes.
    pub fn with_keys(fen: &str, keys: Arc<ZobristKeys>) -> FenResult<Board> {
        let position = Position::from_fen(fen, &keys)?;
        Ok(Self::from_position(position, keys))
    }

    fn from_position(position: Position, keys: Arc<ZobristKeys>) -> Board {
        let mut board = Board {
            position,
            history: History::with_capacity(128),
            keys,
            legal_moves: BTreeSet::new(),
            attacks: [Bitboard::EMPTY; 2],
            pinned: [Bitboard::EMPTY; 2],
            in_check: false,
            result: BoardResult::Playing,
        };
        board.refresh();
        board
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Makes a move on the board
    /// The move is expected to be legal, which search and perft guarantee by
    /// only playing members of `legal_moves`
    pub fn make(&mut self, mv: Move) {
        self.history.push(self.position, mv);
        self.position.apply(mv, &self.keys);
        self.refresh();
    }

    /// Unmakes the move on the top of the history stack, returning it
    pub fn unmake(&mut self) -> Option<Move> {
        let entry = self.history.pop()?;
        self.position = entry.position;
        self.refresh();
        Some(entry.move_played)
    }

    /// Plays a move if it belongs to the current legal set, leaving the board
    /// untouched otherwise
    pub fn move_piece(&mut self, mv: Move) -> Result<(), MoveError> {
        if !self.legal_moves.contains(&mv) {
            warn!(%mv, fen = %self.to_fen(), "rejected move not in the legal set");
            return Err(MoveError::Illegal(mv));
        }
        self.make(mv);
        Ok(())
    }

    /// Takes back the last move. Does nothing on a board with no history.
    pub fn undo_move(&mut self) {
        if let Some(mv) = self.unmake() {
            debug!(%mv, "move undone");
        }
    }

    /// Runs `f` on the position reached by `mv`, then restores the board.
    /// Derived state is left as it was, since nothing is recomputed.
    pub(crate) fn with_move_applied<R>(&mut self, mv: Move, f: impl FnOnce(&Position) -> R) -> R {
        self.history.push(self.position, mv);
        self.position.apply(mv, &self.keys);
        let res = f(&self.position);
        if let Some(entry) = self.history.pop() {
            self.position = entry.position;
        }
        res
    }

    fn refresh(&mut self) {
        let generated = move_generator::generate(self);
        self.attacks = generated.attacks;
        self.pinned = generated.pinned;
        self.in_check = generated.in_check;
        self.legal_moves = generated.legal_moves;

        self.result = if self.times_repeated() >= 3 {
            self.legal_moves.clear();
            BoardResult::ThreefoldRepetition
        } else if self.legal_moves.is_empty() {
            if self.in_check {
                BoardResult::Checkmate
            } else {
                BoardResult::StaleMate
            }
        } else {
            BoardResult::Playing
        };
    }

    /*
    MOVE CLASSIFICATION
     */
    pub fn legal_moves(&self) -> &BTreeSet<Move> {
        &self.legal_moves
    }

    /// Legal captures, en passant included
    pub fn current_takes(&self) -> impl Iterator<Item = Move> + '_ {
        self.legal_moves.iter().copied().filter(|m| self.is_capture(m))
    }

    pub fn is_promotion(&self, mv: &Move) -> bool {
        mv.is_promotion()
    }

    pub fn is_capture(&self, mv: &Move) -> bool {
        self.position.color_bitboard(self.position.side_to_move.opposite()).is_set(mv.to)
            || move_generator::is_en_passant(&self.position, mv)
    }

    /// Whether the move lands on a square the opponent attacks
    pub fn is_targeted(&self, mv: &Move) -> bool {
        self.attacks[self.position.side_to_move.opposite() as usize].is_set(mv.to)
    }

    /*
    INTERESTING GETTERS
     */
    pub fn position(&self) -> &Position {
        &self.position
    }
    pub fn keys(&self) -> &Arc<ZobristKeys> {
        &self.keys
    }
    pub fn result(&self) -> BoardResult {
        self.result
    }
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move
    }
    pub fn zobrist_hash(&self) -> Hash {
        self.position.hash
    }
    pub fn compute_hash(&self) -> Hash {
        self.position.compute_hash(&self.keys)
    }
    pub fn in_check(&self) -> bool {
        self.in_check
    }
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.position.king_square(color)
    }
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.position.pieces[sq]
    }
    pub fn piece_count(&self, piece_type: PieceType, color: Color) -> u32 {
        self.position.piece_bitboard(piece_type, color).pop_count()
    }
    pub fn piece_bitboard(&self, piece_type: PieceType, color: Color) -> Bitboard {
        self.position.piece_bitboard(piece_type, color)
    }
    /// Squares attacked by `color`
    pub fn attacked_squares(&self, color: Color) -> Bitboard {
        self.attacks[color as usize]
    }
    /// Pieces of `color` pinned against their own king
    pub fn pinned_squares(&self, color: Color) -> Bitboard {
        self.pinned[color as usize]
    }
    pub fn en_passant_target(&self) -> Option<Square> {
        self.position.ep_target
    }
    pub fn castling_rights(&self) -> CastlingRights {
        self.position.castling_rights
    }
    pub fn move_counter(&self) -> u32 {
        self.position.fullmove_number
    }
    pub fn halfmove_clock(&self) -> u32 {
        self.position.halfmove_clock
    }
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|e| e.move_played)
    }
    /// Number of plies that can be undone
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// How many times the current position has occurred, this one included
    pub fn times_repeated(&self) -> usize {
        1 + self.history.occurrences(self.position.hash, self.position.halfmove_clock)
    }

    pub fn piece_matrix(&self) -> PieceMatrix {
        let mut matrix = [[None; 8]; 8];
        for (row, rank) in (0..8).rev().enumerate() {
            for file in 0..8 {
                matrix[row][file] = self.position.pieces[square_at(file, rank)];
            }
        }
        matrix
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let matrix = self.piece_matrix();
        let side_info = [
            format!("side to move: {}", self.side_to_move()),
            format!("castling rights: {}", self.castling_rights()),
            format!(
                "en passant: {}",
                self.en_passant_target()
                    .and_then(square_representation)
                    .unwrap_or_else(|| String::from("-"))
            ),
            format!("move: {} ({} reversible plies)", self.move_counter(), self.halfmove_clock()),
            format!("hash: {:#018x}", self.zobrist_hash()),
            format!("state: {:?}", self.result()),
            format!("fen: {}", self.to_fen()),
            String::new(),
        ];
        for (row, info) in matrix.iter().zip(side_info.iter()) {
            let line: Vec<String> = row
                .iter()
                .map(|p| p.map_or(String::from("."), |p| p.to_string()))
                .collect();
            writeln!(f, "{}  {}", line.join(" "), info)?;
        }
        Ok(())
    }
}

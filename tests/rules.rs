use castellan::board::{Board, BoardResult};
use castellan::piece::{Color, PieceType};
use castellan::san::{parse_san, to_san};
use castellan::square::parse_square;
use castellan::{Move, MoveError};

fn sq(name: &str) -> usize {
    parse_square(name).unwrap()
}

fn moves_from(board: &Board, from: &str) -> Vec<Move> {
    board.legal_moves().iter().copied().filter(|m| m.from == sq(from)).collect()
}

#[test]
fn supported_queen_mates_in_the_corner() {
    let board = Board::from_fen("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(board.legal_moves().is_empty());
    assert!(board.in_check());
    assert_eq!(board.result(), BoardResult::Checkmate);
}

#[test]
fn cornered_king_without_check_is_stalemated() {
    let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(board.legal_moves().is_empty());
    assert!(!board.in_check());
    assert_eq!(board.result(), BoardResult::StaleMate);
}

#[test]
fn playing_into_mate_ends_the_game() {
    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    assert_eq!(board.result(), BoardResult::Playing);
    board.move_piece(Move::new(sq("a1"), sq("a8"))).unwrap();
    assert_eq!(board.result(), BoardResult::Checkmate);
    board.undo_move();
    assert_eq!(board.result(), BoardResult::Playing);
}

#[test]
fn promotion_offers_four_pieces() {
    let board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let promotions = moves_from(&board, "a7");
    assert_eq!(promotions.len(), 4);
    assert!(promotions.iter().all(|m| m.to == sq("a8")));
    let mut pieces: Vec<PieceType> = promotions.iter().filter_map(|m| m.promote_to).collect();
    pieces.sort();
    assert_eq!(pieces, vec![PieceType::Knight, PieceType::Bishop, PieceType::Rook, PieceType::Queen]);
}

#[test]
fn capturing_promotions_count_too() {
    let board = Board::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let promotions = moves_from(&board, "a7");
    assert_eq!(promotions.len(), 8);
    assert_eq!(promotions.iter().filter(|m| board.is_capture(m)).count(), 4);
}

#[test]
fn promoted_piece_lands_on_the_board() {
    let mut board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    board
        .move_piece(Move::new_promotion(sq("a7"), sq("a8"), PieceType::Knight))
        .unwrap();
    assert_eq!(board.piece_on(sq("a8")).map(|p| p.piece_type), Some(PieceType::Knight));
    assert_eq!(board.piece_count(PieceType::Pawn, Color::White), 0);
}

#[test]
fn bishop_pinned_on_a_file_cannot_move() {
    let board = Board::from_fen("4k3/8/8/8/4r3/8/4B3/4K3 w - - 0 1").unwrap();
    assert!(board.pinned_squares(Color::White).is_set(sq("e2")));
    assert!(moves_from(&board, "e2").is_empty());
}

#[test]
fn bishop_pinned_on_a_diagonal_stays_on_it() {
    let board = Board::from_fen("4k3/8/8/8/7b/8/5B2/4K3 w - - 0 1").unwrap();
    assert!(board.pinned_squares(Color::White).is_set(sq("f2")));
    let mut moves = moves_from(&board, "f2");
    moves.sort();
    assert_eq!(moves, vec![Move::new(sq("f2"), sq("g3")), Move::new(sq("f2"), sq("h4"))]);
}

#[test]
fn illegal_moves_are_rejected_without_side_effects() {
    let mut board = Board::new();
    let fen = board.to_fen();
    let hash = board.zobrist_hash();
    let bad = Move::new(sq("e2"), sq("e5"));
    assert_eq!(board.move_piece(bad), Err(MoveError::Illegal(bad)));
    assert_eq!(board.to_fen(), fen);
    assert_eq!(board.zobrist_hash(), hash);
    assert_eq!(board.ply(), 0);
}

#[test]
fn undo_on_a_fresh_board_does_nothing() {
    let mut board = Board::new();
    board.undo_move();
    assert_eq!(board.to_fen(), castellan::START_FEN);
}

#[test]
fn knights_dancing_back_draw_by_repetition() {
    let mut board = Board::new();
    for _ in 0..2 {
        for mv in ["Nf3", "Nf6", "Ng1", "Ng8"] {
            let mv = parse_san(&board, mv).unwrap();
            board.move_piece(mv).unwrap();
        }
    }
    assert_eq!(board.times_repeated(), 3);
    assert_eq!(board.result(), BoardResult::ThreefoldRepetition);
    assert!(board.legal_moves().is_empty());

    board.undo_move();
    assert_eq!(board.result(), BoardResult::Playing);
}

#[test]
fn san_round_trips_through_a_short_game() {
    let mut board = Board::new();
    let game = ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Bxc6", "dxc6", "O-O", "Bg4", "h3", "Bxf3", "Qxf3"];
    for text in game {
        let mv = parse_san(&board, text).unwrap();
        assert_eq!(to_san(&mut board, mv), text);
        board.move_piece(mv).unwrap();
    }
    assert_eq!(board.move_counter(), 7);
    assert_eq!(board.castling_rights().get(Color::White), (false, false));
}

#[test]
fn scholars_mate_is_printed_with_a_hash() {
    let mut board = Board::new();
    for text in ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6"] {
        let mv = parse_san(&board, text).unwrap();
        board.move_piece(mv).unwrap();
    }
    let mate = parse_san(&board, "Qxf7").unwrap();
    assert_eq!(to_san(&mut board, mate), "Qxf7#");
    board.move_piece(mate).unwrap();
    assert_eq!(board.result(), BoardResult::Checkmate);
}

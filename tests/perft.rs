use std::sync::Arc;

use castellan::board::Board;
use castellan::perft;
use castellan::zob_hash::ZobristKeys;

#[test]
fn start_position_move_counts() {
    let mut board = Board::new();
    for (depth, expected) in [(0, 1), (1, 20), (2, 400), (3, 8_902), (4, 197_281)] {
        assert_eq!(perft(&mut board, depth), expected, "depth {}", depth);
    }
}

#[test]
fn kiwipete_move_counts() {
    let mut board =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    assert_eq!(perft(&mut board, 1), 48);
    assert_eq!(perft(&mut board, 2), 2_039);
    assert_eq!(perft(&mut board, 3), 97_862);
}

#[test]
fn perft_hands_the_board_back_untouched() {
    let mut board = Board::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
    let fen = board.to_fen();
    let hash = board.zobrist_hash();
    assert_eq!(perft(&mut board, 4), 43_238);
    assert_eq!(board.to_fen(), fen);
    assert_eq!(board.zobrist_hash(), hash);
    assert_eq!(board.ply(), 0);
}

#[test]
fn boards_can_share_a_key_table() {
    let keys = Arc::new(ZobristKeys::default());
    let mut a = Board::with_keys(castellan::START_FEN, keys.clone()).unwrap();
    let b = Board::with_keys(castellan::START_FEN, keys).unwrap();
    assert_eq!(a.zobrist_hash(), b.zobrist_hash());
    assert_eq!(perft(&mut a, 3), 8_902);
}

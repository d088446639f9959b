use castellan::board::Board;
use castellan::evaluation::Evaluation;
use castellan::search::{Engine, SearchOptions};
use criterion::{criterion_group, criterion_main, Criterion};

// A pure perft function, with no node counting, simply make/unmake and
// move generation
fn perft(board: &mut Board, depth: u64) {
    if depth == 0 {
        return;
    }
    let moves: Vec<_> = board.legal_moves().iter().copied().collect();
    for m in moves {
        board.make(m);
        perft(board, depth - 1);
        board.unmake();
    }
}

fn board(fen: &str) -> Board {
    Board::from_fen(fen).expect("benchmark positions are valid")
}

fn perft_bench(c: &mut Criterion) {
    // The positions are taken from the chess programming wiki
    // https://www.chessprogramming.org/Perft_Results
    let mut initial = Board::new();
    c.bench_function("perft initial 3", |b| b.iter(|| perft(&mut initial, 3)));
    let mut kiwipete = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    c.bench_function("perft kiwipete 3", |b| b.iter(|| perft(&mut kiwipete, 3)));
    let mut alternative = board("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10");
    c.bench_function("perft alternative 3", |b| b.iter(|| perft(&mut alternative, 3)));
}

fn search_bench(c: &mut Criterion) {
    let position = board("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10");
    c.bench_function("evaluate", |b| b.iter(|| Evaluation::evaluate(&position)));

    let mut options = SearchOptions::default();
    options.set_time(None).set_depth(3);
    let mut engine = Engine::new(options);
    let mut initial = Board::new();
    c.bench_function("search initial 3", |b| b.iter(|| engine.best_move(&mut initial)));
}

criterion_group!(benches, perft_bench, search_bench);
criterion_main!(benches);

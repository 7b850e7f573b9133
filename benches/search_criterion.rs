use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use arbiter_chess::move_generation::legal_move_generator::LegalMoveGenerator;
use arbiter_chess::position::chess_types::Position;
use arbiter_chess::search::board_scoring::StandardScorer;
use arbiter_chess::search::iterative_deepening::{
    iterative_deepening_search, iterative_deepening_search_with_tt, SearchConfig,
};
use arbiter_chess::search::transposition_table::TranspositionTable;

struct SearchCase {
    name: &'static str,
    fen: &'static str,
}

const CASES: &[SearchCase] = &[
    SearchCase {
        name: "start",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    },
    SearchCase {
        name: "middlegame",
        fen: "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    },
    SearchCase {
        name: "tactical",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    },
    SearchCase {
        name: "king_pawn_ending",
        fen: "8/8/8/8/8/4k3/4P3/4K3 w - - 0 1",
    },
];

fn bench_fixed_depth_search(c: &mut Criterion) {
    let depth = std::env::var("ARBITER_SEARCH_DEPTH")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(3)
        .max(1);
    let config = SearchConfig {
        max_depth: depth,
        ..SearchConfig::default()
    };

    let mut group = c.benchmark_group("fixed_depth_search");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(10);

    for case in CASES {
        let position = Position::from_fen(case.fen).expect("benchmark FEN should parse");

        group.bench_with_input(
            BenchmarkId::new(format!("{}_no_tt", case.name), format!("d{depth}")),
            &position,
            |b, position| {
                b.iter(|| {
                    let result = iterative_deepening_search(
                        black_box(position),
                        &LegalMoveGenerator,
                        &StandardScorer,
                        &config,
                    );
                    black_box(result.nodes)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new(format!("{}_tt", case.name), format!("d{depth}")),
            &position,
            |b, position| {
                b.iter(|| {
                    let mut tt = TranspositionTable::new_with_mb(16);
                    let result = iterative_deepening_search_with_tt(
                        black_box(position),
                        &LegalMoveGenerator,
                        &StandardScorer,
                        &config,
                        &mut tt,
                    );
                    black_box(result.nodes)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(search_benches, bench_fixed_depth_search);
criterion_main!(search_benches);

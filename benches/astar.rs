use eight_puzzle::astar::{AStar, HeuristicKind};
use eight_puzzle::engine::Board;
use eight_puzzle::trials::random_start;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const HARD: [u64; 2] = [0x123058746, 0x103452768];

fn bench_hard_instances(c: &mut Criterion) {
    let mut group = c.benchmark_group("astar/hard");
    group.sample_size(10);
    for kind in HeuristicKind::ALL {
        let mut solver = AStar::new(kind.evaluator(Board::GOAL));
        group.bench_function(kind.name(), |bch| {
            bch.iter(|| {
                let mut moves = 0u32;
                for raw in HARD {
                    moves += solver.solve(Board::from_raw(raw)).map(|s| s.moves).unwrap_or(0);
                }
                black_box(moves)
            })
        });
    }
    group.finish();
}

fn bench_random_boards(c: &mut Criterion) {
    let boards: Vec<Board> = (0..16).map(|seed| random_start(Board::GOAL, 100_000, seed)).collect();
    let mut group = c.benchmark_group("astar/random16");
    group.sample_size(10);
    for kind in [HeuristicKind::Misplaced, HeuristicKind::Manhattan] {
        let mut solver = AStar::new(kind.evaluator(Board::GOAL));
        group.bench_function(kind.name(), |bch| {
            bch.iter(|| {
                let mut discovered = 0usize;
                for &bd in &boards {
                    if let Ok(s) = solver.solve(bd) { discovered += s.stats.discovered; }
                }
                black_box(discovered)
            })
        });
    }
    group.finish();
}

criterion_group!(astar, bench_hard_instances, bench_random_boards);
criterion_main!(astar);

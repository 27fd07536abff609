use std::time::Instant;

use chess::board::Board;
use colored::Colorize;

/// (FEN, depth, expected node count) reference suite from the move-generator
/// test positions.
const PERFT_SUITE: &[(&str, usize, u64)] = &[
    (
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        5,
        4_865_609,
    ),
    (
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        4,
        4_085_603,
    ),
    ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 5, 674_624),
    (
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        4,
        422_333,
    ),
];

pub fn run(depth: usize, fen: Option<String>, divide: bool) {
    match fen {
        Some(fen) => run_one(&fen, depth, divide),
        None => run_suite(),
    }
}

fn run_suite() {
    for &(fen, depth, expected) in PERFT_SUITE {
        let board: Board = fen.parse().expect("reference FEN must be valid");
        let start = Instant::now();
        let found = board.perft(depth);
        let elapsed = start.elapsed();

        let status = if found == expected {
            found.to_string().green()
        } else {
            format!("{found} (expected {expected})").red()
        };

        println!("{:<72} depth {depth}: {status} ({:?})", fen, elapsed);
    }
}

fn run_one(fen: &str, depth: usize, divide: bool) {
    let board: Board = fen.parse().expect("invalid FEN");

    if divide {
        let mut total = 0u64;
        for (mv, nodes) in board.perft_divide(depth) {
            println!("{mv}: {nodes}");
            total += nodes;
        }
        println!("\nTotal: {total}");
        return;
    }

    for d in 0..=depth {
        let start = Instant::now();
        let nodes = board.perft(d);
        let elapsed = start.elapsed();
        let nps = nodes as f64 / elapsed.as_secs_f64().max(1e-9) / 1_000_000.0;
        println!("depth {d:>2}: {nodes:>12} nodes in {elapsed:.2?} ({nps:.2} Mnps)");
    }
}

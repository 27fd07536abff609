use std::time::Instant;

use chess::board::Board;
use colored::Colorize;
use engine::{Engine, Position};

const BENCH_POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
];

pub fn run(depth: u8, fen: Option<String>) {
    match fen {
        Some(fen) => run_one(&fen, depth),
        None => {
            for fen in BENCH_POSITIONS {
                run_one(fen, depth);
            }
        }
    }
}

fn run_one(fen: &str, depth: u8) {
    let board: Board = fen.parse().expect("invalid FEN");
    let mut pos = Position::new(board);
    let mut engine = Engine::new();

    let start = Instant::now();
    let best = engine.get_best_move(&mut pos, Some(depth), None);
    let elapsed = start.elapsed();

    println!("{}", fen.italic());
    match best {
        Some(mv) => println!("  {:14} {}", "best move:".green(), mv),
        None => println!("  {:14} {}", "best move:".red(), "<none>"),
    }
    println!("  {:14} {}", "depth:".blue(), depth);
    println!("  {:14} {:.2?}", "time:".blue(), elapsed);
    println!();
}

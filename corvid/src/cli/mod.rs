//! Non-UCI entry points: move-generation verification (`perft`) and a
//! fixed-depth search benchmark (`bench`), invoked as `corvid <subcommand>`.
//! Everything else about running the engine goes through the UCI loop in
//! `main.rs`.

pub mod bench;
pub mod perft;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "corvid")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Count leaf nodes reached at a given depth, for move-generation
    /// verification against known reference values.
    Perft {
        #[arg(short, long, value_name = "DEPTH", default_value = "5")]
        depth: usize,

        /// A FEN to run instead of the built-in reference suite
        #[arg(short, long, value_name = "FEN")]
        fen: Option<String>,

        /// Break down the root move counts instead of just the total
        #[arg(long)]
        divide: bool,
    },

    /// Run a fixed-depth search on one or more reference positions and
    /// report nodes searched, best move, and score.
    Bench {
        #[arg(short, long, value_name = "DEPTH", default_value = "7")]
        depth: u8,

        #[arg(short, long, value_name = "FEN")]
        fen: Option<String>,
    },
}

/// Entry point called from `main` when the process was invoked with
/// arguments (anything other than a bare UCI session).
pub fn run() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print().ok();
            return;
        }
    };

    match cli.command {
        Command::Perft { depth, fen, divide } => perft::run(depth, fen, divide),
        Command::Bench { depth, fen } => bench::run(depth, fen),
    }
}

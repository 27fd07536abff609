//! UCI entry point: reads commands from stdin, drives an [`Engine`], writes
//! UCI responses to stdout. All I/O and process lifecycle lives here; the
//! search itself never touches stdin/stdout.

mod cli;

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chess::board::Board;
use chess::movegen::moves::{BareMove, Move};
use engine::{Engine, Position};
use uci::client::UciClientMessage;
use uci::engine::{IdType, UciEngineMessage};
use uci::options::{OptionType, UciOption};
use uci::time_control::TimeControl;

const ENGINE_NAME: &str = "corvid";
const ENGINE_AUTHOR: &str = "corvid contributors";

fn main() {
    if std::env::args().nth(1).is_some() {
        cli::run();
        return;
    }

    let stdin = io::stdin();
    let mut session = Session::new();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let Ok(msg) = UciClientMessage::from_str(&line) else {
            continue;
        };

        if !session.handle(msg) {
            break;
        }
    }
}

struct Session {
    engine: Engine,
    position: Position,
}

impl Session {
    fn new() -> Self {
        Session {
            engine: Engine::new(),
            position: Position::new(Board::default()),
        }
    }

    /// Handle one client message; returns `false` when the session should
    /// end (i.e. on `quit`).
    fn handle(&mut self, msg: UciClientMessage) -> bool {
        use UciClientMessage::*;

        match msg {
            Uci => {
                send(UciEngineMessage::Id(IdType::Name(ENGINE_NAME.into())));
                send(UciEngineMessage::Id(IdType::Author(ENGINE_AUTHOR.into())));
                for option in options() {
                    send(UciEngineMessage::UciOption(option));
                }
                send(UciEngineMessage::UciOk);
            }

            Debug(_) => {}

            IsReady => send(UciEngineMessage::ReadyOk),

            SetOption(_, _) => {}

            UciNewGame => {
                self.engine.clear_tt();
                self.position = Position::new(Board::default());
            }

            Position(board, moves) => {
                self.position = Position::new(board);
                for bare in moves {
                    if let Some(mv) = resolve(&self.position, bare) {
                        self.position.push(mv);
                    }
                }
            }

            Go(tc) => self.go(tc),

            Stop => {}

            Quit => return false,
        }

        true
    }

    fn go(&mut self, tc: TimeControl) {
        let (depth, time_budget) = plan(&self.engine, &self.position, tc);

        let hard_stop = Arc::new(AtomicBool::new(false));
        let watchdog = time_budget.map(|budget| {
            let flag = hard_stop.clone();
            let hard_timeout = Duration::from_secs_f32((2.0 * budget).max(0.001));
            thread::spawn(move || {
                thread::sleep(hard_timeout);
                flag.store(true, Ordering::Relaxed);
            })
        });

        let fallback = self.position.legal_moves().first().copied();
        let best = self.engine.get_best_move_cancellable(
            &mut self.position,
            depth,
            time_budget,
            hard_stop.clone(),
        );

        hard_stop.store(true, Ordering::Relaxed);
        if let Some(handle) = watchdog {
            let _ = handle.join();
        }

        if let Some(mv) = best.or(fallback) {
            send(UciEngineMessage::BestMove(mv));
        }
    }
}

/// Translate a UCI move-string (`BareMove`) into a legal `Move`, or `None`
/// if it isn't legal in the current position (a malformed `position` line).
fn resolve(pos: &Position, bare: BareMove) -> Option<Move> {
    pos.legal_moves().into_iter().find(|&mv| mv == bare)
}

/// Map a [`TimeControl`] onto the engine's `(depth, time_budget)` contract.
/// `Nodes` has no equivalent in this engine's search budget and falls back
/// to a fixed search depth; `Infinite` likewise runs to the absolute depth
/// ceiling since there is no live `stop` channel while a search blocks.
fn plan(engine: &Engine, pos: &Position, tc: TimeControl) -> (Option<u8>, Option<f32>) {
    match tc {
        TimeControl::Depth(d) => (Some(d.min(engine::search::params::MAX_DEPTH as usize) as u8), None),
        TimeControl::Nodes(_) => (None, None),
        TimeControl::Infinite => (Some(engine::search::params::MAX_DEPTH), None),
        TimeControl::FixedTime(d) => (None, Some(d.as_secs_f32().max(0.001))),
        TimeControl::Clock { wtime, btime, winc, binc, .. } => {
            let (remaining, inc) = if pos.turn() == chess::piece::Color::White {
                (wtime, winc.unwrap_or(Duration::ZERO))
            } else {
                (btime, binc.unwrap_or(Duration::ZERO))
            };

            let budget = engine.allocate_time(
                remaining.as_secs_f32(),
                inc.as_secs_f32(),
                pos.fullmove_number() as u32,
            );

            (None, Some(budget))
        }
    }
}

fn options() -> Vec<UciOption> {
    vec![UciOption {
        name: "Hash",
        option_type: OptionType::Spin {
            min: 1,
            max: 4096,
            default: 64,
        },
    }]
}

fn send(msg: UciEngineMessage) {
    let mut stdout = io::stdout();
    let _ = writeln!(stdout, "{msg}");
    let _ = stdout.flush();
}

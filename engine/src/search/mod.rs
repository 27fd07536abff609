//! Iterative-deepening driver over [`negamax`], plus the transient state a
//! single root call shares across every node: the node counter, the time
//! budget, and the cooperative abort flag.

mod negamax;
pub mod params;
mod quiescence;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chess::movegen::moves::Move;
use chess::piece::Color;

use crate::history_tables::{HistoryTable, KillerTable};
use crate::position::Position;
use crate::transpositions::TTable;
use params::{DEFAULT_DEPTH, MATE_THRESHOLD, MAX_DEPTH, TIME_CHECK_INTERVAL};

/// Owns everything a root call mutates: the persistent transposition table
/// (borrowed so it survives across calls) and the per-call killer/history
/// tables and abort bookkeeping, which are reset at the start of every call.
pub struct SearchRunner<'a> {
    pub(crate) tt: &'a mut TTable,
    pub(crate) killers: KillerTable,
    pub(crate) history: HistoryTable,
    pub(crate) node_count: u64,
    pub(crate) time_check_counter: u32,
    pub(crate) start: Instant,
    pub(crate) time_budget: Duration,
    /// Per-depth soft abort: set when the search itself notices it has
    /// blown through 80% of the budget, reset at the start of each depth.
    pub(crate) aborted: bool,
    /// Hard abort: set only from outside (a UCI `stop` or a watchdog
    /// thread's timeout), never reset by the search itself. Checked
    /// alongside the soft flag on every node visit.
    hard_stop: Arc<AtomicBool>,
}

impl<'a> SearchRunner<'a> {
    pub fn new(tt: &'a mut TTable) -> Self {
        Self::with_hard_stop(tt, Arc::new(AtomicBool::new(false)))
    }

    /// Construct with a caller-supplied abort flag, so a UCI shell can hold
    /// a clone and trip it from a watchdog thread while the search runs.
    pub fn with_hard_stop(tt: &'a mut TTable, hard_stop: Arc<AtomicBool>) -> Self {
        SearchRunner {
            tt,
            killers: KillerTable::new(MAX_DEPTH as usize),
            history: HistoryTable::new(),
            node_count: 0,
            time_check_counter: TIME_CHECK_INTERVAL,
            start: Instant::now(),
            time_budget: Duration::from_secs(u64::MAX / 2),
            aborted: false,
            hard_stop,
        }
    }

    pub fn abort_handle(&self) -> Arc<AtomicBool> {
        self.hard_stop.clone()
    }

    /// Increment the node counter and, every `TIME_CHECK_INTERVAL` visits,
    /// poll the wall clock and the hard-stop flag.
    pub(crate) fn tick_node(&mut self) {
        self.node_count += 1;

        if self.time_check_counter == 0 {
            self.time_check_counter = TIME_CHECK_INTERVAL;
            if self.start.elapsed().as_secs_f32() > 0.8 * self.time_budget.as_secs_f32() {
                self.aborted = true;
            }
        } else {
            self.time_check_counter -= 1;
        }

        if self.hard_stop.load(Ordering::Relaxed) {
            self.aborted = true;
        }
    }

    fn elapsed_fraction(&self) -> f32 {
        self.start.elapsed().as_secs_f32() / self.time_budget.as_secs_f32()
    }

    /// `get_best_move(position, depth, time_budget) -> Move`. Exactly one of
    /// `depth` / `time_budget` should be given; both absent defaults to a
    /// fixed depth of 7. Clears killers and history; the transposition table
    /// persists across calls.
    pub fn get_best_move(
        &mut self,
        pos: &mut Position,
        depth: Option<u8>,
        time_budget: Option<f32>,
    ) -> Option<Move> {
        self.killers.clear();
        self.history.clear();
        self.node_count = 0;
        self.start = Instant::now();
        self.aborted = false;

        if let Some(budget) = time_budget {
            self.time_budget = Duration::from_secs_f32(budget.max(0.001));
        } else {
            self.time_budget = Duration::from_secs(u64::MAX / 2);
        }

        if let Some(mv) = opening_book_move(pos) {
            return Some(mv);
        }

        let max_depth = depth.unwrap_or(DEFAULT_DEPTH).min(MAX_DEPTH);
        let time_mode = time_budget.is_some();
        let min_depth = match time_budget {
            Some(b) if b < 2.0 => 3,
            Some(b) if b < 5.0 => 4,
            Some(_) => 5,
            None => 0,
        };

        let mut best_move: Option<Move> = None;
        let mut prev_score = 0.0f32;

        for d in 1..=max_depth {
            if time_mode && self.elapsed_fraction() > 0.4 && d > min_depth {
                break;
            }

            self.time_check_counter = TIME_CHECK_INTERVAL;
            self.aborted = false;

            let (alpha0, beta0) = if d <= 2 {
                (-params::INF, params::INF)
            } else {
                (prev_score - 0.5, prev_score + 0.5)
            };

            let search_depth = {
                let phase = chess_phase(pos);
                if phase < params::NULL_MOVE_PHASE_THRESHOLD {
                    d + 1
                } else {
                    d
                }
            };

            let Some((mut mv, mut score)) = self.search_root(pos, search_depth, alpha0, beta0)
            else {
                break;
            };

            let mut discard = false;

            if d > 2 && (score <= prev_score - 0.5 || score >= prev_score + 0.5) {
                let skip_research = time_mode && self.elapsed_fraction() > 0.5;
                if !skip_research {
                    self.aborted = false;
                    match self.search_root(pos, search_depth, -params::INF, params::INF) {
                        Some((m, s)) if !self.aborted => {
                            mv = m;
                            score = s;
                        }
                        _ => discard = true,
                    }
                }
            }

            if discard || self.aborted {
                break;
            }

            best_move = Some(mv);
            prev_score = score;

            if score.abs() >= MATE_THRESHOLD {
                break;
            }
        }

        best_move
    }

    /// Root PVS over ordered legal moves. Returns `None` only when the
    /// position has no legal moves (terminal) or the first move aborts.
    fn search_root(
        &mut self,
        pos: &mut Position,
        depth: u8,
        alpha: f32,
        beta: f32,
    ) -> Option<(Move, f32)> {
        let tt_move = self.tt.probe(pos.hash).map(|e| e.best_move());
        let mut moves = pos.legal_moves();
        if moves.is_empty() {
            return None;
        }

        crate::move_picker::order(&pos.board, &mut moves, pos.turn(), depth, tt_move, &self.killers, &self.history);

        let mut alpha = alpha;
        let mut best_move = moves[0];
        let mut best_score = -params::INF;

        for (i, &mv) in moves.iter().enumerate() {
            pos.push(mv);

            if pos.is_checkmate() {
                pos.pop();
                return Some((mv, params::MATE_SCORE));
            }

            let score = if i == 0 {
                -self.negamax(pos, depth as i32 - 1, -beta, -alpha, true, 1)
            } else {
                let null_window = -self.negamax(pos, depth as i32 - 1, -alpha - 1.0, -alpha, true, 1);
                if !self.aborted && null_window > alpha && null_window < beta {
                    -self.negamax(pos, depth as i32 - 1, -beta, -alpha, true, 1)
                } else {
                    null_window
                }
            };

            pos.pop();

            if self.aborted {
                return if best_score > -params::INF {
                    Some((best_move, best_score))
                } else {
                    None
                };
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        Some((best_move, best_score))
    }
}

fn chess_phase(pos: &Position) -> f32 {
    pos.board.phase() as f32 / 24.0
}

/// At full-move 1 as White, a random choice of `e2e4`/`d2d4`; at full-move 1
/// as Black after one of those, the mirroring reply. Everything else returns
/// `None` so the driver falls through to the real search.
fn opening_book_move(pos: &Position) -> Option<Move> {
    use std::str::FromStr;
    use std::time::{SystemTime, UNIX_EPOCH};

    if pos.fullmove_number() != 1 {
        return None;
    }

    if pos.turn() == Color::White {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        let choice = if nanos % 2 == 0 { "e2e4" } else { "d2d4" };
        return Move::from_str(choice).ok();
    }

    let last = pos.last_move()?;
    let white_first = Move::from_str("e2e4").ok()?;
    let white_second = Move::from_str("d2d4").ok()?;

    if last == white_first {
        Move::from_str("e7e5").ok()
    } else if last == white_second {
        Move::from_str("d7d5").ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpositions::TTable;
    use chess::board::Board;

    #[test]
    fn finds_scholars_mate() {
        let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
        let board: Board = fen.parse().unwrap();
        let mut pos = Position::new(board);
        let mut tt = TTable::new(1024);
        let mut runner = SearchRunner::new(&mut tt);

        let mv = runner.get_best_move(&mut pos, Some(3), None).unwrap();
        assert_eq!(mv.to_string(), "h5f7");
    }

    #[test]
    fn opening_book_covers_first_white_move() {
        let pos = Position::new(Board::default());
        let mv = opening_book_move(&pos).unwrap();
        assert!(["e2e4", "d2d4"].contains(&mv.to_string().as_str()));
    }

    #[test]
    fn legal_move_guarantee() {
        let board = Board::default();
        let mut pos = Position::new(board);
        let mut tt = TTable::new(1024);
        let mut runner = SearchRunner::new(&mut tt);

        let mv = runner.get_best_move(&mut pos, Some(2), None).unwrap();
        assert!(pos.legal_moves().contains(&mv));
    }
}

//! The main search: iterative-deepening's per-node workhorse. Alpha-beta
//! negamax with TT probing/storing, null-move pruning, futility pruning,
//! late-move reductions, principal-variation search, and check extensions.
//!
//! The order of operations below is load-bearing: reshuffling it changes
//! which nodes return a cooperative-abort zero, whether a node in check can
//! wrongly fall into quiescence, or whether a stale TT bound leaks past a
//! window it no longer applies to.

use chess::movegen::moves::Move;

use super::params::{
    self, FUTILITY_ALPHA_CEILING, FUTILITY_MARGINS, FUTILITY_MAX_DEPTH, LMR_MIN_DEPTH,
    LMR_MIN_MOVE_INDEX, MAX_PLY, NULL_MOVE_MIN_DEPTH, NULL_MOVE_PHASE_THRESHOLD,
    NULL_MOVE_REDUCTION,
};
use super::SearchRunner;
use crate::evaluate::evaluate;
use crate::position::Position;
use crate::transpositions::NodeType;

impl SearchRunner<'_> {
    pub(super) fn negamax(
        &mut self,
        pos: &mut Position,
        mut depth: i32,
        mut alpha: f32,
        mut beta: f32,
        null_ok: bool,
        ply: usize,
    ) -> f32 {
        let alpha_orig = alpha;

        // 1. Abort / node counting.
        self.tick_node();
        if self.aborted {
            return 0.0;
        }

        // 2. Repetition / rule draw (contempt = 0).
        if pos.is_repetition() || pos.is_rule_draw() {
            return 0.0;
        }

        // 3. Check extension, before the leaf check.
        let in_check = pos.is_check();
        if in_check && ply < MAX_PLY - 5 {
            depth += 1;
        }

        // 4. Leaf: drop into quiescence.
        if depth <= 0 || ply >= MAX_PLY {
            return self.quiescence(pos, alpha, beta, 0);
        }

        let depth = depth as u8;

        // 5. TT probe.
        let mut tt_move = None;
        if let Some(entry) = self.tt.probe(pos.hash) {
            tt_move = Some(entry.best_move());

            if entry.depth() >= depth {
                match entry.node_type() {
                    NodeType::Exact => return entry.score(),
                    NodeType::Lower => {
                        if entry.score() > alpha {
                            alpha = entry.score();
                        }
                    }
                    NodeType::Upper => {
                        if entry.score() < beta {
                            beta = entry.score();
                        }
                    }
                }
                if alpha >= beta {
                    return entry.score();
                }
            }
        }

        let phase = pos.board.phase() as f32 / 24.0;

        // 6. Null-move pruning.
        if null_ok
            && !in_check
            && phase >= NULL_MOVE_PHASE_THRESHOLD
            && depth as i32 >= NULL_MOVE_MIN_DEPTH
        {
            pos.push_null();
            let score = -self.negamax(
                pos,
                depth as i32 - NULL_MOVE_REDUCTION,
                -beta,
                -beta + 1.0,
                false,
                ply + 1,
            );
            pos.pop();

            if self.aborted {
                return 0.0;
            }
            if score >= beta {
                return beta;
            }
        }

        // 7. Futility flag.
        let futile = depth as i32 <= FUTILITY_MAX_DEPTH
            && !in_check
            && alpha.abs() < FUTILITY_ALPHA_CEILING
            && evaluate(&pos.board) + FUTILITY_MARGINS[depth as usize] <= alpha;

        // 8. Move enumeration.
        let mut moves = pos.legal_moves();
        if moves.is_empty() {
            return if in_check { -params::MATE_SCORE } else { 0.0 };
        }

        crate::move_picker::order(
            &pos.board,
            &mut moves,
            pos.turn(),
            depth,
            tt_move,
            &self.killers,
            &self.history,
        );

        let mut best_score = -params::INF;
        let mut best_move = Move::NULL;

        for (i, &mv) in moves.iter().enumerate() {
            let is_capture = mv.is_capture();
            let is_quiet = !is_capture && !mv.is_promotion();

            if futile && i > 0 && is_quiet {
                continue;
            }

            let gives_check = i >= LMR_MIN_MOVE_INDEX
                && depth as i32 >= LMR_MIN_DEPTH
                && !in_check
                && !is_capture
                && pos.gives_check(mv);

            pos.push(mv);

            let mut reduction = 0;
            if i >= LMR_MIN_MOVE_INDEX
                && depth as i32 >= LMR_MIN_DEPTH
                && !in_check
                && !is_capture
                && !gives_check
            {
                let table_reduction = params::lmr_reduction(depth as i32, i.min(63)) as i32;
                reduction = table_reduction.min(depth as i32 - 2).max(0);
            }

            let score = if i == 0 {
                -self.negamax(pos, depth as i32 - 1, -beta, -alpha, true, ply + 1)
            } else {
                let null_window = -self.negamax(
                    pos,
                    depth as i32 - 1 - reduction,
                    -alpha - 1.0,
                    -alpha,
                    true,
                    ply + 1,
                );

                if !self.aborted && null_window > alpha && (reduction > 0 || null_window < beta) {
                    -self.negamax(pos, depth as i32 - 1, -beta, -alpha, true, ply + 1)
                } else {
                    null_window
                }
            };

            pos.pop();

            if self.aborted {
                break;
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                if is_quiet {
                    self.killers.add(depth, mv);
                    self.history.add(pos.turn(), mv, depth);
                }
                break;
            }
        }

        // 10. TT store.
        if !self.aborted && best_score > -params::INF {
            let node_type = if best_score <= alpha_orig {
                NodeType::Upper
            } else if best_score >= beta {
                NodeType::Lower
            } else {
                NodeType::Exact
            };

            self.tt.insert(pos.hash, depth, best_move, best_score, node_type);
        }

        best_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpositions::TTable;
    use chess::board::Board;

    fn runner(tt: &mut TTable) -> SearchRunner<'_> {
        SearchRunner::new(tt)
    }

    #[test]
    fn fifty_move_rule_forces_a_draw_score() {
        let board: Board = "8/8/4k3/8/8/8/8/R3K3 w - - 99 1".parse().unwrap();
        let mut pos = Position::new(board);
        let mut tt = TTable::new(1024);
        let mut r = runner(&mut tt);

        let score = r.negamax(&mut pos, 1, -params::INF, params::INF, true, 0);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn no_fifty_move_rule_scores_above_a_pawn() {
        let board: Board = "8/8/4k3/8/8/8/8/R3K3 w - - 0 1".parse().unwrap();
        let mut pos = Position::new(board);
        let mut tt = TTable::new(1024);
        let mut r = runner(&mut tt);

        let score = r.negamax(&mut pos, 1, -params::INF, params::INF, true, 0);
        assert!(score > 1.0);
    }

    #[test]
    fn checkmate_scores_as_mate() {
        // Black to move, already mated (fool's mate).
        let board: Board = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"
            .parse()
            .unwrap();
        let mut pos = Position::new(board);
        let mut tt = TTable::new(1024);
        let mut r = runner(&mut tt);

        let score = r.negamax(&mut pos, 1, -params::INF, params::INF, true, 0);
        assert_eq!(score, -params::MATE_SCORE);
    }
}

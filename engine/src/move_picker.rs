//! Move ordering: searching the most promising moves first is what makes
//! alpha-beta pruning effective, so the quality of this ordering matters more
//! to search speed than almost anything else in the engine.
//!
//! Ordering groups, in priority order: the transposition-table move, captures
//! by MVV/LVA, killer quiets for this depth, then the remaining quiets sorted
//! by history score. Each group preserves the caller's relative order among
//! ties, which keeps the ordering deterministic given the same tables.

use chess::board::Board;
use chess::movegen::moves::Move;
use chess::piece::Color;

use crate::evaluate::BASE_VALUE;
use crate::history_tables::{HistoryTable, KillerTable};

fn mvv_lva(board: &Board, mv: Move) -> f32 {
    if mv.is_en_passant() {
        return 1.0;
    }

    let victim = board
        .get_at(mv.get_capture_sq())
        .map(|p| BASE_VALUE[p.piece_type() as usize])
        .unwrap_or(0.0);

    let attacker = board
        .get_at(mv.src())
        .map(|p| BASE_VALUE[p.piece_type() as usize])
        .unwrap_or(0.0);

    victim - attacker / 10.0
}

/// Order `moves` in place for the given node. `depth_remaining` indexes the
/// killer table; `tt_move`, if present and legal here, is tried first.
pub fn order(
    board: &Board,
    moves: &mut Vec<Move>,
    side: Color,
    depth_remaining: u8,
    tt_move: Option<Move>,
    killers: &KillerTable,
    history: &HistoryTable,
) {
    let tt_move = tt_move.filter(|mv| moves.contains(mv));

    let is_capture = |mv: &Move| mv.is_capture();
    let is_killer = |mv: &Move| !is_capture(mv) && killers.is_killer(depth_remaining, *mv);

    moves.sort_by(|&a, &b| {
        group_rank(a, tt_move, is_capture, is_killer)
            .cmp(&group_rank(b, tt_move, is_capture, is_killer))
            .then_with(|| {
                order_within_group(board, side, a, b, is_capture, is_killer, depth_remaining, killers, history)
            })
    });
}

fn group_rank(
    mv: Move,
    tt_move: Option<Move>,
    is_capture: impl Fn(&Move) -> bool,
    is_killer: impl Fn(&Move) -> bool,
) -> u8 {
    if Some(mv) == tt_move {
        0
    } else if is_capture(&mv) {
        1
    } else if is_killer(&mv) {
        2
    } else {
        3
    }
}

#[allow(clippy::too_many_arguments)]
fn order_within_group(
    board: &Board,
    side: Color,
    a: Move,
    b: Move,
    is_capture: impl Fn(&Move) -> bool,
    is_killer: impl Fn(&Move) -> bool,
    depth_remaining: u8,
    killers: &KillerTable,
    history: &HistoryTable,
) -> std::cmp::Ordering {
    if is_capture(&a) && is_capture(&b) {
        mvv_lva(board, b)
            .partial_cmp(&mvv_lva(board, a))
            .unwrap_or(std::cmp::Ordering::Equal)
    } else if is_killer(&a) && is_killer(&b) {
        let slot = killers.moves(depth_remaining);
        let rank = |mv: Move| slot.iter().position(|&k| k == mv).unwrap_or(usize::MAX);
        rank(a).cmp(&rank(b))
    } else if !is_capture(&a) && !is_capture(&b) {
        history.get(side, b).cmp(&history.get(side, a))
    } else {
        std::cmp::Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::movegen::moves::MoveType;
    use chess::square::Square;

    #[test]
    fn tt_move_comes_first() {
        let board: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let mut moves = board.legal_moves::<true>();
        let tt_move = moves[moves.len() / 2];

        let killers = KillerTable::new(64);
        let history = HistoryTable::new();
        order(&board, &mut moves, Color::White, 5, Some(tt_move), &killers, &history);

        assert_eq!(moves[0], tt_move);
    }

    #[test]
    fn captures_sort_by_mvv_lva() {
        let board: Board = "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        let capture = Move::new(Square::E4, Square::D5, MoveType::Capture);
        let quiet = Move::new(Square::E1, Square::E2, MoveType::Quiet);
        let mut moves = vec![quiet, capture];

        let killers = KillerTable::new(64);
        let history = HistoryTable::new();
        order(&board, &mut moves, Color::White, 5, None, &killers, &history);

        assert_eq!(moves[0], capture);
    }

    #[test]
    fn killer_pair_keeps_most_recent_first_even_against_history() {
        let board: Board = "4k3/8/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let older = Move::new(Square::E1, Square::D1, MoveType::Quiet);
        let newer = Move::new(Square::E1, Square::F1, MoveType::Quiet);
        let mut moves = vec![older, newer];

        let mut killers = KillerTable::new(64);
        killers.add(5, older);
        killers.add(5, newer);

        let mut history = HistoryTable::new();
        // Give the older killer the higher history score, so a history-based
        // sort would wrongly put it first.
        history.add(Color::White, older, 10);
        history.add(Color::White, newer, 1);

        order(&board, &mut moves, Color::White, 5, None, &killers, &history);

        assert_eq!(moves, vec![newer, older]);
    }
}

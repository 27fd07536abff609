//! A search-side wrapper around a [`Board`] that turns the rules library's
//! pure, functional `play_move` into the push/pop interface the search
//! expects, and keeps the Zobrist hash the evaluator and transposition
//! table key off alongside it.

use chess::board::Board;
use chess::movegen::castling::CastleType;
use chess::movegen::moves::Move;
use chess::piece::Color;
use chess::square::Square;

use crate::zobrist::ZHash;

#[derive(Debug, Clone, Copy)]
struct Snapshot {
    board: Board,
    hash: ZHash,
}

#[derive(Debug, Clone)]
pub struct Position {
    pub board: Board,
    pub hash: ZHash,

    /// Hash after every ply played so far, including the current one. Used
    /// only to detect repetitions; never popped past the game's start.
    history: Vec<ZHash>,

    /// Moves played so far, parallel to `history`. Used by the opening book
    /// to recognise the opponent's first move.
    move_stack: Vec<Move>,

    /// One entry per outstanding `push`, restored by the matching `pop`.
    undo_stack: Vec<Snapshot>,
}

impl Position {
    pub fn new(board: Board) -> Self {
        let hash = ZHash::from_board(&board);

        Position {
            board,
            hash,
            history: vec![hash],
            move_stack: Vec::new(),
            undo_stack: Vec::new(),
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            hash: self.hash,
        }
    }

    /// Apply `mv`, pushing enough state onto the undo stack for a matching
    /// `pop` to restore it exactly. Every control-flow exit from the search
    /// must balance this with a `pop`, including aborted branches.
    pub fn push(&mut self, mv: Move) {
        self.undo_stack.push(self.snapshot());
        self.board = self.board.play_move(mv);
        self.hash = ZHash::from_board(&self.board);
        self.history.push(self.hash);
        self.move_stack.push(mv);
    }

    /// Play the null move: flips the side to move without touching the
    /// board, used only by null-move pruning.
    pub fn push_null(&mut self) {
        self.push(Move::NULL);
    }

    pub fn pop(&mut self) {
        let snap = self
            .undo_stack
            .pop()
            .expect("pop() called without a matching push()");

        self.board = snap.board;
        self.hash = snap.hash;
        self.history.pop();
        self.move_stack.pop();
    }

    /// The most recently played move, if any. Used by the opening book to
    /// recognise the opponent's first move.
    pub fn last_move(&self) -> Option<Move> {
        self.move_stack.last().copied()
    }

    /// Has this exact position occurred before in the irreversible window
    /// bounded by the half-move clock? A capture or pawn move resets the
    /// clock, so anything further back can never repeat.
    pub fn is_repetition(&self) -> bool {
        let window = self.board.half_moves as usize;

        self.history
            .iter()
            .rev()
            .skip(1)
            .take(window)
            .step_by(2)
            .any(|&h| h == self.hash)
    }

    /// 50-move rule or insufficient material, independent of repetition.
    pub fn is_rule_draw(&self) -> bool {
        self.board.is_rule_draw()
    }

    pub fn turn(&self) -> Color {
        self.board.current
    }

    pub fn fullmove_number(&self) -> u16 {
        self.board.full_moves
    }

    pub fn king(&self, side: Color) -> Square {
        self.board.kings(side).first()
    }

    pub fn is_check(&self) -> bool {
        self.board.in_check()
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.board.insufficient_material()
    }

    pub fn has_kingside_castling_rights(&self, side: Color) -> bool {
        let castle = if side.is_white() { CastleType::WK } else { CastleType::BK };
        self.board.castling_rights.is_available(castle)
    }

    pub fn has_queenside_castling_rights(&self, side: Color) -> bool {
        let castle = if side.is_white() { CastleType::WQ } else { CastleType::BQ };
        self.board.castling_rights.is_available(castle)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.legal_moves::<true>()
    }

    pub fn legal_captures(&self) -> Vec<Move> {
        self.board
            .legal_moves::<false>()
            .into_iter()
            .filter(|mv| mv.is_capture() || mv.is_promotion())
            .collect()
    }

    pub fn is_capture(&self, mv: Move) -> bool {
        mv.is_capture()
    }

    /// Whether playing `mv` would leave the opponent in check. Cheap: the
    /// board already recomputes `checkers` for the side to move on every
    /// `play_move`.
    pub fn gives_check(&self, mv: Move) -> bool {
        self.board.play_move(mv).in_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.legal_moves().is_empty()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.legal_moves().is_empty()
    }

    pub fn fen(&self) -> String {
        self.board.to_fen()
    }

    pub fn transposition_key(&self) -> u64 {
        self.hash.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn startpos() -> Position {
        Position::new(Board::default())
    }

    #[test]
    fn push_pop_restores_hash() {
        let mut pos = startpos();
        let original = pos.hash;
        let mv = Move::from_str("e2e4").unwrap();

        pos.push(mv);
        assert_ne!(pos.hash, original);

        pos.pop();
        assert_eq!(pos.hash, original);
        assert_eq!(pos.board, Board::default());
    }

    #[test]
    fn threefold_shuffle_is_detected() {
        let mut pos = startpos();

        let out_and_back = [
            Move::from_str("g1f3").unwrap(),
            Move::from_str("g8f6").unwrap(),
            Move::from_str("f3g1").unwrap(),
            Move::from_str("f6g8").unwrap(),
        ];

        for mv in out_and_back {
            pos.push(mv);
        }

        assert!(pos.is_repetition());
    }
}

//! Quiet-move history: a running score per `(side to move, from, to)`,
//! bumped whenever the move causes a beta cutoff. Used purely as a sort key
//! when ordering quiet moves that aren't killers.

use chess::movegen::moves::Move;
use chess::piece::Color;
use chess::square::Square;

pub type HistoryScore = u32;

pub struct HistoryTable {
    scores: Box<[[[HistoryScore; Square::COUNT]; Square::COUNT]; 2]>,
}

impl HistoryTable {
    pub fn new() -> Self {
        HistoryTable {
            scores: Box::new([[[0; Square::COUNT]; Square::COUNT]; 2]),
        }
    }

    pub fn get(&self, side: Color, mv: Move) -> HistoryScore {
        self.scores[side as usize][mv.src() as usize][mv.tgt() as usize]
    }

    /// Reward `mv` for causing a beta cutoff at `depth` plies remaining.
    pub fn add(&mut self, side: Color, mv: Move, depth: u8) {
        let bonus = (depth as HistoryScore) * (depth as HistoryScore);
        let slot = &mut self.scores[side as usize][mv.src() as usize][mv.tgt() as usize];
        *slot = slot.saturating_add(bonus);
    }

    pub fn clear(&mut self) {
        for side in self.scores.iter_mut() {
            for row in side.iter_mut() {
                row.fill(0);
            }
        }
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::movegen::moves::MoveType;

    #[test]
    fn cutoff_bonus_is_depth_squared() {
        let mut table = HistoryTable::new();
        let mv = Move::new(Square::E2, Square::E4, MoveType::DoublePush);

        table.add(Color::White, mv, 4);
        assert_eq!(table.get(Color::White, mv), 16);

        table.add(Color::White, mv, 3);
        assert_eq!(table.get(Color::White, mv), 25);
    }

    #[test]
    fn clear_resets_all_entries() {
        let mut table = HistoryTable::new();
        let mv = Move::new(Square::E2, Square::E4, MoveType::DoublePush);

        table.add(Color::White, mv, 6);
        table.clear();

        assert_eq!(table.get(Color::White, mv), 0);
    }
}

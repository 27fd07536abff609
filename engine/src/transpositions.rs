//! The transposition table caches search results keyed by position hash, so
//! that transposing into a position already searched (common once the
//! search tree gets wide) reuses that work instead of redoing it.
//!
//! There are more legal positions than fit in any reasonably sized table, so
//! the full 64-bit hash is truncated down to the table's index space. That
//! makes collisions much more likely, so each slot also stores the untruncated
//! hash and a lookup is rejected unless it matches exactly.

use chess::movegen::moves::Move;

use crate::zobrist::ZHash;

pub type Score = f32;

/// Default capacity: roughly two million entries.
pub const DEFAULT_TT_SIZE: usize = 2_000_000;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeType {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Copy, Clone)]
pub struct TTEntry {
    hash: ZHash,
    depth: u8,
    best_move: Move,
    score: Score,
    node_type: NodeType,
}

impl TTEntry {
    const EMPTY: TTEntry = TTEntry {
        hash: ZHash::NULL,
        depth: 0,
        best_move: Move::NULL,
        score: 0.0,
        node_type: NodeType::Exact,
    };

    pub fn is_empty(&self) -> bool {
        self.hash == ZHash::NULL
    }

    pub fn hash(&self) -> ZHash {
        self.hash
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn best_move(&self) -> Move {
        self.best_move
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Try to resolve a cutoff or bound tightening from this entry without
    /// recursing further. Returns `None` when the entry is too shallow or
    /// its bound doesn't let us conclude anything at the current window.
    pub fn try_use(&self, depth: u8, alpha: Score, beta: Score) -> Option<Score> {
        if self.depth < depth {
            return None;
        }

        match self.node_type {
            NodeType::Exact => Some(self.score),
            NodeType::Upper if self.score <= alpha => Some(alpha),
            NodeType::Lower if self.score >= beta => Some(beta),
            _ => None,
        }
    }
}

impl Default for TTEntry {
    fn default() -> Self {
        TTEntry::EMPTY
    }
}

/// A fixed-capacity, single-slot-per-index transposition table with
/// depth-preferred replacement: a shallower incoming entry never evicts a
/// deeper one for the same slot. Once every slot a key could hash to is
/// occupied by an equal-or-deeper entry, a new distinct key is simply
/// dropped rather than growing the table.
pub struct TTable {
    table: Vec<TTEntry>,
}

impl TTable {
    pub fn new(capacity: usize) -> Self {
        TTable {
            table: vec![TTEntry::EMPTY; capacity.max(1)],
        }
    }

    fn index(&self, hash: ZHash) -> usize {
        (hash.0 as usize) % self.table.len()
    }

    pub fn probe(&mut self, hash: ZHash) -> Option<TTEntry> {
        let idx = self.index(hash);
        let entry = self.table[idx];

        if entry.is_empty() || entry.hash != hash {
            return None;
        }

        if !entry.score.is_finite() {
            self.table[idx] = TTEntry::EMPTY;
            return None;
        }

        Some(entry)
    }

    pub fn insert(
        &mut self,
        hash: ZHash,
        depth: u8,
        best_move: Move,
        score: Score,
        node_type: NodeType,
    ) {
        if !score.is_finite() {
            return;
        }

        let idx = self.index(hash);
        let slot = &self.table[idx];

        if slot.is_empty() || slot.hash != hash || depth >= slot.depth {
            self.table[idx] = TTEntry {
                hash,
                depth,
                best_move,
                score,
                node_type,
            };
        }
    }

    pub fn clear(&mut self) {
        self.table.fill(TTEntry::EMPTY);
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Fraction of slots in use, in parts per mille, for UCI `hashfull`.
    pub fn hashfull_permille(&self) -> u32 {
        let sample = self.table.len().min(1000);
        let used = self.table[..sample].iter().filter(|e| !e.is_empty()).count();
        ((used * 1000) / sample.max(1)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(n: u64) -> ZHash {
        ZHash(n)
    }

    #[test]
    fn deeper_entry_survives_shallower_insert() {
        let mut tt = TTable::new(16);
        tt.insert(hash(42), 8, Move::NULL, 1.0, NodeType::Exact);
        tt.insert(hash(42), 3, Move::NULL, 2.0, NodeType::Exact);

        let entry = tt.probe(hash(42)).unwrap();
        assert_eq!(entry.depth(), 8);
        assert_eq!(entry.score(), 1.0);
    }

    #[test]
    fn non_finite_score_is_not_stored() {
        let mut tt = TTable::new(16);
        tt.insert(hash(7), 5, Move::NULL, f32::NAN, NodeType::Exact);
        assert!(tt.probe(hash(7)).is_none());

        tt.insert(hash(7), 5, Move::NULL, f32::INFINITY, NodeType::Exact);
        assert!(tt.probe(hash(7)).is_none());
    }

    #[test]
    fn miss_on_collision_with_different_key() {
        let mut tt = TTable::new(1);
        tt.insert(hash(1), 4, Move::NULL, 1.0, NodeType::Exact);
        // Same slot (capacity 1), different hash: must not return the collided entry.
        assert!(tt.probe(hash(2)).is_none());
    }
}

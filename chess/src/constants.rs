use crate::bitboard::Bitboard;

pub const LIGHT_SQUARES: Bitboard = Bitboard(6172840429334713770);
pub const DARK_SQUARES: Bitboard = Bitboard(12273903644374837845);

/// Bitboard masks for each of the eight files, indexed `0` (file A) through
/// `7` (file H).
pub const FILES: [Bitboard; 8] = {
    let mut files = [Bitboard::EMPTY; 8];
    let mut file = 0;

    while file < 8 {
        let mut rank = 0;
        let mut bb: u64 = 0;

        while rank < 8 {
            bb |= 1u64 << (rank * 8 + file);
            rank += 1;
        }

        files[file] = Bitboard(bb);
        file += 1;
    }

    files
};

/// Bitboard masks for each of the eight ranks, indexed `0` (rank 1) through
/// `7` (rank 8).
pub const RANKS: [Bitboard; 8] = {
    let mut ranks = [Bitboard::EMPTY; 8];
    let mut rank = 0;

    while rank < 8 {
        ranks[rank] = Bitboard(0xFFu64 << (rank * 8));
        rank += 1;
    }

    ranks
};

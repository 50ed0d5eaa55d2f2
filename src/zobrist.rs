//! DucaPowr - Zobrist keys
//!
//! Random 64-bit keys per (piece, square), per flag bit, per check-count
//! value and for the side to move. Keys come from a fixed seed so a position
//! hashes to the same value in every run of the same binary.

use rand::prelude::*;

use crate::types::PIECE_COUNT;

const ZOBRIST_SEED: u64 = 12345;

/// Number of bits in the position flags word.
pub const FLAG_BITS: usize = 20;

/// Check counts at or above this value share the last key.
pub const CHECK_COUNT_KEYS: usize = 16;

#[derive(Clone)]
pub struct ZobristKeys {
    pub piece_square: [[u64; 64]; PIECE_COUNT],
    pub flags: [u64; FLAG_BITS],
    pub check_count: [[u64; CHECK_COUNT_KEYS]; 2],
    pub side: u64,
}

impl ZobristKeys {
    pub fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

        let mut piece_square = [[0u64; 64]; PIECE_COUNT];
        for piece in piece_square.iter_mut() {
            for key in piece.iter_mut() {
                *key = rng.gen();
            }
        }

        let mut flags = [0u64; FLAG_BITS];
        for key in flags.iter_mut() {
            *key = rng.gen();
        }

        let mut check_count = [[0u64; CHECK_COUNT_KEYS]; 2];
        for side in check_count.iter_mut() {
            for key in side.iter_mut() {
                *key = rng.gen();
            }
        }

        let side = rng.gen();

        ZobristKeys {
            piece_square,
            flags,
            check_count,
            side,
        }
    }

    /// Key for a check count, saturating at the last slot.
    #[inline]
    pub fn check_count_key(&self, side: usize, count: u8) -> u64 {
        self.check_count[side][(count as usize).min(CHECK_COUNT_KEYS - 1)]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        ZobristKeys::new()
    }
}

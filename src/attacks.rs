//! DucaPowr - Attack Tables
//!
//! Precomputed, read-only lookup structures answering "what does a piece on
//! square S attack given occupancy O":
//! - rook rank/file attacks through first-rank and first-file tables built
//!   from an 8-bit line-attack generator
//! - bishop attacks through per-square magic multiplication into a dense table
//! - knight and king neighbor tables shifted from one canonical pattern
//!
//! The tables are built once on first use and shared for the rest of the
//! process. Construction is deterministic: `AttackTables::new()` always
//! yields bit-identical tables.

use std::sync::OnceLock;

use crate::bitboard::*;
use crate::types::{file_of, rank_of, Color, Square};

// ============================================================================
// BISHOP MAGICS
// ============================================================================

/// Number of relevant occupancy bits of the bishop mask on each square.
#[rustfmt::skip]
pub const BISHOP_RELEVANT_BITS: [u32; 64] = [
    6, 5, 5, 5, 5, 5, 5, 6,
    5, 5, 5, 5, 5, 5, 5, 5,
    5, 5, 7, 7, 7, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 7, 7, 7, 5, 5,
    5, 5, 5, 5, 5, 5, 5, 5,
    6, 5, 5, 5, 5, 5, 5, 6,
];

#[rustfmt::skip]
pub const BISHOP_MAGICS: [u64; 64] = [
    0x40040844404084,     0x2004208a004208,     0x10190041080202,     0x108060845042010,
    0x581104180800210,    0x2112080446200010,   0x1080820820060210,   0x3c0808410220200,
    0x4050404440404,      0x21001420088,        0x24d0080801082102,   0x1020a0a020400,
    0x40308200402,        0x4011002100800,      0x401484104104005,    0x801010402020200,
    0x400210c3880100,     0x404022024108200,    0x810018200204102,    0x4002801a02003,
    0x85040820080400,     0x810102c808880400,   0xe900410884800,      0x8002020480840102,
    0x220200865090201,    0x2010100a02021202,   0x152048408022401,    0x20080002081110,
    0x4001001021004000,   0x800040400a011002,   0xe4004081011002,     0x1c004001012080,
    0x8004200962a00220,   0x8422100208500202,   0x2000402200300c08,   0x8646020080080080,
    0x80020a0200100808,   0x2010004880111000,   0x623000a080011400,   0x42008c0340209202,
    0x209188240001000,    0x400408a884001800,   0x110400a6080400,     0x1840060a44020800,
    0x90080104000041,     0x201011000808101,    0x1a2208080504f080,   0x8012020600211212,
    0x500861011240000,    0x180806108200800,    0x4000020e01040044,   0x300000261044000a,
    0x802241102020002,    0x20906061210001,     0x5a84841004010310,   0x4010801011c04,
    0xa010109502200,      0x4a02012000,         0x500201010098b028,   0x8040002811040900,
    0x28000010020204,     0x6000020202d0240,    0x8918844842082200,   0x4010011029020020,
];

/// Largest per-square bishop table (9 relevant bits).
const BISHOP_TABLE_SIZE: usize = 512;

// ============================================================================
// STEPPING PATTERNS
// ============================================================================

/// Knight jumps from c3.
const KNIGHT_ORIGIN: Square = 18;
const KNIGHT_PATTERN: u64 = 0x0000_000A_1100_110A;

/// King steps from b2.
const KING_ORIGIN: Square = 9;
const KING_PATTERN: u64 = 0x0000_0000_0007_0507;

// ============================================================================
// TABLES
// ============================================================================

pub struct AttackTables {
    /// `[inner occupancy][file]` -> attacked squares on the first rank.
    first_rank: [[u8; 8]; 64],
    /// `[inner occupancy][rank]` -> attacked squares on the a-file.
    first_file: [[u64; 8]; 64],
    bishop_masks: [u64; 64],
    bishop_table: Vec<[u64; BISHOP_TABLE_SIZE]>,
    knight: [u64; 64],
    king: [u64; 64],
}

static TABLES: OnceLock<AttackTables> = OnceLock::new();

/// Shared tables, built on first access.
#[inline]
pub fn tables() -> &'static AttackTables {
    TABLES.get_or_init(AttackTables::new)
}

impl AttackTables {
    pub fn new() -> Self {
        let mut tables = AttackTables {
            first_rank: [[0; 8]; 64],
            first_file: [[0; 8]; 64],
            bishop_masks: [0; 64],
            bishop_table: vec![[0; BISHOP_TABLE_SIZE]; 64],
            knight: [0; 64],
            king: [0; 64],
        };

        for occ_index in 0..64usize {
            let occ = (occ_index as u8) << 1;
            for pos in 0..8u8 {
                let attacks = line_attacks(1 << pos, occ);
                tables.first_rank[occ_index][pos as usize] = attacks;
                tables.first_file[occ_index][pos as usize] = byte_to_file_a(attacks);
            }
        }

        for sq in 0..64u8 {
            let mask = bishop_mask(sq);
            tables.bishop_masks[sq as usize] = mask;

            let bits = BISHOP_RELEVANT_BITS[sq as usize];
            for index in 0..(1usize << bits) {
                let occ = occupancy_subset(index, mask);
                let key = magic_index(occ, BISHOP_MAGICS[sq as usize], bits);
                tables.bishop_table[sq as usize][key] = bishop_attacks_slow(sq, occ);
            }

            tables.knight[sq as usize] = step_pattern(sq, KNIGHT_PATTERN, KNIGHT_ORIGIN, true);
            tables.king[sq as usize] = step_pattern(sq, KING_PATTERN, KING_ORIGIN, false);
        }

        tables
    }

    /// Rook attacks along the rank of `sq`.
    #[inline]
    pub fn rank_attacks(&self, sq: Square, occupied: u64) -> u64 {
        let rank = rank_of(sq);
        let inner = (rank_to_byte(occupied, rank) >> 1) & 63;
        (self.first_rank[inner as usize][file_of(sq) as usize] as u64) << (rank * 8)
    }

    /// Rook attacks along the file of `sq`.
    #[inline]
    pub fn file_attacks(&self, sq: Square, occupied: u64) -> u64 {
        let file = file_of(sq);
        let inner = (file_to_byte(occupied, file) >> 1) & 63;
        self.first_file[inner as usize][rank_of(sq) as usize] << file
    }

    #[inline]
    pub fn rook_attacks(&self, sq: Square, occupied: u64) -> u64 {
        self.rank_attacks(sq, occupied) | self.file_attacks(sq, occupied)
    }

    #[inline]
    pub fn bishop_attacks(&self, sq: Square, occupied: u64) -> u64 {
        let i = sq as usize;
        let key = magic_index(
            occupied & self.bishop_masks[i],
            BISHOP_MAGICS[i],
            BISHOP_RELEVANT_BITS[i],
        );
        self.bishop_table[i][key]
    }

    #[inline]
    pub fn queen_attacks(&self, sq: Square, occupied: u64) -> u64 {
        self.rook_attacks(sq, occupied) | self.bishop_attacks(sq, occupied)
    }

    #[inline]
    pub fn knight_attacks(&self, sq: Square) -> u64 {
        self.knight[sq as usize]
    }

    #[inline]
    pub fn king_attacks(&self, sq: Square) -> u64 {
        self.king[sq as usize]
    }

    /// Squares attacked by every pawn of `pawns` moving as `color`.
    #[inline]
    pub fn pawn_attacks(&self, color: Color, pawns: u64) -> u64 {
        match color {
            Color::White => shift_east(shift_north(pawns)) | shift_west(shift_north(pawns)),
            Color::Black => shift_east(shift_south(pawns)) | shift_west(shift_south(pawns)),
        }
    }

    #[inline]
    pub fn bishop_mask(&self, sq: Square) -> u64 {
        self.bishop_masks[sq as usize]
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        AttackTables::new()
    }
}

// ============================================================================
// CONSTRUCTION HELPERS
// ============================================================================

/// Attacks of the slider `slider` (a single bit) along an 8-bit line with
/// blockers `occ`. The slider's own bit in `occ` is irrelevant.
pub fn line_attacks(slider: u8, occ: u8) -> u8 {
    let o = occ | slider;
    let forward = o.wrapping_sub(slider.wrapping_shl(1));
    let backward = reverse_byte(reverse_byte(o).wrapping_sub(reverse_byte(slider).wrapping_shl(1)));
    (forward ^ backward) & !slider
}

#[inline]
fn magic_index(occ: u64, magic: u64, bits: u32) -> usize {
    (occ.wrapping_mul(magic) >> (64 - bits)) as usize
}

/// Diagonal squares a bishop on `sq` can be blocked on (board edges excluded).
fn bishop_mask(sq: Square) -> u64 {
    let (tr, tf) = (rank_of(sq) as i32, file_of(sq) as i32);
    let mut mask = 0u64;
    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let (mut r, mut f) = (tr + dr, tf + df);
        while (1..=6).contains(&r) && (1..=6).contains(&f) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Ray-cast bishop attacks, used to fill the magic table.
pub fn bishop_attacks_slow(sq: Square, occupied: u64) -> u64 {
    let (tr, tf) = (rank_of(sq) as i32, file_of(sq) as i32);
    let mut attacks = 0u64;
    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let (mut r, mut f) = (tr + dr, tf + df);
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if occupied & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// The `index`-th subset of `mask`: bit `k` of `index` selects the `k`-th
/// lowest square of the mask.
fn occupancy_subset(index: usize, mut mask: u64) -> u64 {
    let mut occ = 0u64;
    let mut k = 0;
    while mask != 0 {
        let sq = pop_lsb(&mut mask);
        if index & (1 << k) != 0 {
            occ |= square_bb(sq);
        }
        k += 1;
    }
    occ
}

/// Move `pattern` (drawn around `origin`) onto `sq`, dropping the squares
/// that wrapped around the a/h files.
fn step_pattern(sq: Square, pattern: u64, origin: Square, two_files: bool) -> u64 {
    let moved = if sq >= origin {
        pattern << (sq - origin)
    } else {
        pattern >> (origin - sq)
    };
    let file = file_of(sq);
    let guard = match (two_files, file) {
        (true, 0..=1) => NOT_FILE_GH,
        (true, 6..=7) => NOT_FILE_AB,
        (false, 0) => NOT_FILE_H,
        (false, 7) => NOT_FILE_A,
        _ => !0,
    };
    moved & guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn line_attacks_brute(slider_pos: u8, occ: u8) -> u8 {
        let mut attacks = 0u8;
        for dir in [1i32, -1] {
            let mut p = slider_pos as i32 + dir;
            while (0..8).contains(&p) {
                attacks |= 1 << p;
                if occ & (1 << p) != 0 {
                    break;
                }
                p += dir;
            }
        }
        attacks
    }

    fn rook_attacks_brute(sq: Square, occupied: u64) -> u64 {
        let (tr, tf) = (rank_of(sq) as i32, file_of(sq) as i32);
        let mut attacks = 0u64;
        for (dr, df) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let (mut r, mut f) = (tr + dr, tf + df);
            while (0..8).contains(&r) && (0..8).contains(&f) {
                let bit = 1u64 << (r * 8 + f);
                attacks |= bit;
                if occupied & bit != 0 {
                    break;
                }
                r += dr;
                f += df;
            }
        }
        attacks
    }

    fn rook_mask(sq: Square) -> u64 {
        let rank = rank_bb(rank_of(sq)) & !(FILE_A | FILE_H);
        let file = file_bb(file_of(sq)) & !(RANK_1 | RANK_8);
        (rank | file) & !square_bb(sq)
    }

    #[test]
    fn first_rank_table_matches_line_scan() {
        let tables = tables();
        for pos in 0..8u8 {
            for occ_index in 0..64usize {
                let occ = (occ_index as u8) << 1;
                assert_eq!(
                    tables.first_rank[occ_index][pos as usize],
                    line_attacks_brute(pos, occ),
                    "pos={} occ_index={}",
                    pos,
                    occ_index
                );
            }
        }
    }

    #[test]
    fn line_attacks_ignores_slider_bit_and_edges() {
        // slider on h, blocker on a: whole line
        assert_eq!(line_attacks(0x80, 0x01), 0x7F);
        // slider on d, blockers b and f
        assert_eq!(line_attacks(0x08, 0x22 | 0x08), 0x36);
    }

    #[test]
    fn rook_attacks_match_ray_cast_for_every_relevant_subset() {
        let tables = tables();
        for sq in 0..64u8 {
            let mask = rook_mask(sq);
            for index in 0..(1usize << mask.count_ones()) {
                let occ = occupancy_subset(index, mask) | square_bb(sq);
                assert_eq!(
                    tables.rook_attacks(sq, occ),
                    rook_attacks_brute(sq, occ),
                    "sq={} occ={:#x}",
                    sq,
                    occ
                );
            }
        }
    }

    #[test]
    fn bishop_magics_match_ray_cast_for_every_relevant_subset() {
        let tables = tables();
        for sq in 0..64u8 {
            let mask = tables.bishop_mask(sq);
            assert_eq!(mask.count_ones(), BISHOP_RELEVANT_BITS[sq as usize]);
            for index in 0..(1usize << mask.count_ones()) {
                let occ = occupancy_subset(index, mask);
                assert_eq!(tables.bishop_attacks(sq, occ), bishop_attacks_slow(sq, occ));
            }
        }
    }

    #[test]
    fn sliders_match_ray_cast_on_random_boards() {
        let tables = tables();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let occ: u64 = rng.gen::<u64>() & rng.gen::<u64>();
            for sq in 0..64u8 {
                assert_eq!(tables.rook_attacks(sq, occ), rook_attacks_brute(sq, occ));
                assert_eq!(tables.bishop_attacks(sq, occ), bishop_attacks_slow(sq, occ));
            }
        }
    }

    #[test]
    fn stepping_tables_have_expected_counts() {
        let tables = tables();
        assert_eq!(tables.knight_attacks(0).count_ones(), 2);
        assert_eq!(tables.knight_attacks(27).count_ones(), 8);
        assert_eq!(tables.knight_attacks(7), square_bb(13) | square_bb(22));
        assert_eq!(tables.knight_attacks(63), square_bb(46) | square_bb(53));
        assert_eq!(tables.king_attacks(0), square_bb(1) | square_bb(8) | square_bb(9));
        assert_eq!(tables.king_attacks(27).count_ones(), 8);
        assert_eq!(tables.king_attacks(7).count_ones(), 3);
        assert_eq!(tables.king_attacks(60).count_ones(), 5);
    }

    #[test]
    fn stepping_tables_are_symmetric() {
        let tables = tables();
        for a in 0..64u8 {
            for b in Squares(tables.knight_attacks(a)) {
                assert_ne!(tables.knight_attacks(b) & square_bb(a), 0);
                let df = (file_of(a) as i32 - file_of(b) as i32).abs();
                let dr = (rank_of(a) as i32 - rank_of(b) as i32).abs();
                assert!((df, dr) == (1, 2) || (df, dr) == (2, 1));
            }
            for b in Squares(tables.king_attacks(a)) {
                let df = (file_of(a) as i32 - file_of(b) as i32).abs();
                let dr = (rank_of(a) as i32 - rank_of(b) as i32).abs();
                assert!(df <= 1 && dr <= 1 && a != b);
            }
        }
    }

    #[test]
    fn pawn_attacks_do_not_wrap() {
        let tables = tables();
        assert_eq!(tables.pawn_attacks(Color::White, square_bb(8)), square_bb(17));
        assert_eq!(tables.pawn_attacks(Color::Black, square_bb(55)), square_bb(46));
        assert_eq!(tables.pawn_attacks(Color::White, RANK_8), 0);
    }

    #[test]
    fn construction_is_idempotent() {
        let a = AttackTables::new();
        let b = AttackTables::new();
        assert_eq!(a.first_rank, b.first_rank);
        assert_eq!(a.first_file, b.first_file);
        assert_eq!(a.bishop_masks, b.bishop_masks);
        assert!(a.bishop_table == b.bishop_table);
        assert_eq!(a.knight, b.knight);
        assert_eq!(a.king, b.king);
    }
}
